//! Description of a TFHE-rs integer ciphertext, as needed by an exporter to read or write one.

use crate::backward_compatibility::description::*;
use crate::dtypes::TfhersIntegerType;
use serde::{Deserialize, Serialize};
use tfhe::core_crypto::prelude::EncryptionKeyChoice;
use tfhe_versionable::Versionize;

/// Number of distinct values the message part of a block can hold
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize, Versionize)]
#[versionize(MessageModulusVersions)]
pub struct MessageModulus(pub u64);

/// Number of distinct values the carry part of a block can hold
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize, Versionize)]
#[versionize(CarryModulusVersions)]
pub struct CarryModulus(pub u64);

/// The maximum value a block can have.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize, Versionize,
)]
#[versionize(DegreeVersions)]
pub struct Degree(u64);

impl Degree {
    pub fn new(degree: u64) -> Self {
        Self(degree)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// This tracks the amount of noise in a block.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize, Versionize,
)]
#[versionize(NoiseLevelVersions)]
pub struct NoiseLevel(u64);

impl NoiseLevel {
    pub const NOMINAL: Self = Self(1);
    pub const ZERO: Self = Self(0);
    // Unknown noise forces a PBS before the block is used on the TFHE-rs side
    pub const UNKNOWN: Self = Self(u64::MAX);

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Shape of a TFHE-rs radix integer ciphertext
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Versionize)]
#[versionize(FheIntDescriptionVersions)]
pub struct FheIntDescription {
    pub width: usize,
    pub is_signed: bool,
    pub message_modulus: MessageModulus,
    pub carry_modulus: CarryModulus,
    pub degree: Degree,
    pub lwe_size: usize,
    pub n_cts: usize,
    pub noise_level: NoiseLevel,
    pub ks_first: bool,
}

impl FheIntDescription {
    /// Builds the description of integers of the given type.
    ///
    /// Only message bits are used at the boundary, so the degree is the largest message value and
    /// the carries are considered empty. The noise level is always [`NoiseLevel::UNKNOWN`]: the
    /// TFHE-rs side has to bootstrap the blocks before computing on them.
    pub fn from_type(ty: &TfhersIntegerType) -> Self {
        let params = ty.params();
        let message_modulus = ty.message_modulus();

        Self {
            width: ty.bit_width(),
            is_signed: ty.is_signed(),
            message_modulus,
            carry_modulus: ty.carry_modulus(),
            degree: Degree::new(message_modulus.0 - 1),
            lwe_size: params.polynomial_size.0 + 1,
            n_cts: ty.n_cts(),
            noise_level: NoiseLevel::UNKNOWN,
            ks_first: params.encryption_key_choice == EncryptionKeyChoice::Big,
        }
    }

    pub fn has_unknown_noise_level(&self) -> bool {
        self.noise_level == NoiseLevel::UNKNOWN
    }
}

impl From<&TfhersIntegerType> for FheIntDescription {
    fn from(ty: &TfhersIntegerType) -> Self {
        Self::from_type(ty)
    }
}

/// Describes the ciphertexts of a TFHErs integer type, see [`FheIntDescription::from_type`].
pub fn describe(ty: &TfhersIntegerType) -> FheIntDescription {
    FheIntDescription::from_type(ty)
}
