//! TFHE-rs integer types as declared by the inputs and outputs of a compiled module.
//!
//! A [`TfhersIntegerType`] tells how an integer of `bit_width` bits is split in blocks of
//! `msg_width` message bits (each block also reserving `carry_width` carry bits) and under which
//! [`CryptoParams`] the blocks are encrypted on the TFHE-rs side.

use crate::description::{CarryModulus, MessageModulus};
use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use tfhe::core_crypto::prelude::{
    DecompositionBaseLog, DecompositionLevelCount, EncryptionKeyChoice, GlweDimension,
    LweDimension, PolynomialSize, StandardDev,
};


/// Largest bit width for which clear values can be encoded or decoded.
pub const MAX_CLEAR_BIT_WIDTH: usize = 64;

/// Cryptographic parameters used to encrypt the blocks of a TFHErs integer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CryptoParams {
    pub lwe_dimension: LweDimension,
    pub glwe_dimension: GlweDimension,
    pub polynomial_size: PolynomialSize,
    pub pbs_base_log: DecompositionBaseLog,
    pub pbs_level: DecompositionLevelCount,
    pub lwe_noise_distribution: StandardDev,
    pub glwe_noise_distribution: StandardDev,
    pub encryption_key_choice: EncryptionKeyChoice,
}

impl CryptoParams {
    /// Same values as the TFHE-rs `PARAM_MESSAGE_2_CARRY_2_KS_PBS_GAUSSIAN_2M128` block
    /// parameters.
    pub const PARAM_MESSAGE_2_CARRY_2_KS_PBS_GAUSSIAN_2M128: Self = Self {
        lwe_dimension: LweDimension(866),
        glwe_dimension: GlweDimension(1),
        polynomial_size: PolynomialSize(2048),
        pbs_base_log: DecompositionBaseLog(23),
        pbs_level: DecompositionLevelCount(1),
        lwe_noise_distribution: StandardDev(2.046151696979124e-06),
        glwe_noise_distribution: StandardDev(2.845267479601915e-15),
        encryption_key_choice: EncryptionKeyChoice::Big,
    };

    /// Variance of the noise added when encrypting under these parameters.
    ///
    /// With a big encryption key the ciphertext lives under the GLWE key seen as an LWE key, so
    /// the GLWE noise applies, otherwise the LWE one does.
    pub fn encryption_variance(&self) -> f64 {
        let std_dev = match self.encryption_key_choice {
            EncryptionKeyChoice::Big => self.glwe_noise_distribution.0,
            EncryptionKeyChoice::Small => self.lwe_noise_distribution.0,
        };
        std_dev * std_dev
    }

    /// Dimension of the LWE secret key fresh ciphertexts are encrypted under.
    pub fn encryption_key_dimension(&self) -> LweDimension {
        match self.encryption_key_choice {
            EncryptionKeyChoice::Big => {
                LweDimension(self.glwe_dimension.0 * self.polynomial_size.0)
            }
            EncryptionKeyChoice::Small => self.lwe_dimension,
        }
    }
}

/// Type of a TFHE-rs integer crossing the boundary of a compiled module.
///
/// The fields are only reachable through accessors so that `bit_width` is always a non-zero
/// multiple of `msg_width`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTfhersIntegerType")]
pub struct TfhersIntegerType {
    is_signed: bool,
    bit_width: usize,
    carry_width: usize,
    msg_width: usize,
    params: CryptoParams,
}

#[derive(Deserialize)]
struct UncheckedTfhersIntegerType {
    is_signed: bool,
    bit_width: usize,
    carry_width: usize,
    msg_width: usize,
    params: CryptoParams,
}

impl TryFrom<UncheckedTfhersIntegerType> for TfhersIntegerType {
    type Error = TypeError;

    fn try_from(value: UncheckedTfhersIntegerType) -> Result<Self, Self::Error> {
        Self::new(
            value.is_signed,
            value.bit_width,
            value.carry_width,
            value.msg_width,
            value.params,
        )
    }
}

impl TfhersIntegerType {
    pub fn new(
        is_signed: bool,
        bit_width: usize,
        carry_width: usize,
        msg_width: usize,
        params: CryptoParams,
    ) -> Result<Self, TypeError> {
        if msg_width == 0 {
            return Err(TypeError::ZeroMessageWidth);
        }
        if bit_width == 0 || bit_width % msg_width != 0 {
            return Err(TypeError::UnalignedBitWidth {
                bit_width,
                msg_width,
            });
        }
        if msg_width + carry_width >= u64::BITS as usize {
            return Err(TypeError::BlockTooWide {
                msg_width,
                carry_width,
            });
        }

        Ok(Self {
            is_signed,
            bit_width,
            carry_width,
            msg_width,
            params,
        })
    }

    pub fn is_signed(&self) -> bool {
        self.is_signed
    }

    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    pub fn carry_width(&self) -> usize {
        self.carry_width
    }

    pub fn msg_width(&self) -> usize {
        self.msg_width
    }

    pub fn params(&self) -> &CryptoParams {
        &self.params
    }

    /// Number of blocks (LWE ciphertexts) an integer of this type is made of
    pub fn n_cts(&self) -> usize {
        self.bit_width / self.msg_width
    }

    pub fn message_modulus(&self) -> MessageModulus {
        MessageModulus(1 << self.msg_width)
    }

    pub fn carry_modulus(&self) -> CarryModulus {
        CarryModulus(1 << self.carry_width)
    }

    /// Smallest clear value representable by this type
    pub fn min(&self) -> Result<i128, TypeError> {
        self.check_clear_width()?;
        if self.is_signed {
            Ok(-(1i128 << (self.bit_width - 1)))
        } else {
            Ok(0)
        }
    }

    /// Largest clear value representable by this type
    pub fn max(&self) -> Result<i128, TypeError> {
        self.check_clear_width()?;
        if self.is_signed {
            Ok((1i128 << (self.bit_width - 1)) - 1)
        } else {
            Ok((1i128 << self.bit_width) - 1)
        }
    }

    /// Splits a clear value into `n_cts` blocks of `msg_width` bits, least significant first.
    ///
    /// Negative values are encoded in two's complement over `bit_width` bits.
    pub fn encode(&self, value: i128) -> Result<Vec<u64>, TypeError> {
        let (min, max) = (self.min()?, self.max()?);
        if value < min || value > max {
            return Err(TypeError::ValueOutOfRange { value, min, max });
        }

        let mut raw = (value as u128) & ((1u128 << self.bit_width) - 1);
        let block_mask = (1u128 << self.msg_width) - 1;

        Ok((0..self.n_cts())
            .map(|_| {
                let block = (raw & block_mask) as u64;
                raw >>= self.msg_width;
                block
            })
            .collect())
    }

    /// Recomposes a clear value from its blocks, least significant first.
    pub fn decode(&self, blocks: &[u64]) -> Result<i128, TypeError> {
        self.check_clear_width()?;
        if blocks.len() != self.n_cts() {
            return Err(TypeError::BlockCountMismatch {
                expected: self.n_cts(),
                actual: blocks.len(),
            });
        }

        let modulus = self.message_modulus().0;
        let mut raw = 0u128;
        for (index, &block) in blocks.iter().enumerate() {
            if block >= modulus {
                return Err(TypeError::BlockOutOfRange {
                    index,
                    value: block,
                    modulus,
                });
            }
            raw |= u128::from(block) << (index * self.msg_width);
        }

        let sign_bit = (raw >> (self.bit_width - 1)) & 1;
        if self.is_signed && sign_bit == 1 {
            Ok(raw as i128 - (1i128 << self.bit_width))
        } else {
            Ok(raw as i128)
        }
    }

    fn check_clear_width(&self) -> Result<(), TypeError> {
        if self.bit_width > MAX_CLEAR_BIT_WIDTH {
            return Err(TypeError::UnsupportedClearWidth {
                bit_width: self.bit_width,
                max: MAX_CLEAR_BIT_WIDTH,
            });
        }
        Ok(())
    }
}

macro_rules! impl_2_2_presets {
    ($($name:ident => ($is_signed:literal, $bit_width:literal)),* $(,)?) => {
        impl TfhersIntegerType {
            $(
                #[doc = concat!(
                    "`", stringify!($name), "`: ", stringify!($bit_width),
                    " bits split in blocks of 2 message bits and 2 carry bits"
                )]
                pub fn $name(params: CryptoParams) -> Self {
                    Self {
                        is_signed: $is_signed,
                        bit_width: $bit_width,
                        carry_width: 2,
                        msg_width: 2,
                        params,
                    }
                }
            )*
        }
    };
}

impl_2_2_presets!(
    uint8_2_2 => (false, 8),
    int8_2_2 => (true, 8),
    uint16_2_2 => (false, 16),
    int16_2_2 => (true, 16),
    uint32_2_2 => (false, 32),
    int32_2_2 => (true, 32),
    uint64_2_2 => (false, 64),
    int64_2_2 => (true, 64),
);
