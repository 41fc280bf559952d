//! Boundary between the bridge and the code reading or writing TFHE-rs ciphertexts.

use crate::description::FheIntDescription;
use crate::module::KeyId;

/// Converts serialized TFHE-rs integers to and from the native values of a compiled module.
///
/// The bridge resolves every type, key and noise parameter before calling an exporter, so
/// implementations only deal with the ciphertext layout given by the [FheIntDescription].
pub trait TfhersExporter {
    /// Native value of the compiled module
    type Value;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds a native value from the serialized TFHE-rs integer in `buffer`.
    ///
    /// `key_id` is the secret key the value has to be encrypted under on the module side and
    /// `variance` the encryption noise of the blocks. `shape` is empty for scalars.
    fn import_int(
        &self,
        buffer: &[u8],
        description: &FheIntDescription,
        key_id: KeyId,
        variance: f64,
        shape: &[usize],
    ) -> Result<Self::Value, Self::Error>;

    /// Serializes a native value as a TFHE-rs integer.
    fn export_int(
        &self,
        value: &Self::Value,
        description: &FheIntDescription,
    ) -> Result<Vec<u8>, Self::Error>;
}

impl<E: TfhersExporter + ?Sized> TfhersExporter for &E {
    type Value = E::Value;
    type Error = E::Error;

    fn import_int(
        &self,
        buffer: &[u8],
        description: &FheIntDescription,
        key_id: KeyId,
        variance: f64,
        shape: &[usize],
    ) -> Result<Self::Value, Self::Error> {
        (**self).import_int(buffer, description, key_id, variance, shape)
    }

    fn export_int(
        &self,
        value: &Self::Value,
        description: &FheIntDescription,
    ) -> Result<Vec<u8>, Self::Error> {
        (**self).export_int(value, description)
    }
}
