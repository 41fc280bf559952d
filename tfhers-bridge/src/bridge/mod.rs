//! Conversion of TFHE-rs integers at the boundary of a compiled module.
//!
//! A [Bridge] scans the declared signatures of a [CompiledModule] once, then routes each
//! conversion or key operation to the right function slot, secret key and ciphertext layout.

mod address;
mod signature;

pub use address::{SlotAddress, SlotKind};
pub use signature::{FunctionSignature, SignatureTable, TfhersSlot};

use crate::config::KeygenConfig;
use crate::description::FheIntDescription;
use crate::error::Error;
use crate::exporter::TfhersExporter;
use crate::module::{serialize_secret_key, CompiledModule, KeyId};
use crate::Result;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tfhe::core_crypto::prelude::LweSecretKeyOwned;

#[cfg(test)]
mod tests;

/// Bridge between a compiled module and TFHE-rs integer ciphertexts.
///
/// Addresses passed to the bridge are either `(function, index)` pairs or bare indices, the
/// latter being only accepted when the module has a single function.
pub struct Bridge<'m, M: CompiledModule + ?Sized, E: TfhersExporter> {
    module: &'m M,
    exporter: E,
    default_function: Option<String>,
    signatures: SignatureTable,
}

impl<'m, M: CompiledModule + ?Sized, E: TfhersExporter> Bridge<'m, M, E> {
    pub fn new(module: &'m M, exporter: E) -> Self {
        let graphs = module.graphs();
        let default_function = match graphs {
            [graph] => Some(graph.name().to_owned()),
            _ => None,
        };

        Self {
            module,
            exporter,
            default_function,
            signatures: SignatureTable::from_graphs(graphs),
        }
    }

    pub fn module(&self) -> &'m M {
        self.module
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Function bare indices refer to, only set when the module has exactly one function
    pub fn default_function(&self) -> Option<&str> {
        self.default_function.as_deref()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.signatures.functions().iter().map(FunctionSignature::name)
    }

    pub fn signatures(&self) -> &SignatureTable {
        &self.signatures
    }

    fn resolve<'a>(
        &'a self,
        address: &'a SlotAddress,
        operation: &'static str,
    ) -> Result<(&'a str, usize)> {
        match address {
            SlotAddress::Named { function, index } => Ok((function.as_str(), *index)),
            SlotAddress::Positional(index) => match self.default_function() {
                Some(function) => Ok((function, *index)),
                None => Err(Error::MissingFunctionName {
                    operation,
                    address: address.clone(),
                }),
            },
        }
    }

    fn slot(
        &self,
        address: &SlotAddress,
        kind: SlotKind,
        operation: &'static str,
    ) -> Result<Option<&TfhersSlot>> {
        let (function, index) = self.resolve(address, operation)?;
        self.signatures.slot(function, kind, index)
    }

    fn tfhers_slot(
        &self,
        address: &SlotAddress,
        kind: SlotKind,
        operation: &'static str,
    ) -> Result<&TfhersSlot> {
        let (function, index) = self.resolve(address, operation)?;
        self.signatures
            .slot(function, kind, index)?
            .ok_or_else(|| Error::NotTfhersValue {
                function: function.to_owned(),
                kind,
                index,
            })
    }

    fn key_id(&self, address: &SlotAddress, operation: &'static str) -> Result<KeyId> {
        let (function, index) = self.resolve(address, operation)?;
        self.signatures.slot(function, SlotKind::Input, index)?;
        Ok(self.module.program_info().input_key_id(function, index)?)
    }

    /// TFHErs type and shape of an input, `None` if it is not a TFHErs value
    pub fn input_slot(&self, input: impl Into<SlotAddress>) -> Result<Option<&TfhersSlot>> {
        self.slot(&input.into(), SlotKind::Input, "input_slot")
    }

    /// TFHErs type and shape of an output, `None` if it is not a TFHErs value
    pub fn output_slot(&self, output: impl Into<SlotAddress>) -> Result<Option<&TfhersSlot>> {
        self.slot(&output.into(), SlotKind::Output, "output_slot")
    }

    pub fn input_description(&self, input: impl Into<SlotAddress>) -> Result<FheIntDescription> {
        let slot = self.tfhers_slot(&input.into(), SlotKind::Input, "input_description")?;
        Ok(slot.description())
    }

    pub fn output_description(
        &self,
        output: impl Into<SlotAddress>,
    ) -> Result<FheIntDescription> {
        let slot = self.tfhers_slot(&output.into(), SlotKind::Output, "output_description")?;
        Ok(slot.description())
    }

    /// Id of the secret key an input is encrypted under
    pub fn input_key_id(&self, input: impl Into<SlotAddress>) -> Result<KeyId> {
        self.key_id(&input.into(), "input_key_id")
    }

    /// Builds a native value of the module from a serialized TFHE-rs integer.
    pub fn import_value(&self, buffer: &[u8], input: impl Into<SlotAddress>) -> Result<E::Value> {
        const OPERATION: &str = "import_value";

        let address = input.into();
        let slot = self.tfhers_slot(&address, SlotKind::Input, OPERATION)?;
        let key_id = self.key_id(&address, OPERATION)?;
        let description = slot.description();
        let variance = slot.ty.params().encryption_variance();

        self.exporter
            .import_int(buffer, &description, key_id, variance, &slot.shape)
            .map_err(|err| Error::Exporter(Box::new(err)))
    }

    /// Serializes a native value of the module as a TFHE-rs integer.
    pub fn export_value(&self, value: &E::Value, output: impl Into<SlotAddress>) -> Result<Vec<u8>> {
        let slot = self.tfhers_slot(&output.into(), SlotKind::Output, "export_value")?;
        let description = slot.description();

        self.exporter
            .export_int(value, &description)
            .map_err(|err| Error::Exporter(Box::new(err)))
    }

    /// Serializes the secret key an input is encrypted under.
    ///
    /// Fails with [KeysetError::KeysNotGenerated](crate::KeysetError::KeysNotGenerated) before
    /// the module keys are generated.
    pub fn serialize_input_secret_key(&self, input: impl Into<SlotAddress>) -> Result<Vec<u8>> {
        let key_id = self.key_id(&input.into(), "serialize_input_secret_key")?;
        let secret_key = self.module.secret_key(key_id)?;
        Ok(serialize_secret_key(&secret_key)?)
    }

    /// Generates the module keys without providing any of them.
    pub fn keygen(&self, config: impl Into<KeygenConfig>) -> Result<()> {
        self.keygen_with_initial_keys(std::iter::empty::<(SlotAddress, &[u8])>(), config)
    }

    /// Generates the module keys, using the given serialized secret keys for the inputs they are
    /// paired with.
    ///
    /// Inputs sharing a secret key only need one of them to be provided: when several entries map
    /// to the same key, the first one is used and the others are ignored. Nothing is generated if
    /// any entry fails to resolve or deserialize.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn keygen_with_initial_keys<I, A, B>(
        &self,
        initial_keys: I,
        config: impl Into<KeygenConfig>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<SlotAddress>,
        B: AsRef<[u8]>,
    {
        const OPERATION: &str = "keygen_with_initial_keys";

        let config = config.into();
        let keyset_info = self.module.program_info().keyset();

        let mut accepted: BTreeMap<KeyId, (SlotAddress, B, LweSecretKeyOwned<u64>)> =
            BTreeMap::new();
        for (address, bytes) in initial_keys {
            let address = address.into();
            let key_id = self.key_id(&address, OPERATION)?;

            match accepted.entry(key_id) {
                Entry::Occupied(entry) => {
                    let (first_address, first_bytes, _) = entry.get();
                    if first_bytes.as_ref() == bytes.as_ref() {
                        tracing::debug!(
                            %address, key_id, %first_address,
                            "secret key already provided, skipping"
                        );
                    } else {
                        tracing::warn!(
                            %address, key_id, %first_address,
                            "another secret key was already provided for this input, ignoring this one"
                        );
                    }
                }
                Entry::Vacant(entry) => {
                    let key = keyset_info
                        .secret_key_param(key_id)
                        .and_then(|param| param.deserialize_key(bytes.as_ref()))
                        .map_err(|source| Error::KeyDeserialization {
                            address: address.clone(),
                            source,
                        })?;
                    tracing::debug!(%address, key_id, "using provided secret key");
                    entry.insert((address, bytes, key));
                }
            }
        }

        let initial_keys = accepted
            .into_iter()
            .map(|(key_id, (_, _, key))| (key_id, key))
            .collect();

        tracing::debug!(?config, "generating keys");
        self.module.keygen(&config, initial_keys)?;
        Ok(())
    }
}
