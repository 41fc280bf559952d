//! The compiled module side of the bridge.
//!
//! - [CompiledModule] is what the bridge needs from a compiled program: its declared function
//!   signatures, its [ProgramInfo], access to its secret keys and a way to generate them.
//! - [Module] is an implementation keeping its [Keyset] behind a lock.

mod keyset;
mod program_info;

pub use keyset::{serialize_secret_key, Keyset};
pub use program_info::{CircuitInfo, KeysetInfo, LweSecretKeyParam, ProgramInfo};

use crate::config::KeygenConfig;
use crate::dtypes::TfhersIntegerType;
use crate::error::KeysetError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;
use tfhe::core_crypto::prelude::LweSecretKeyOwned;

/// Identifier of a secret key in the keyset of a module
pub type KeyId = usize;

/// Dimensions of a tensor value, empty for scalars
pub type Shape = Vec<usize>;

/// Type of a value flowing in or out of a function
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ValueType {
    Clear { is_signed: bool, bit_width: usize },
    /// Encrypted with the native representation of the module
    Encrypted { is_signed: bool, bit_width: usize },
    /// Encrypted as a TFHE-rs integer
    Tfhers(TfhersIntegerType),
}

impl ValueType {
    pub fn as_tfhers(&self) -> Option<&TfhersIntegerType> {
        match self {
            Self::Tfhers(ty) => Some(ty),
            Self::Clear { .. } | Self::Encrypted { .. } => None,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        !matches!(self, Self::Clear { .. })
    }
}

/// A declared input or output of a function
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub value_type: ValueType,
    pub shape: Shape,
}

/// Declared signature of one function of a compiled module
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionGraph {
    name: String,
    inputs: Vec<Node>,
    outputs: Vec<Node>,
}

impl FunctionGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Appends an input after the already declared ones
    pub fn input(mut self, value_type: ValueType, shape: impl Into<Shape>) -> Self {
        self.inputs.push(Node {
            value_type,
            shape: shape.into(),
        });
        self
    }

    /// Appends an output after the already declared ones
    pub fn output(mut self, value_type: ValueType, shape: impl Into<Shape>) -> Self {
        self.outputs.push(Node {
            value_type,
            shape: shape.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordered_inputs(&self) -> &[Node] {
        &self.inputs
    }

    pub fn ordered_outputs(&self) -> &[Node] {
        &self.outputs
    }
}

/// What the bridge needs from a compiled module.
///
/// Key generation mutates the keyset while [CompiledModule::secret_key] reads it: implementors
/// must not let a key generation run concurrently with reads on the same module. [Module] does
/// this with a [RwLock].
pub trait CompiledModule {
    /// Functions of the module, in declaration order
    fn graphs(&self) -> &[FunctionGraph];

    fn program_info(&self) -> &ProgramInfo;

    /// Returns a copy of the secret key `key_id`.
    ///
    /// Fails with [KeysetError::KeysNotGenerated] if no key generation happened yet.
    fn secret_key(&self, key_id: KeyId) -> Result<LweSecretKeyOwned<u64>, KeysetError>;

    /// Generates the keyset, using `initial_keys` as is for the key ids they cover.
    fn keygen(
        &self,
        config: &KeygenConfig,
        initial_keys: BTreeMap<KeyId, LweSecretKeyOwned<u64>>,
    ) -> Result<(), KeysetError>;
}

/// A compiled module holding its keyset in memory
#[derive(Debug)]
pub struct Module {
    graphs: Vec<FunctionGraph>,
    program_info: ProgramInfo,
    keyset: RwLock<Option<Keyset>>,
}

impl Module {
    pub fn new(graphs: Vec<FunctionGraph>, program_info: ProgramInfo) -> Self {
        Self {
            graphs,
            program_info,
            keyset: RwLock::new(None),
        }
    }

    pub fn is_keygen_done(&self) -> bool {
        self.keyset.read().is_ok_and(|keyset| keyset.is_some())
    }

    /// Runs `f` on the generated keyset
    pub fn with_keyset<R>(&self, f: impl FnOnce(&Keyset) -> R) -> Result<R, KeysetError> {
        let guard = self.keyset.read().map_err(|_| KeysetError::Poisoned)?;
        let keyset = guard.as_ref().ok_or(KeysetError::KeysNotGenerated)?;
        Ok(f(keyset))
    }
}

impl CompiledModule for Module {
    fn graphs(&self) -> &[FunctionGraph] {
        &self.graphs
    }

    fn program_info(&self) -> &ProgramInfo {
        &self.program_info
    }

    fn secret_key(&self, key_id: KeyId) -> Result<LweSecretKeyOwned<u64>, KeysetError> {
        self.with_keyset(|keyset| keyset.secret_key(key_id).cloned())?
    }

    #[tracing::instrument(level = "debug", skip(self, initial_keys))]
    fn keygen(
        &self,
        config: &KeygenConfig,
        initial_keys: BTreeMap<KeyId, LweSecretKeyOwned<u64>>,
    ) -> Result<(), KeysetError> {
        let mut guard = self.keyset.write().map_err(|_| KeysetError::Poisoned)?;

        if guard.is_some() && !config.force() {
            tracing::debug!("keys already generated, keeping them");
            return Ok(());
        }

        let keyset = Keyset::generate(self.program_info.keyset(), config, initial_keys)?;
        *guard = Some(keyset);
        Ok(())
    }
}
