use super::KeyId;
use crate::error::KeysetError;
use serde::{Deserialize, Serialize};
use tfhe::core_crypto::prelude::{LweDimension, LweSecretKeyOwned};

/// Parameters a secret key of the keyset must match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweSecretKeyParam {
    pub dimension: LweDimension,
}

impl LweSecretKeyParam {
    pub fn new(dimension: LweDimension) -> Self {
        Self { dimension }
    }

    pub fn check(&self, key: &LweSecretKeyOwned<u64>) -> Result<(), KeysetError> {
        let actual = key.lwe_dimension();
        if actual != self.dimension {
            return Err(KeysetError::DimensionMismatch {
                expected: self.dimension.0,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Deserializes a secret key produced by [`serialize_secret_key`](super::serialize_secret_key)
    /// and checks it against these parameters.
    pub fn deserialize_key(&self, bytes: &[u8]) -> Result<LweSecretKeyOwned<u64>, KeysetError> {
        let key: LweSecretKeyOwned<u64> = bincode::deserialize(bytes)?;
        self.check(&key)?;
        Ok(key)
    }
}

/// Schema of the keyset, indexed by [KeyId]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysetInfo {
    secret_keys: Vec<LweSecretKeyParam>,
}

impl KeysetInfo {
    pub fn new(secret_keys: Vec<LweSecretKeyParam>) -> Self {
        Self { secret_keys }
    }

    pub fn secret_keys(&self) -> &[LweSecretKeyParam] {
        &self.secret_keys
    }

    pub fn secret_key_param(&self, key_id: KeyId) -> Result<LweSecretKeyParam, KeysetError> {
        self.secret_keys
            .get(key_id)
            .copied()
            .ok_or(KeysetError::UnknownKeyId(key_id))
    }
}

/// Key ids of the inputs of one circuit (function) of the program
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInfo {
    pub name: String,
    /// `None` for clear inputs
    pub input_key_ids: Vec<Option<KeyId>>,
}

/// Everything the client side needs to know about a compiled program
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    circuits: Vec<CircuitInfo>,
    keyset: KeysetInfo,
}

impl ProgramInfo {
    pub fn new(keyset: KeysetInfo) -> Self {
        Self {
            circuits: Vec::new(),
            keyset,
        }
    }

    pub fn with_circuit(
        mut self,
        name: impl Into<String>,
        input_key_ids: impl IntoIterator<Item = Option<KeyId>>,
    ) -> Self {
        self.circuits.push(CircuitInfo {
            name: name.into(),
            input_key_ids: input_key_ids.into_iter().collect(),
        });
        self
    }

    pub fn circuits(&self) -> &[CircuitInfo] {
        &self.circuits
    }

    pub fn keyset(&self) -> &KeysetInfo {
        &self.keyset
    }

    pub fn circuit(&self, name: &str) -> Result<&CircuitInfo, KeysetError> {
        self.circuits
            .iter()
            .find(|circuit| circuit.name == name)
            .ok_or_else(|| KeysetError::UnknownCircuit(name.to_owned()))
    }

    /// Id of the secret key input `index` of `circuit` is encrypted under
    pub fn input_key_id(&self, circuit: &str, index: usize) -> Result<KeyId, KeysetError> {
        let info = self.circuit(circuit)?;
        match info.input_key_ids.get(index) {
            Some(Some(key_id)) => Ok(*key_id),
            Some(None) => Err(KeysetError::ClearInput {
                circuit: circuit.to_owned(),
                index,
            }),
            None => Err(KeysetError::UnknownInput {
                circuit: circuit.to_owned(),
                index,
            }),
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, KeysetError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, KeysetError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
