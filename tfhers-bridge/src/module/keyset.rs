use super::{KeyId, KeysetInfo};
use crate::config::KeygenConfig;
use crate::error::KeysetError;
use std::collections::BTreeMap;
use tfhe::core_crypto::commons::generators::SecretRandomGenerator;
use tfhe::core_crypto::commons::math::random::{Seed, Seeder};
use tfhe::core_crypto::prelude::{
    allocate_and_generate_new_binary_lwe_secret_key, DefaultRandomGenerator, LweSecretKeyOwned,
};
use tfhe::core_crypto::seeders::new_seeder;

/// Secret keys of a module, indexed by [KeyId]
#[derive(Clone, Debug)]
pub struct Keyset {
    secret_keys: Vec<LweSecretKeyOwned<u64>>,
    encryption_seed: u128,
}

impl Keyset {
    /// Generates a keyset following `info`.
    ///
    /// Keys found in `initial_keys` are taken as is, the others are drawn from a secret generator
    /// seeded with the config seed (or a fresh one).
    pub fn generate(
        info: &KeysetInfo,
        config: &KeygenConfig,
        mut initial_keys: BTreeMap<KeyId, LweSecretKeyOwned<u64>>,
    ) -> Result<Self, KeysetError> {
        for (&key_id, key) in &initial_keys {
            info.secret_key_param(key_id)?.check(key)?;
        }

        let mut seeder: Option<Box<dyn Seeder>> = None;
        let mut fresh_seed = || seeder.get_or_insert_with(new_seeder).seed();

        let mut secret_generator = None;
        let mut secret_keys = Vec::with_capacity(info.secret_keys().len());

        for (key_id, param) in info.secret_keys().iter().enumerate() {
            if let Some(key) = initial_keys.remove(&key_id) {
                tracing::debug!(key_id, "using provided secret key");
                secret_keys.push(key);
                continue;
            }

            let generator = secret_generator.get_or_insert_with(|| {
                let seed = config.seed().map_or_else(&mut fresh_seed, Seed);
                SecretRandomGenerator::<DefaultRandomGenerator>::new(seed)
            });
            tracing::debug!(key_id, dimension = param.dimension.0, "generating secret key");
            secret_keys.push(allocate_and_generate_new_binary_lwe_secret_key(
                param.dimension,
                generator,
            ));
        }

        let encryption_seed = config
            .encryption_seed()
            .unwrap_or_else(|| fresh_seed().0);

        Ok(Self {
            secret_keys,
            encryption_seed,
        })
    }

    pub fn secret_keys(&self) -> &[LweSecretKeyOwned<u64>] {
        &self.secret_keys
    }

    pub fn secret_key(&self, key_id: KeyId) -> Result<&LweSecretKeyOwned<u64>, KeysetError> {
        self.secret_keys
            .get(key_id)
            .ok_or(KeysetError::UnknownKeyId(key_id))
    }

    /// Seed the client side encryption randomness is derived from
    pub fn encryption_seed(&self) -> u128 {
        self.encryption_seed
    }
}

/// Serializes a secret key in the format [`LweSecretKeyParam::deserialize_key`] reads back.
///
/// [`LweSecretKeyParam::deserialize_key`]: super::LweSecretKeyParam::deserialize_key
pub fn serialize_secret_key(key: &LweSecretKeyOwned<u64>) -> Result<Vec<u8>, KeysetError> {
    Ok(bincode::serialize(key)?)
}
