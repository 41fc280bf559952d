/// Options of a key generation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeygenConfig {
    pub(crate) force: bool,
    pub(crate) seed: Option<u128>,
    pub(crate) encryption_seed: Option<u128>,
}

impl KeygenConfig {
    /// Whether keys are generated again even if the module already has some
    pub fn force(&self) -> bool {
        self.force
    }

    /// Seed of the secret keys randomness, a fresh one is drawn when absent
    pub fn seed(&self) -> Option<u128> {
        self.seed
    }

    /// Seed of the encryption randomness, a fresh one is drawn when absent
    pub fn encryption_seed(&self) -> Option<u128> {
        self.encryption_seed
    }
}

/// The builder to create your keygen config
///
/// ```rust
/// use tfhers_bridge::KeygenConfigBuilder;
///
/// let config = KeygenConfigBuilder::default()
///     .force(true)
///     .seed(42)
///     .build();
///
/// assert!(config.force());
/// assert_eq!(config.seed(), Some(42));
/// assert_eq!(config.encryption_seed(), None);
/// ```
#[derive(Clone, Default)]
pub struct KeygenConfigBuilder {
    config: KeygenConfig,
}

impl KeygenConfigBuilder {
    pub fn force(mut self, force: bool) -> Self {
        self.config.force = force;
        self
    }

    pub fn seed(mut self, seed: u128) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn encryption_seed(mut self, encryption_seed: u128) -> Self {
        self.config.encryption_seed = Some(encryption_seed);
        self
    }

    pub fn build(self) -> KeygenConfig {
        self.config
    }
}

impl From<KeygenConfigBuilder> for KeygenConfig {
    fn from(builder: KeygenConfigBuilder) -> Self {
        builder.build()
    }
}
