//! Welcome to the tfhers-bridge documentation!
//!
//! This crate lets a compiled FHE module exchange encrypted integers with TFHE-rs:
//!
//! - [`Bridge`] imports serialized TFHE-rs integers as native module values and exports native
//!   values back, routing each value to the right function slot, secret key and ciphertext layout.
//! - [`Bridge::keygen_with_initial_keys`] generates the module keys while reusing TFHE-rs secret
//!   keys for chosen inputs, and [`Bridge::serialize_input_secret_key`] goes the other way.
//! - [`TfhersIntegerType`] and [`FheIntDescription`] describe how an integer is split in blocks
//!   and under which parameters those blocks are encrypted.
//!
//! Reading and writing the ciphertexts themselves is left to a [`TfhersExporter`].

pub mod backward_compatibility;
mod bridge;
mod config;
pub mod description;
pub mod dtypes;
mod error;
pub mod exporter;
pub mod module;

pub use bridge::{Bridge, FunctionSignature, SignatureTable, SlotAddress, SlotKind, TfhersSlot};
pub use config::{KeygenConfig, KeygenConfigBuilder};
pub use description::{describe, FheIntDescription};
pub use dtypes::{CryptoParams, TfhersIntegerType};
pub use error::{Error, KeysetError, TypeError};
pub use exporter::TfhersExporter;
pub use module::{CompiledModule, KeyId, Module};

pub type Result<T, E = Error> = std::result::Result<T, E>;
