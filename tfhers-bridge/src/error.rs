use crate::bridge::{SlotAddress, SlotKind};
use crate::module::KeyId;
use thiserror::Error;

/// Error returned by the [`Bridge`](crate::Bridge) operations
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Module contains more than one function, so please provide the function name \
         while calling '{operation}' (got {address}). An example address would be ('my_func', 1)."
    )]
    MissingFunctionName {
        operation: &'static str,
        address: SlotAddress,
    },

    #[error("Module has no function named '{0}'")]
    UnknownFunction(String),

    #[error("{kind} {index} is out of range for function '{function}' which has {count} {kind}s")]
    SlotOutOfRange {
        function: String,
        kind: SlotKind,
        index: usize,
        count: usize,
    },

    #[error("{kind} {index} of function '{function}' is not a TFHErs value")]
    NotTfhersValue {
        function: String,
        kind: SlotKind,
        index: usize,
    },

    #[error("failed deserializing key for input {address}. Make sure the key is for the right input")]
    KeyDeserialization {
        address: SlotAddress,
        #[source]
        source: KeysetError,
    },

    #[error(transparent)]
    Keyset(#[from] KeysetError),

    #[error("TFHErs exporter failed")]
    Exporter(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Error reported by a module while looking up or generating its keys
#[derive(Error, Debug)]
pub enum KeysetError {
    #[error("Keys have not been generated yet, call keygen first")]
    KeysNotGenerated,

    #[error("Program info has no circuit named '{0}'")]
    UnknownCircuit(String),

    #[error("Input {index} of circuit '{circuit}' does not exist")]
    UnknownInput { circuit: String, index: usize },

    #[error("Input {index} of circuit '{circuit}' is not encrypted and has no secret key")]
    ClearInput { circuit: String, index: usize },

    #[error("Keyset has no secret key with id {0}")]
    UnknownKeyId(KeyId),

    #[error("Secret key has dimension {actual} but the keyset expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Secret key could not be (de)serialized")]
    Serialization(#[from] bincode::Error),

    #[error("Keyset lock was poisoned by a panicking thread")]
    Poisoned,
}

/// Error raised when building a TFHErs integer type or encoding clear values with it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Message width must be greater than zero")]
    ZeroMessageWidth,

    #[error("Bit width {bit_width} is not a multiple of the message width {msg_width}")]
    UnalignedBitWidth { bit_width: usize, msg_width: usize },

    #[error("A block of {msg_width} message bits and {carry_width} carry bits does not fit in 64 bits")]
    BlockTooWide { msg_width: usize, carry_width: usize },

    #[error("Clear values of {bit_width} bits are not supported (at most {max} bits)")]
    UnsupportedClearWidth { bit_width: usize, max: usize },

    #[error("Value {value} is out of range [{min}, {max}]")]
    ValueOutOfRange { value: i128, min: i128, max: i128 },

    #[error("Expected {expected} blocks but got {actual}")]
    BlockCountMismatch { expected: usize, actual: usize },

    #[error("Block {index} has value {value} which is not below the message modulus {modulus}")]
    BlockOutOfRange { index: usize, value: u64, modulus: u64 },
}
