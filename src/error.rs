//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while validating a predictor configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be at least 1 bit wide")]
    ZeroWidth { name: &'static str },

    #[error("{name} is {bits} bits wide (at most {max} are supported)")]
    TooWide { name: &'static str, bits: usize, max: usize },

    #[error("perceptron table must have at least one entry")]
    EmptyPerceptronTable,

    #[error("perceptron history length must be at least 1")]
    EmptyPerceptronHistory,

    #[error("perceptron weights must be between 2 and 16 bits wide (got {0})")]
    WeightBits(u32),

    #[error("perceptron output overflows with {history_len} history bits and {weight_bits}-bit weights")]
    OutputRange { history_len: usize, weight_bits: u32 },

    #[error("perceptron hash multiplier must be non-zero")]
    ZeroMultiplier,

    #[error("unknown predictor '{0}'")]
    UnknownPredictor(String),

    #[error("invalid predictor field '{field}' in '{spec}'")]
    InvalidField { spec: String, field: String },

    #[error("too many fields for predictor '{0}'")]
    TooManyFields(String),
}

/// Errors produced while reading a branch trace.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to read trace '{0}': {1}")]
    Open(PathBuf, #[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected '<pc> <outcome>', got '{text}'")]
    Malformed { line: usize, text: String },

    #[error("line {line}: invalid program counter '{text}'")]
    InvalidPc { line: usize, text: String },

    #[error("line {line}: invalid outcome '{text}' (expected 0/1 or n/t)")]
    InvalidOutcome { line: usize, text: String },
}

/// Type alias for [Result] with [ConfigError].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type alias for [Result] with [TraceError].
pub type TraceResult<T> = Result<T, TraceError>;
