use super::graph::{EvaluationError, NodeId};
use super::values::DType;
use crate::crypto::CkksError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("function takes {expected} parameters but {got} were declared")]
    ArityMismatch { expected: usize, got: usize },

    #[error("parameter `{name}` has unsupported type {dtype}")]
    InvalidParameterType { name: String, dtype: DType },

    #[error("function output was not produced by tracing its parameters")]
    ForeignOutput,

    #[error("inputset is empty")]
    EmptyInputset,

    #[error("inputset sample #{index} has {got} values, expected {expected}")]
    InputsetArity {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error(
        "inputset sample #{index}: value {value} of parameter `{parameter}` is not representable as {dtype}"
    )]
    InputsetValueOutOfRange {
        index: usize,
        parameter: String,
        value: i64,
        dtype: DType,
    },

    #[error("evaluating the inputset failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("multiplication of two encrypted values at %{node} is not supported")]
    EncryptedMultiplication { node: NodeId },

    #[error("function output does not depend on any encrypted parameter")]
    ClearOutput,

    #[error("%{node} needs {bits} bits, more than the maximum of {max}")]
    BitWidthExceeded { node: NodeId, bits: u32, max: u32 },

    #[error(
        "values up to {max_abs} at scale 2^{scale_bits} do not fit modulus {modulus}"
    )]
    PrecisionBudgetExceeded {
        max_abs: u64,
        scale_bits: u32,
        modulus: u64,
    },

    #[error(
        "scale 2^{scale_bits} is too small for an estimated decryption noise of {noise:.0}"
    )]
    ScaleBelowNoise { scale_bits: u32, noise: f64 },

    #[error("key generation failed: {0}")]
    Crypto(#[from] CkksError),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("argument {value} for `{parameter}` is not representable as {dtype}")]
    ArgumentOutOfRange {
        parameter: String,
        value: i64,
        dtype: DType,
    },

    #[error("clear evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("decoded result {0} is not a finite number")]
    NonFiniteResult(f64),

    #[error("homomorphic evaluation failed: {0}")]
    Crypto(#[from] CkksError),
}
