//! Compiles integer arithmetic functions into circuits evaluated over
//! CKKS ciphertexts.
//!
//! ```ignore
//! let mut circuit = compile_function(
//!     |x: Tracer| x - 24,
//!     &[("x", ScalarValue::encrypted(DType::UnsignedInteger(6)))],
//!     24i64..64,
//!     &CompilationConfiguration::benchmark(),
//! )?;
//! assert_eq!(circuit.run(&[45])?, 21);
//! ```

pub mod bounds;
pub mod circuit;
pub mod config;
pub mod errors;
pub mod graph;
pub mod tracer;
pub mod values;

pub use bounds::Bounds;
pub use circuit::CompiledCircuit;
pub use config::{CompilationConfiguration, ConfigError};
pub use errors::{CompilationError, RuntimeError};
pub use graph::{EvaluationError, OpGraph, Operation};
pub use tracer::{CircuitFunction, Tracer};
pub use values::{DType, ScalarValue};

/// Ring degree used by [`compile_function`].
pub const DEFAULT_DEGREE: usize = 16;

pub type DefaultCircuit = CompiledCircuit<DEFAULT_DEGREE>;

/// One inputset entry: a value per circuit parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample(pub Vec<i64>);

impl From<i64> for Sample {
    fn from(value: i64) -> Self {
        Sample(vec![value])
    }
}

impl From<(i64, i64)> for Sample {
    fn from((a, b): (i64, i64)) -> Self {
        Sample(vec![a, b])
    }
}

impl<const N: usize> From<[i64; N]> for Sample {
    fn from(values: [i64; N]) -> Self {
        Sample(values.to_vec())
    }
}

impl From<Vec<i64>> for Sample {
    fn from(values: Vec<i64>) -> Self {
        Sample(values)
    }
}

/// Compiles `function` at the [`DEFAULT_DEGREE`].
pub fn compile_function<F, Args, I, S>(
    function: F,
    parameters: &[(&str, ScalarValue)],
    inputset: I,
    configuration: &CompilationConfiguration,
) -> Result<DefaultCircuit, CompilationError>
where
    F: CircuitFunction<Args>,
    I: IntoIterator<Item = S>,
    S: Into<Sample>,
{
    CompiledCircuit::compile(function, parameters, inputset, configuration)
}
