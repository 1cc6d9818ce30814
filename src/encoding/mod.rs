mod fft;

pub use fft::{EncodingParams, RustFftEncoder, decode, encode};
use thiserror::Error;

pub type EncodingResult<T> = Result<T, EncodingError>;

#[derive(Error, Debug, PartialEq)]
pub enum EncodingError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Ring degree {degree} not supported")]
    InvalidRingDegree { degree: usize },

    #[error("Scale of 2^{scale_bits} not supported")]
    InvalidScale { scale_bits: u32 },

    #[error("Input too long: got {got}, max {max}")]
    InputTooLong { got: usize, max: usize },

    #[error("Coefficient {value} out of range")]
    CoefficientOutOfRange { value: f64 },
}

/// Maps real slot values to integer polynomial coefficients and back.
pub trait Encoder<const DEGREE: usize>: Send + Sync {
    fn encode(&self, values: &[f64]) -> EncodingResult<[i64; DEGREE]>;
    fn decode(&self, coeffs: &[i64]) -> EncodingResult<Vec<f64>>;
    fn scale_bits(&self) -> u32;
}
