pub mod sampling;
pub mod utils;

pub use sampling::{
    SamplingError, gaussian_coefficients, ternary_coefficients,
    uniform_coefficients,
};
pub use utils::{center, reduce_signed};
