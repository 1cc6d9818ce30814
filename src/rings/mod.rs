pub mod backends;
pub mod traits;

pub use backends::{DEFAULT_MODULUS, NaivePolyRing};
pub use traits::{PolyRing, PolySampler};

/// Ring backend selected when building an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Naive(u64),
}

impl Default for BackendType {
    fn default() -> Self {
        Self::Naive(DEFAULT_MODULUS)
    }
}
