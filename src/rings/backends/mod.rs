pub mod naive;

pub use naive::{DEFAULT_MODULUS, NaivePolyRing};
