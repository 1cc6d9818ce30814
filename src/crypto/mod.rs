//! High-level CKKS cryptographic operations
//!
//! Key generation, encryption, decryption and the homomorphic operations a
//! compiled circuit needs: additions, subtractions, negation and products
//! with public integers.

pub mod builder;
pub mod engine;
pub mod errors;
pub mod types;

pub use builder::CkksEngineBuilder;
pub use engine::{CkksEngine, CkksParams};
pub use errors::{CkksError, CkksResult};
pub use types::{Ciphertext, Plaintext};
