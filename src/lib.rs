pub mod bench;
pub mod cli;
pub mod compiler;
pub mod crypto;
pub mod encoding;
pub mod keys;
pub mod math;
pub mod rings;

pub use compiler::{
    CompilationConfiguration, CompilationError, CompiledCircuit, DType,
    RuntimeError, ScalarValue, Tracer, compile_function,
};
pub use crypto::{Ciphertext, CkksEngine, CkksError, Plaintext};
pub use keys::{PublicKey, SecretKey};
pub use rings::{NaivePolyRing, PolyRing, PolySampler};
