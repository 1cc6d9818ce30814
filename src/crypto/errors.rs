use thiserror::Error;

#[derive(Error, Debug)]
pub enum CkksError {
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Encoding failed: {source}")]
    EncodingError {
        #[from]
        source: crate::encoding::EncodingError,
    },

    #[error("Secret key generation failed: {source}")]
    SecretKeyError {
        #[from]
        source: crate::keys::SecretKeyError,
    },

    #[error("Public key generation failed: {source}")]
    PublicKeyError {
        #[from]
        source: crate::keys::PublicKeyError,
    },

    #[error("Sampling failed: {source}")]
    SamplingError {
        #[from]
        source: crate::math::SamplingError,
    },

    #[error("Scale mismatch: expected 2^{expected}, got 2^{actual}")]
    ScaleMismatch { expected: u32, actual: u32 },
}

pub type CkksResult<T> = Result<T, CkksError>;
