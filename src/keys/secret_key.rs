//! Secret Key (sk): a sparse ternary polynomial s(X) in R_q.
use crate::math::SamplingError;
use crate::rings::PolySampler;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretKeyError {
    #[error("Hamming weight {0} exceeds ring dimension {1}")]
    InvalidHammingWeight(usize, usize),
    #[error("Secret key sampling failed: {0}")]
    Sampling(#[from] SamplingError),
}

/// Parameters for secret key generation.
#[derive(Debug, Clone, Copy)]
pub struct SecretKeyParams<const DEGREE: usize> {
    pub hamming_weight: usize,
}

impl<const DEGREE: usize> SecretKeyParams<DEGREE> {
    pub fn new(hamming_weight: usize) -> Result<Self, SecretKeyError> {
        if hamming_weight > DEGREE {
            return Err(SecretKeyError::InvalidHammingWeight(
                hamming_weight,
                DEGREE,
            ));
        }
        Ok(Self { hamming_weight })
    }
}

#[derive(Debug, Clone)]
pub struct SecretKey<P, const DEGREE: usize>
where
    P: PolySampler<DEGREE>,
{
    pub poly: P,
}

impl<P, const DEGREE: usize> SecretKey<P, DEGREE>
where
    P: PolySampler<DEGREE>,
{
    /// Generate a new sparse ternary secret key.
    pub fn generate<R: Rng>(
        params: &SecretKeyParams<DEGREE>,
        context: &P::Context,
        rng: &mut R,
    ) -> Result<Self, SecretKeyError> {
        let poly = P::sample_tribits(params.hamming_weight, context, rng)?;
        Ok(Self { poly })
    }
}
