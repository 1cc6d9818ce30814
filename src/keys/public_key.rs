use crate::keys::SecretKey;
use crate::math::SamplingError;
use crate::rings::PolySampler;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublicKeyError {
    #[error("Public key parameter error: {0}")]
    InvalidParams(String),
    #[error("Public key sampling failed: {0}")]
    Sampling(#[from] SamplingError),
}

/// Parameters for generating a public key.
#[derive(Debug, Clone, Copy)]
pub struct PublicKeyParams<const DEGREE: usize> {
    /// Standard deviation for the error distribution
    pub error_std: f64,
}

impl<const DEGREE: usize> PublicKeyParams<DEGREE> {
    pub fn new(error_std: f64) -> Result<Self, PublicKeyError> {
        if !(error_std.is_finite() && error_std > 0.0) {
            return Err(PublicKeyError::InvalidParams(format!(
                "error_std must be positive, got {error_std}"
            )));
        }
        Ok(Self { error_std })
    }
}

/// RLWE public key.
#[derive(Debug, Clone)]
pub struct PublicKey<P, const DEGREE: usize>
where
    P: PolySampler<DEGREE>,
{
    /// "b" component: b = -(a * s) + e
    pub b: P,
    /// "a" component: uniformly random
    pub a: P,
}

impl<P, const DEGREE: usize> PublicKey<P, DEGREE>
where
    P: PolySampler<DEGREE>,
{
    pub fn generate<R: Rng>(
        secret_key: &SecretKey<P, DEGREE>,
        params: &PublicKeyParams<DEGREE>,
        context: &P::Context,
        rng: &mut R,
    ) -> Result<Self, PublicKeyError> {
        let a = P::sample_uniform(context, rng)?;
        let e = P::sample_gaussian(params.error_std, context, rng)?;

        let mut a_times_s = a.clone();
        a_times_s *= &secret_key.poly;

        let mut b = -a_times_s;
        b += &e;

        Ok(PublicKey { b, a })
    }
}
