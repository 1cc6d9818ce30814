use crate::math::SamplingError;
use rand::Rng;
use std::ops::{AddAssign, MulAssign, Neg, SubAssign};

// Core polynomial ring trait - all CKKS operations work on this
pub trait PolyRing<const DEGREE: usize>:
    Clone
    + std::fmt::Debug
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + Neg<Output = Self>
{
    type Context: Clone + std::fmt::Debug;

    fn zero(context: &Self::Context) -> Self;
    fn from_coeffs(coeffs: &[i64], context: &Self::Context) -> Self;
    /// Centered signed representatives of the coefficients.
    fn to_coeffs(&self) -> [i64; DEGREE];
    /// Multiplies every coefficient by a public integer.
    fn scalar_mul_assign(&mut self, scalar: i64);

    fn context(&self) -> &Self::Context;
}

// Sampling trait - provides common sampling operations for polynomials
pub trait PolySampler<const DEGREE: usize>: PolyRing<DEGREE> {
    fn sample_uniform<R: Rng>(
        context: &Self::Context,
        rng: &mut R,
    ) -> Result<Self, SamplingError>;
    fn sample_gaussian<R: Rng>(
        std_dev: f64,
        context: &Self::Context,
        rng: &mut R,
    ) -> Result<Self, SamplingError>;
    fn sample_tribits<R: Rng>(
        hamming_weight: usize,
        context: &Self::Context,
        rng: &mut R,
    ) -> Result<Self, SamplingError>;
}
