use crate::math::{
    SamplingError, center, gaussian_coefficients, reduce_signed,
    ternary_coefficients, uniform_coefficients,
};
use crate::rings::{PolyRing, PolySampler};
use rand::Rng;
use std::ops::{AddAssign, MulAssign, Neg, SubAssign};

/// Ciphertext modulus used when none is configured.
pub const DEFAULT_MODULUS: u64 = 741507920154517877;

/// Polynomial in `Z_q[X]/(X^DEGREE + 1)` with a single `u64` modulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaivePolyRing<const DEGREE: usize> {
    pub coeffs: [u64; DEGREE],
    pub modulus: u64,
}

impl<const DEGREE: usize> NaivePolyRing<DEGREE> {
    fn assert_same_modulus(&self, rhs: &Self) {
        debug_assert_eq!(self.modulus, rhs.modulus, "modulus mismatch");
    }
}

impl<const DEGREE: usize> PolyRing<DEGREE> for NaivePolyRing<DEGREE> {
    type Context = u64; // Just the modulus for naive implementation

    fn zero(context: &Self::Context) -> Self {
        Self {
            coeffs: [0; DEGREE],
            modulus: *context,
        }
    }

    fn from_coeffs(coeffs: &[i64], context: &Self::Context) -> Self {
        let mut result = [0u64; DEGREE];
        for (dst, &src) in result.iter_mut().zip(coeffs) {
            *dst = reduce_signed(src, *context);
        }
        Self {
            coeffs: result,
            modulus: *context,
        }
    }

    fn to_coeffs(&self) -> [i64; DEGREE] {
        self.coeffs.map(|c| center(c, self.modulus))
    }

    fn scalar_mul_assign(&mut self, scalar: i64) {
        let factor = reduce_signed(scalar, self.modulus) as u128;
        let q = self.modulus as u128;
        for coeff in &mut self.coeffs {
            *coeff = ((*coeff as u128 * factor) % q) as u64;
        }
    }

    fn context(&self) -> &Self::Context {
        &self.modulus
    }
}

impl<const DEGREE: usize> AddAssign<&Self> for NaivePolyRing<DEGREE> {
    fn add_assign(&mut self, rhs: &Self) {
        self.assert_same_modulus(rhs);
        let q = self.modulus as u128;
        for (lhs, &rhs) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *lhs = ((*lhs as u128 + rhs as u128) % q) as u64;
        }
    }
}

impl<const DEGREE: usize> SubAssign<&Self> for NaivePolyRing<DEGREE> {
    fn sub_assign(&mut self, rhs: &Self) {
        self.assert_same_modulus(rhs);
        let q = self.modulus as u128;
        for (lhs, &rhs) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *lhs = ((*lhs as u128 + q - rhs as u128) % q) as u64;
        }
    }
}

impl<const DEGREE: usize> MulAssign<&Self> for NaivePolyRing<DEGREE> {
    fn mul_assign(&mut self, rhs: &Self) {
        self.assert_same_modulus(rhs);
        // Schoolbook multiplication with X^DEGREE + 1 reduction
        let q = self.modulus as u128;
        let mut result = [0u128; DEGREE];

        for i in 0..DEGREE {
            for j in 0..DEGREE {
                let product = (self.coeffs[i] as u128 * rhs.coeffs[j] as u128) % q;
                let pos = i + j;
                if pos < DEGREE {
                    result[pos] = (result[pos] + product) % q;
                } else {
                    // X^DEGREE = -1, so X^(DEGREE+k) = -X^k
                    let wrapped = pos - DEGREE;
                    result[wrapped] = (result[wrapped] + q - product) % q;
                }
            }
        }

        self.coeffs = result.map(|x| x as u64);
    }
}

impl<const DEGREE: usize> Neg for NaivePolyRing<DEGREE> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for coeff in &mut self.coeffs {
            *coeff = (self.modulus - *coeff) % self.modulus;
        }
        self
    }
}

impl<const DEGREE: usize> PolySampler<DEGREE> for NaivePolyRing<DEGREE> {
    fn sample_uniform<R: Rng>(
        context: &Self::Context,
        rng: &mut R,
    ) -> Result<Self, SamplingError> {
        Ok(Self {
            coeffs: uniform_coefficients::<DEGREE, R>(*context, rng)?,
            modulus: *context,
        })
    }

    fn sample_gaussian<R: Rng>(
        std_dev: f64,
        context: &Self::Context,
        rng: &mut R,
    ) -> Result<Self, SamplingError> {
        Ok(Self {
            coeffs: gaussian_coefficients::<DEGREE, R>(std_dev, *context, rng)?,
            modulus: *context,
        })
    }

    fn sample_tribits<R: Rng>(
        hamming_weight: usize,
        context: &Self::Context,
        rng: &mut R,
    ) -> Result<Self, SamplingError> {
        let ternary = ternary_coefficients::<DEGREE, R>(hamming_weight, rng)?;
        Ok(Self::from_coeffs(&ternary, context))
    }
}
