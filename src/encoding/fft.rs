//! CKKS slot encoding for the ring R[X]/(X^n + 1), n a power of 2.
//!
//! A polynomial m(X) is identified with its evaluations at the primitive
//! 2n-th roots of unity zeta_k = psi * omega^k, where psi = e^(i*pi/n) and
//! omega = psi^2. Twisting the coefficients by powers of psi turns those
//! evaluations into a plain length-n DFT, so both directions run through
//! `rustfft`.
//!
//! Real polynomials correspond to slot vectors with z_(n-1-k) = conj(z_k),
//! which leaves n/2 usable slots. Values are scaled by 2^scale_bits before
//! rounding to integer coefficients.
use crate::encoding::{Encoder, EncodingError, EncodingResult};
use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Parameters for the CKKS encoding scheme.
#[derive(Debug, Clone, Copy)]
pub struct EncodingParams<const DEGREE: usize> {
    /// Number of bits used for scaling factor.
    /// The scaling factor will be 2^scale_bits.
    scale_bits: u32,
}

impl<const DEGREE: usize> EncodingParams<DEGREE> {
    pub fn new(scale_bits: u32) -> EncodingResult<Self> {
        // Ring degree must be power of 2 for FFT and CKKS
        if !DEGREE.is_power_of_two() || DEGREE < 2 {
            return Err(EncodingError::InvalidRingDegree { degree: DEGREE });
        }
        if scale_bits == 0 || scale_bits > 62 {
            return Err(EncodingError::InvalidScale { scale_bits });
        }
        Ok(Self { scale_bits })
    }

    pub fn scale_bits(&self) -> u32 {
        self.scale_bits
    }

    /// Gets the scaling factor as a float (2^scale_bits)
    pub fn delta(&self) -> f64 {
        (1u64 << self.scale_bits) as f64
    }

    pub fn degree(&self) -> usize {
        DEGREE
    }

    /// Maximum number of values that can be encoded
    pub fn max_slots(&self) -> usize {
        DEGREE / 2
    }
}

// psi^exponent for the primitive 2n-th root psi = e^(i*pi/n)
fn psi_pow(exponent: f64, degree: usize) -> Complex64 {
    Complex64::from_polar(1.0, PI * exponent / degree as f64)
}

/// Encodes real values into polynomial coefficients.
pub fn encode<const DEGREE: usize>(
    values: &[f64],
    params: &EncodingParams<DEGREE>,
) -> EncodingResult<[i64; DEGREE]> {
    let max_slots = params.max_slots();
    if values.len() > max_slots {
        return Err(EncodingError::InputTooLong {
            got: values.len(),
            max: max_slots,
        });
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(EncodingError::InvalidInput {
            message: format!("non-finite value {bad}"),
        });
    }

    let mut buffer = vec![Complex64::new(0.0, 0.0); DEGREE];
    for (k, &value) in values.iter().enumerate() {
        let slot = Complex64::new(value * params.delta(), 0.0);
        buffer[k] = slot;
        buffer[DEGREE - 1 - k] = slot.conj();
    }

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(DEGREE).process(&mut buffer);

    let inv_n = (DEGREE as f64).recip();
    let mut coeffs = [0i64; DEGREE];
    for (j, (coeff, &b)) in coeffs.iter_mut().zip(&buffer).enumerate() {
        let real = (b * psi_pow(-(j as f64), DEGREE)).re * inv_n;
        if real.abs() >= i64::MAX as f64 {
            return Err(EncodingError::CoefficientOutOfRange { value: real });
        }
        *coeff = real.round() as i64;
    }

    Ok(coeffs)
}

/// Decodes polynomial coefficients back to the `DEGREE / 2` slot values.
pub fn decode<const DEGREE: usize>(
    coeffs: &[i64],
    params: &EncodingParams<DEGREE>,
) -> EncodingResult<Vec<f64>> {
    if coeffs.len() > DEGREE {
        return Err(EncodingError::InputTooLong {
            got: coeffs.len(),
            max: DEGREE,
        });
    }

    let mut buffer = vec![Complex64::new(0.0, 0.0); DEGREE];
    for (j, (dst, &a)) in buffer.iter_mut().zip(coeffs).enumerate() {
        *dst = Complex64::new(a as f64, 0.0) * psi_pow(j as f64, DEGREE);
    }

    let mut planner = FftPlanner::new();
    planner.plan_fft_inverse(DEGREE).process(&mut buffer);

    Ok(buffer
        .iter()
        .take(params.max_slots())
        .map(|z| z.re / params.delta())
        .collect())
}

/// [`Encoder`] backed by `rustfft`.
#[derive(Debug, Clone, Copy)]
pub struct RustFftEncoder<const DEGREE: usize> {
    params: EncodingParams<DEGREE>,
}

impl<const DEGREE: usize> RustFftEncoder<DEGREE> {
    pub fn new(scale_bits: u32) -> EncodingResult<Self> {
        Ok(Self {
            params: EncodingParams::new(scale_bits)?,
        })
    }

    pub fn params(&self) -> &EncodingParams<DEGREE> {
        &self.params
    }
}

impl<const DEGREE: usize> Encoder<DEGREE> for RustFftEncoder<DEGREE> {
    fn encode(&self, values: &[f64]) -> EncodingResult<[i64; DEGREE]> {
        encode(values, &self.params)
    }

    fn decode(&self, coeffs: &[i64]) -> EncodingResult<Vec<f64>> {
        decode(coeffs, &self.params)
    }

    fn scale_bits(&self) -> u32 {
        self.params.scale_bits
    }
}
