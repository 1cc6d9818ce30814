use super::utils::reduce_signed;
use rand::{Rng, distr::Uniform, seq::SliceRandom};
use rand_distr::{Distribution, Normal};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    #[error("invalid range [0, {0}): max_value must be positive")]
    EmptyRange(u64),
    #[error("std_dev must be finite and positive, got {0}")]
    InvalidStdDev(f64),
    #[error("hamming weight {weight} exceeds degree {degree}")]
    HammingWeightTooLarge { weight: usize, degree: usize },
}

/// Samples uniform integer coefficients in `[0, max_value)`.
pub fn uniform_coefficients<const DEGREE: usize, R: Rng + ?Sized>(
    max_value: u64,
    rng: &mut R,
) -> Result<[u64; DEGREE], SamplingError> {
    let distribution = Uniform::new(0, max_value)
        .map_err(|_| SamplingError::EmptyRange(max_value))?;
    let mut coeffs = [0u64; DEGREE];
    for coeff in &mut coeffs {
        *coeff = distribution.sample(rng);
    }
    Ok(coeffs)
}

/// Samples rounded Gaussian integers and maps them into `[0, max_value)`.
pub fn gaussian_coefficients<const DEGREE: usize, R: Rng + ?Sized>(
    std_dev: f64,
    max_value: u64,
    rng: &mut R,
) -> Result<[u64; DEGREE], SamplingError> {
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return Err(SamplingError::InvalidStdDev(std_dev));
    }
    if max_value == 0 {
        return Err(SamplingError::EmptyRange(max_value));
    }
    let normal = Normal::new(0.0, std_dev)
        .map_err(|_| SamplingError::InvalidStdDev(std_dev))?;

    let mut coeffs = [0u64; DEGREE];
    for coeff in &mut coeffs {
        let noise = normal.sample(rng).round() as i64;
        *coeff = reduce_signed(noise, max_value);
    }
    Ok(coeffs)
}

/// Samples a ternary vector with coefficients in `{-1, 0, 1}`.
///
/// Exactly `hamming_weight` entries are non-zero.
pub fn ternary_coefficients<const DEGREE: usize, R: Rng + ?Sized>(
    hamming_weight: usize,
    rng: &mut R,
) -> Result<[i64; DEGREE], SamplingError> {
    if hamming_weight > DEGREE {
        return Err(SamplingError::HammingWeightTooLarge {
            weight: hamming_weight,
            degree: DEGREE,
        });
    }
    let mut out = [0i64; DEGREE];
    // Shuffle indices and assign signs on the selected support.
    let mut indices: Vec<usize> = (0..DEGREE).collect();
    indices.shuffle(rng);
    for &idx in indices.iter().take(hamming_weight) {
        out[idx] = if rng.random_bool(0.5) { 1 } else { -1 };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn uniform_coefficients_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let coeffs = uniform_coefficients::<128, _>(17, &mut rng).unwrap();
        assert!(coeffs.iter().all(|&c| c < 17));
    }

    #[test]
    fn uniform_coefficients_reject_zero_max_value() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let err = uniform_coefficients::<8, _>(0, &mut rng).unwrap_err();
        assert_eq!(err, SamplingError::EmptyRange(0));
    }

    #[test]
    fn uniform_coefficients_are_roughly_balanced() {
        const DEGREE: usize = 8192;
        const MODULUS: usize = 8;
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let coeffs =
            uniform_coefficients::<DEGREE, _>(MODULUS as u64, &mut rng).unwrap();

        let mut buckets = [0usize; MODULUS];
        for &coeff in &coeffs {
            buckets[coeff as usize] += 1;
        }

        let expected = DEGREE as f64 / MODULUS as f64;
        for &count in &buckets {
            let deviation = (count as f64 - expected).abs();
            assert!(
                deviation <= expected * 0.30,
                "bucket count {count} too far from expected {expected}"
            );
        }
    }

    #[test]
    fn gaussian_coefficients_reject_bad_std_dev() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(gaussian_coefficients::<8, _>(0.0, 17, &mut rng).is_err());
        assert!(gaussian_coefficients::<8, _>(f64::NAN, 17, &mut rng).is_err());
        assert_eq!(
            gaussian_coefficients::<8, _>(2.0, 0, &mut rng).unwrap_err(),
            SamplingError::EmptyRange(0)
        );
    }

    #[test]
    fn gaussian_coefficients_have_reasonable_mean_and_variance() {
        const DEGREE: usize = 16_384;
        let std_dev = 3.2;
        let max_value = 1_000_003u64;
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let coeffs =
            gaussian_coefficients::<DEGREE, _>(std_dev, max_value, &mut rng)
                .unwrap();

        let centered: Vec<f64> = coeffs
            .iter()
            .map(|&x| crate::math::center(x, max_value) as f64)
            .collect();

        let mean = centered.iter().sum::<f64>() / DEGREE as f64;
        let variance = centered
            .iter()
            .map(|&x| (x - mean) * (x - mean))
            .sum::<f64>()
            / DEGREE as f64;

        let expected_variance = std_dev * std_dev;
        assert!(mean.abs() <= 0.25, "mean too far from 0: {mean}");
        assert!(
            (variance - expected_variance).abs() <= expected_variance * 0.35,
            "variance {variance} too far from expected {expected_variance}"
        );
    }

    #[test]
    fn ternary_coefficients_have_exact_hamming_weight() {
        let mut rng = ChaCha20Rng::seed_from_u64(123);
        let coeffs = ternary_coefficients::<256, _>(31, &mut rng).unwrap();
        assert_eq!(coeffs.iter().filter(|&&x| x != 0).count(), 31);
        assert!(coeffs.iter().all(|&x| (-1..=1).contains(&x)));
    }

    #[test]
    fn ternary_coefficients_reject_oversized_weight() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(
            ternary_coefficients::<8, _>(9, &mut rng).unwrap_err(),
            SamplingError::HammingWeightTooLarge {
                weight: 9,
                degree: 8
            }
        );
    }
}
