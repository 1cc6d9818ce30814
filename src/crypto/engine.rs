use super::builder::CkksEngineBuilder;
use super::types::{Ciphertext, Plaintext};
use super::{CkksError, CkksResult};
use crate::encoding::{Encoder, RustFftEncoder};
use crate::keys::{
    PublicKey, PublicKeyParams, SecretKey, SecretKeyParams,
};
use crate::rings::PolySampler;
use rand::Rng;

pub struct CkksEngine<P, const DEGREE: usize>
where
    P: PolySampler<DEGREE>,
{
    context: P::Context,
    encoder: RustFftEncoder<DEGREE>,
    pub params: CkksParams<DEGREE>,
}

#[derive(Debug, Clone)]
pub struct CkksParams<const DEGREE: usize> {
    pub error_variance: f64,
    pub hamming_weight: usize,
    pub scale_bits: u32,
}

impl<P, const DEGREE: usize> CkksEngine<P, DEGREE>
where
    P: PolySampler<DEGREE>,
{
    pub fn builder() -> CkksEngineBuilder<DEGREE> {
        CkksEngineBuilder::new()
    }

    pub fn new(
        context: P::Context,
        params: CkksParams<DEGREE>,
    ) -> CkksResult<Self> {
        if !(params.error_variance.is_finite() && params.error_variance > 0.0) {
            return Err(CkksError::InvalidParameter {
                message: format!(
                    "error variance must be positive, got {}",
                    params.error_variance
                ),
            });
        }
        let encoder = RustFftEncoder::new(params.scale_bits)?;
        Ok(Self {
            context,
            encoder,
            params,
        })
    }

    pub fn context(&self) -> &P::Context {
        &self.context
    }

    fn error_std(&self) -> f64 {
        self.params.error_variance.sqrt()
    }

    pub fn generate_secret_key<R: Rng>(
        &self,
        rng: &mut R,
    ) -> CkksResult<SecretKey<P, DEGREE>> {
        let sk_params = SecretKeyParams::new(self.params.hamming_weight)?;
        Ok(SecretKey::generate(&sk_params, &self.context, rng)?)
    }

    pub fn generate_public_key<R: Rng>(
        &self,
        secret_key: &SecretKey<P, DEGREE>,
        rng: &mut R,
    ) -> CkksResult<PublicKey<P, DEGREE>> {
        let pk_params = PublicKeyParams::new(self.error_std())?;
        Ok(PublicKey::generate(
            secret_key,
            &pk_params,
            &self.context,
            rng,
        )?)
    }

    pub fn encode(&self, values: &[f64]) -> CkksResult<Plaintext<P, DEGREE>> {
        let coeffs = self.encoder.encode(values)?;
        Ok(Plaintext {
            poly: P::from_coeffs(&coeffs, &self.context),
            scale_bits: self.params.scale_bits,
        })
    }

    pub fn decode(&self, plaintext: &Plaintext<P, DEGREE>) -> CkksResult<Vec<f64>> {
        check_scale(self.params.scale_bits, plaintext.scale_bits)?;
        Ok(self.encoder.decode(&plaintext.poly.to_coeffs())?)
    }

    /// Public-key encryption:
    /// `c0 = b * u + e0 + m`, `c1 = a * u + e1` with ternary `u`.
    pub fn encrypt<R: Rng>(
        &self,
        plaintext: &Plaintext<P, DEGREE>,
        public_key: &PublicKey<P, DEGREE>,
        rng: &mut R,
    ) -> CkksResult<Ciphertext<P, DEGREE>> {
        let u = P::sample_tribits(self.params.hamming_weight, &self.context, rng)?;
        let e0 = P::sample_gaussian(self.error_std(), &self.context, rng)?;
        let e1 = P::sample_gaussian(self.error_std(), &self.context, rng)?;

        let mut c0 = public_key.b.clone();
        c0 *= &u;
        c0 += &e0;
        c0 += &plaintext.poly;

        let mut c1 = public_key.a.clone();
        c1 *= &u;
        c1 += &e1;

        Ok(Ciphertext {
            c0,
            c1,
            scale_bits: plaintext.scale_bits,
        })
    }

    /// `m ≈ c0 + c1 * s`
    pub fn decrypt(
        ciphertext: &Ciphertext<P, DEGREE>,
        secret_key: &SecretKey<P, DEGREE>,
    ) -> Plaintext<P, DEGREE> {
        let mut result = ciphertext.c1.clone();
        result *= &secret_key.poly;
        result += &ciphertext.c0;

        Plaintext {
            poly: result,
            scale_bits: ciphertext.scale_bits,
        }
    }

    pub fn add(
        ct1: &Ciphertext<P, DEGREE>,
        ct2: &Ciphertext<P, DEGREE>,
    ) -> CkksResult<Ciphertext<P, DEGREE>> {
        check_scale(ct1.scale_bits, ct2.scale_bits)?;
        let mut out = ct1.clone();
        out.c0 += &ct2.c0;
        out.c1 += &ct2.c1;
        Ok(out)
    }

    pub fn sub(
        ct1: &Ciphertext<P, DEGREE>,
        ct2: &Ciphertext<P, DEGREE>,
    ) -> CkksResult<Ciphertext<P, DEGREE>> {
        check_scale(ct1.scale_bits, ct2.scale_bits)?;
        let mut out = ct1.clone();
        out.c0 -= &ct2.c0;
        out.c1 -= &ct2.c1;
        Ok(out)
    }

    pub fn neg(ct: &Ciphertext<P, DEGREE>) -> Ciphertext<P, DEGREE> {
        Ciphertext {
            c0: -ct.c0.clone(),
            c1: -ct.c1.clone(),
            scale_bits: ct.scale_bits,
        }
    }

    pub fn add_plain(
        ct: &Ciphertext<P, DEGREE>,
        pt: &Plaintext<P, DEGREE>,
    ) -> CkksResult<Ciphertext<P, DEGREE>> {
        check_scale(ct.scale_bits, pt.scale_bits)?;
        let mut out = ct.clone();
        out.c0 += &pt.poly;
        Ok(out)
    }

    pub fn sub_plain(
        ct: &Ciphertext<P, DEGREE>,
        pt: &Plaintext<P, DEGREE>,
    ) -> CkksResult<Ciphertext<P, DEGREE>> {
        check_scale(ct.scale_bits, pt.scale_bits)?;
        let mut out = ct.clone();
        out.c0 -= &pt.poly;
        Ok(out)
    }

    /// Product with a public integer. The scale is unchanged, so no
    /// rescaling is needed.
    pub fn mul_integer(
        ct: &Ciphertext<P, DEGREE>,
        factor: i64,
    ) -> Ciphertext<P, DEGREE> {
        let mut out = ct.clone();
        out.c0.scalar_mul_assign(factor);
        out.c1.scalar_mul_assign(factor);
        out
    }
}

fn check_scale(expected: u32, actual: u32) -> CkksResult<()> {
    if expected != actual {
        return Err(CkksError::ScaleMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rings::NaivePolyRing;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const DEGREE: usize = 16;
    type Engine = CkksEngine<NaivePolyRing<DEGREE>, DEGREE>;

    fn engine() -> Engine {
        Engine::builder().scale_bits(30).build().unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let engine = engine();
        let mut rng = ChaCha20Rng::seed_from_u64(123);
        let sk = engine.generate_secret_key(&mut rng).unwrap();
        let pk = engine.generate_public_key(&sk, &mut rng).unwrap();

        let pt = engine.encode(&[1.5, -2.25, 40.0]).unwrap();
        let ct = engine.encrypt(&pt, &pk, &mut rng).unwrap();
        let decoded = engine.decode(&Engine::decrypt(&ct, &sk)).unwrap();

        for (dec, expected) in decoded.iter().zip([1.5, -2.25, 40.0]) {
            assert_abs_diff_eq!(*dec, expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_linear_operations() {
        let engine = engine();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let sk = engine.generate_secret_key(&mut rng).unwrap();
        let pk = engine.generate_public_key(&sk, &mut rng).unwrap();

        let x = engine
            .encrypt(&engine.encode(&[41.0]).unwrap(), &pk, &mut rng)
            .unwrap();
        let y = engine
            .encrypt(&engine.encode(&[5.0]).unwrap(), &pk, &mut rng)
            .unwrap();
        let c = engine.encode(&[24.0]).unwrap();

        let decrypt = |ct: &Ciphertext<_, DEGREE>| {
            engine.decode(&Engine::decrypt(ct, &sk)).unwrap()[0]
        };

        assert_abs_diff_eq!(
            decrypt(&Engine::add(&x, &y).unwrap()),
            46.0,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            decrypt(&Engine::sub(&x, &y).unwrap()),
            36.0,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            decrypt(&Engine::sub_plain(&x, &c).unwrap()),
            17.0,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            decrypt(&Engine::add_plain(&x, &c).unwrap()),
            65.0,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(decrypt(&Engine::neg(&y)), -5.0, epsilon = 1e-3);
        assert_abs_diff_eq!(
            decrypt(&Engine::mul_integer(&y, -3)),
            -15.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_scale_mismatch_is_rejected() {
        let engine = engine();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let sk = engine.generate_secret_key(&mut rng).unwrap();
        let pk = engine.generate_public_key(&sk, &mut rng).unwrap();
        let ct = engine
            .encrypt(&engine.encode(&[1.0]).unwrap(), &pk, &mut rng)
            .unwrap();
        let mut pt = engine.encode(&[1.0]).unwrap();
        pt.scale_bits = 20;

        assert!(matches!(
            Engine::add_plain(&ct, &pt),
            Err(CkksError::ScaleMismatch {
                expected: 30,
                actual: 20
            })
        ));
    }

    #[test]
    fn test_rejects_bad_variance() {
        let result = Engine::builder().error_variance(-1.0).build();
        assert!(matches!(result, Err(CkksError::InvalidParameter { .. })));
    }
}
