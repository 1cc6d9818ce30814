use super::{CkksEngine, CkksResult};
use crate::crypto::engine::CkksParams;
use crate::rings::{BackendType, NaivePolyRing};

pub struct CkksEngineBuilder<const DEGREE: usize> {
    backend: BackendType,
    error_variance: Option<f64>,
    hamming_weight: Option<usize>,
    scale_bits: Option<u32>,
}

impl<const DEGREE: usize> Default for CkksEngineBuilder<DEGREE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEGREE: usize> CkksEngineBuilder<DEGREE> {
    pub const DEFAULT_ERROR_VARIANCE: f64 = 3.2;
    pub const DEFAULT_SCALE_BITS: u32 = 30;

    pub fn new() -> Self {
        Self {
            backend: BackendType::default(),
            error_variance: None,
            hamming_weight: None,
            scale_bits: None,
        }
    }

    pub fn backend(mut self, backend: BackendType) -> Self {
        self.backend = backend;
        self
    }

    pub fn error_variance(mut self, variance: f64) -> Self {
        self.error_variance = Some(variance);
        self
    }

    pub fn hamming_weight(mut self, weight: usize) -> Self {
        self.hamming_weight = Some(weight);
        self
    }

    pub fn scale_bits(mut self, scale_bits: u32) -> Self {
        self.scale_bits = Some(scale_bits);
        self
    }

    fn params(&self) -> CkksParams<DEGREE> {
        CkksParams {
            error_variance: self
                .error_variance
                .unwrap_or(Self::DEFAULT_ERROR_VARIANCE),
            hamming_weight: self.hamming_weight.unwrap_or(DEGREE / 2),
            scale_bits: self.scale_bits.unwrap_or(Self::DEFAULT_SCALE_BITS),
        }
    }

    pub fn build(self) -> CkksResult<CkksEngine<NaivePolyRing<DEGREE>, DEGREE>> {
        let params = self.params();
        match self.backend {
            BackendType::Naive(modulus) => {
                if modulus < 2 {
                    return Err(super::CkksError::InvalidParameter {
                        message: format!("modulus must be at least 2, got {modulus}"),
                    });
                }
                CkksEngine::new(modulus, params)
            }
        }
    }
}
