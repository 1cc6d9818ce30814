use crate::rings::PolyRing;

#[derive(Debug, Clone)]
pub struct Plaintext<P, const DEGREE: usize>
where
    P: PolyRing<DEGREE>,
{
    pub poly: P,
    pub scale_bits: u32,
}

/// CKKS ciphertext `(c0, c1)` with `c0 + c1 * s ≈ m`.
#[derive(Debug, Clone)]
pub struct Ciphertext<P, const DEGREE: usize>
where
    P: PolyRing<DEGREE>,
{
    pub c0: P,
    pub c1: P,
    pub scale_bits: u32, // encoding scale = 2^scale_bits
}
