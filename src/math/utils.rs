/// Maps a signed integer into `[0, modulus)`.
#[inline]
pub fn reduce_signed(value: i64, modulus: u64) -> u64 {
    let reduced = value.unsigned_abs() % modulus;
    if value < 0 && reduced != 0 {
        modulus - reduced
    } else {
        reduced
    }
}

/// Centered representative of `value` in `(-modulus/2, modulus/2]`.
#[inline]
pub fn center(value: u64, modulus: u64) -> i64 {
    if value > modulus / 2 {
        -((modulus - value) as i64)
    } else {
        value as i64
    }
}
