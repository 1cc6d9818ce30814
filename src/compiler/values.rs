//! Integer value types declared for circuit parameters.
use std::fmt;

/// Widest integer type a circuit value may have.
pub const MAX_DTYPE_BITS: u32 = 62;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// `[0, 2^bits)`
    UnsignedInteger(u32),
    /// `[-2^(bits-1), 2^(bits-1))`
    Integer(u32),
}

impl DType {
    pub fn bit_width(&self) -> u32 {
        match *self {
            DType::UnsignedInteger(bits) | DType::Integer(bits) => bits,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, DType::Integer(_))
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            DType::UnsignedInteger(bits) => (1..=MAX_DTYPE_BITS).contains(&bits),
            DType::Integer(bits) => (2..=MAX_DTYPE_BITS).contains(&bits),
        }
    }

    pub fn min_value(&self) -> i64 {
        match *self {
            DType::UnsignedInteger(_) => 0,
            DType::Integer(bits) => -(1i64 << (bits - 1)),
        }
    }

    pub fn max_value(&self) -> i64 {
        match *self {
            DType::UnsignedInteger(bits) => (1i64 << bits) - 1,
            DType::Integer(bits) => (1i64 << (bits - 1)) - 1,
        }
    }

    pub fn can_represent(&self, value: i64) -> bool {
        (self.min_value()..=self.max_value()).contains(&value)
    }

    /// Smallest type holding every value of `[min, max]`.
    pub fn fitting(min: i64, max: i64) -> DType {
        if min >= 0 {
            DType::UnsignedInteger(unsigned_bits(max as u64).max(1))
        } else {
            // two's complement needs one bit more than the magnitude
            let magnitude = (min.unsigned_abs() - 1).max(max.max(0) as u64);
            DType::Integer(unsigned_bits(magnitude) + 1)
        }
    }
}

fn unsigned_bits(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::UnsignedInteger(bits) => write!(f, "uint{bits}"),
            DType::Integer(bits) => write!(f, "int{bits}"),
        }
    }
}

/// Declared type of a scalar circuit parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarValue {
    pub dtype: DType,
    pub is_encrypted: bool,
}

impl ScalarValue {
    pub fn encrypted(dtype: DType) -> Self {
        Self {
            dtype,
            is_encrypted: true,
        }
    }

    pub fn clear(dtype: DType) -> Self {
        Self {
            dtype,
            is_encrypted: false,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visibility = if self.is_encrypted { "Encrypted" } else { "Clear" };
        write!(f, "{visibility}Scalar<{}>", self.dtype)
    }
}
