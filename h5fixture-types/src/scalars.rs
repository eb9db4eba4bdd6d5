//! Scalar wrappers for the HDF5 type classes that have no direct Rust primitive.

use std::fmt;

use crate::h5type::{FixedPointType, H5Type, IntSize, TypeDescriptor};
use crate::value::{IntValue, Value, ValueError};

/// Address of a dataset within a file; `0` is the null reference.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectReference(u64);

impl ObjectReference {
    pub const NULL: Self = Self(0);

    #[inline]
    pub const fn from_addr(addr: u64) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn addr(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_null() {
            write!(f, "&null")
        } else {
            write!(f, "&{:#x}", self.0)
        }
    }
}

impl H5Type for ObjectReference {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Reference
    }

    fn to_value(&self) -> Value {
        Value::Reference(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_reference()
    }
}

macro_rules! impl_bitfield {
    ($($name:ident($ty:ty, $size:ident)),*) => {
        $(
            #[repr(transparent)]
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct $name(pub $ty);

            impl H5Type for $name {
                #[inline]
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::Bitfield(IntSize::$size)
                }

                fn to_value(&self) -> Value {
                    Value::Bitfield(self.0.into())
                }

                fn from_value(value: &Value) -> Result<Self, ValueError> {
                    let bits = value.as_bitfield()?;
                    bits.try_into().map(Self).map_err(|_| ValueError::OutOfRange {
                        value: bits.into(),
                        target: stringify!($name),
                    })
                }
            }
        )*
    };
}

impl_bitfield!(Bitfield8(u8, U1), Bitfield16(u16, U2), Bitfield32(u32, U4), Bitfield64(u64, U8));

/// Seconds since the Unix epoch, stored with the 8-byte time class.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl H5Type for Timestamp {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Time
    }

    fn to_value(&self) -> Value {
        Value::Time(self.0)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_time().map(Self)
    }
}

/// Unsigned fixed-point number in a 64-bit word with `OFFSET` fractional bits.
///
/// The word is stored as-is; the descriptor advertises `64 - OFFSET` bits of
/// precision starting at bit `OFFSET`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScaledU64<const OFFSET: u32>(u64);

impl<const OFFSET: u32> ScaledU64<OFFSET> {
    const FRACTION_MASK: u64 = (1 << OFFSET) - 1;

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Builds a value from its integral part and a fraction in units of `2^-OFFSET`.
    ///
    /// Panics if `fraction` does not fit into `OFFSET` bits.
    pub fn from_parts(integral: u64, fraction: u64) -> Self {
        assert!(fraction <= Self::FRACTION_MASK, "fraction {} exceeds {} bits", fraction, OFFSET);
        Self((integral << OFFSET) | fraction)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn integral(self) -> u64 {
        self.0 >> OFFSET
    }

    #[inline]
    pub const fn fraction(self) -> u64 {
        self.0 & Self::FRACTION_MASK
    }

    pub fn to_f64(self) -> f64 {
        self.integral() as f64 + self.fraction() as f64 / (1u64 << OFFSET) as f64
    }
}

impl<const OFFSET: u32> H5Type for ScaledU64<OFFSET> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::FixedPoint(FixedPointType {
            size: IntSize::U8,
            signed: false,
            bit_offset: OFFSET,
            precision: 64 - OFFSET,
        })
    }

    fn to_value(&self) -> Value {
        Value::Integer(IntValue::U64(self.0))
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        u64::from_value(value).map(Self)
    }
}

impl<const OFFSET: u32> fmt::Display for ScaledU64<OFFSET> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_scaled() {
        type S = ScaledU64<7>;
        let x = S::from_parts(3, 96);
        assert_eq!(x.raw(), (3 << 7) | 96);
        assert_eq!(x.integral(), 3);
        assert_eq!(x.fraction(), 96);
        assert_eq!(x.to_f64(), 3.75);
        assert_eq!(S::from_raw(1 << 7).to_f64(), 1.0);
        assert_eq!(
            S::type_descriptor(),
            TypeDescriptor::FixedPoint(FixedPointType {
                size: IntSize::U8,
                signed: false,
                bit_offset: 7,
                precision: 57,
            })
        );
    }

    #[test]
    #[should_panic(expected = "exceeds 7 bits")]
    pub fn test_scaled_fraction_overflow() {
        ScaledU64::<7>::from_parts(1, 128);
    }

    #[test]
    pub fn test_bitfield() {
        assert_eq!(Bitfield8(0b1010_1010).to_value(), Value::Bitfield(170));
        assert_eq!(Bitfield8::from_value(&Value::Bitfield(3)).unwrap(), Bitfield8(3));
        assert!(Bitfield8::from_value(&Value::Bitfield(256)).is_err());
        assert_eq!(Bitfield32::type_descriptor().size(), 4);
    }

    #[test]
    pub fn test_reference() {
        assert!(ObjectReference::NULL.is_null());
        assert_eq!(ObjectReference::from_addr(16).to_string(), "&0x10");
        assert_eq!(ObjectReference::type_descriptor().size(), 8);
    }
}
