//! Dynamically typed values, decoupled from any particular Rust type.
//!
//! A [`Value`] is what actually flows between native records and a storage
//! backend: `H5Type::to_value` produces one, the codec turns it into bytes
//! according to a [`TypeDescriptor`](crate::TypeDescriptor), and decoding
//! goes the other way.

use std::error::Error as StdError;
use std::fmt::{self, Display};

use crate::h5type::IntSize;
use crate::scalars::ObjectReference;
use crate::string::StringError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl IntValue {
    pub fn to_i128(self) -> i128 {
        match self {
            IntValue::I8(x) => x.into(),
            IntValue::I16(x) => x.into(),
            IntValue::I32(x) => x.into(),
            IntValue::I64(x) => x.into(),
            IntValue::U8(x) => x.into(),
            IntValue::U16(x) => x.into(),
            IntValue::U32(x) => x.into(),
            IntValue::U64(x) => x.into(),
        }
    }

    pub fn size(self) -> IntSize {
        match self {
            IntValue::I8(_) | IntValue::U8(_) => IntSize::U1,
            IntValue::I16(_) | IntValue::U16(_) => IntSize::U2,
            IntValue::I32(_) | IntValue::U32(_) => IntSize::U4,
            IntValue::I64(_) | IntValue::U64(_) => IntSize::U8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, IntValue::I8(_) | IntValue::I16(_) | IntValue::I32(_) | IntValue::I64(_))
    }

    /// Narrows `value` into the given width, or `None` if it does not fit.
    pub fn from_i128(value: i128, size: IntSize, signed: bool) -> Option<Self> {
        Some(match (size, signed) {
            (IntSize::U1, true) => IntValue::I8(value.try_into().ok()?),
            (IntSize::U2, true) => IntValue::I16(value.try_into().ok()?),
            (IntSize::U4, true) => IntValue::I32(value.try_into().ok()?),
            (IntSize::U8, true) => IntValue::I64(value.try_into().ok()?),
            (IntSize::U1, false) => IntValue::U8(value.try_into().ok()?),
            (IntSize::U2, false) => IntValue::U16(value.try_into().ok()?),
            (IntSize::U4, false) => IntValue::U32(value.try_into().ok()?),
            (IntSize::U8, false) => IntValue::U64(value.try_into().ok()?),
        })
    }
}

macro_rules! impl_int_value_from {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<$ty> for IntValue {
                #[inline]
                fn from(x: $ty) -> Self {
                    IntValue::$variant(x)
                }
            }
        )*
    };
}

impl_int_value_from!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, u8 => U8, u16 => U16, u32 => U32, u64 => U64
);

impl Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_i128())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(IntValue),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Enum(EnumValue),
    Bitfield(u64),
    Time(i64),
    Opaque(Vec<u8>),
    Reference(ObjectReference),
    String(String),
    Array(Vec<Value>),
    VarLenArray(Vec<Value>),
    Compound(Vec<(String, Value)>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueError {
    Mismatch { expected: &'static str, found: &'static str },
    OutOfRange { value: i128, target: &'static str },
    MissingField(String),
    Length { expected: usize, found: usize },
    UnknownVariant(u64),
    String(StringError),
}

impl StdError for ValueError {}

impl Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueError::Mismatch { expected, found } => {
                write!(f, "value error: expected {}, found {}", expected, found)
            }
            ValueError::OutOfRange { value, target } => {
                write!(f, "value error: {} is out of range for {}", value, target)
            }
            ValueError::MissingField(name) => write!(f, "value error: missing field '{}'", name),
            ValueError::Length { expected, found } => {
                write!(f, "value error: expected {} elements, found {}", expected, found)
            }
            ValueError::UnknownVariant(value) => {
                write!(f, "value error: no enum member with value {}", value)
            }
            ValueError::String(err) => write!(f, "value {}", err),
        }
    }
}

impl From<StringError> for ValueError {
    fn from(err: StringError) -> Self {
        ValueError::String(err)
    }
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float32(_) | Value::Float64(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Enum(_) => "enum",
            Value::Bitfield(_) => "bitfield",
            Value::Time(_) => "time",
            Value::Opaque(_) => "opaque",
            Value::Reference(_) => "reference",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::VarLenArray(_) => "variable-length array",
            Value::Compound(_) => "compound",
        }
    }

    fn mismatch<T>(&self, expected: &'static str) -> Result<T, ValueError> {
        Err(ValueError::Mismatch { expected, found: self.kind() })
    }

    pub fn as_int(&self) -> Result<IntValue, ValueError> {
        match self {
            Value::Integer(x) => Ok(*x),
            _ => self.mismatch("integer"),
        }
    }

    pub fn as_f64(&self) -> Result<f64, ValueError> {
        match *self {
            Value::Float32(x) => Ok(x.into()),
            Value::Float64(x) => Ok(x),
            _ => self.mismatch("float"),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match *self {
            Value::Boolean(x) => Ok(x),
            _ => self.mismatch("boolean"),
        }
    }

    /// Raw bits of an enum member; plain integers are accepted as well.
    pub fn enum_bits(&self) -> Result<u64, ValueError> {
        match self {
            Value::Enum(x) => Ok(x.value),
            Value::Integer(x) => Ok(x.to_i128() as u64),
            _ => self.mismatch("enum"),
        }
    }

    pub fn as_bitfield(&self) -> Result<u64, ValueError> {
        match *self {
            Value::Bitfield(x) => Ok(x),
            _ => self.mismatch("bitfield"),
        }
    }

    pub fn as_time(&self) -> Result<i64, ValueError> {
        match *self {
            Value::Time(x) => Ok(x),
            _ => self.mismatch("time"),
        }
    }

    pub fn as_opaque(&self) -> Result<&[u8], ValueError> {
        match self {
            Value::Opaque(x) => Ok(x),
            _ => self.mismatch("opaque"),
        }
    }

    pub fn as_reference(&self) -> Result<ObjectReference, ValueError> {
        match *self {
            Value::Reference(x) => Ok(x),
            _ => self.mismatch("reference"),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(x) => Ok(x),
            _ => self.mismatch("string"),
        }
    }

    pub fn as_array(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::Array(x) => Ok(x),
            _ => self.mismatch("array"),
        }
    }

    pub fn as_varlen(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::VarLenArray(x) => Ok(x),
            _ => self.mismatch("variable-length array"),
        }
    }

    pub fn as_compound(&self) -> Result<&[(String, Value)], ValueError> {
        match self {
            Value::Compound(x) => Ok(x),
            _ => self.mismatch("compound"),
        }
    }

    /// Looks up a compound member by name.
    pub fn field(&self, name: &str) -> Result<&Value, ValueError> {
        self.as_compound()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| ValueError::MissingField(name.to_owned()))
    }
}

fn write_list<'a, I>(f: &mut fmt::Formatter, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    write!(f, "[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i != 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(x) => write!(f, "{}", x),
            Value::Float32(x) => write!(f, "{}", x),
            Value::Float64(x) => write!(f, "{}", x),
            Value::Boolean(x) => write!(f, "{}", x),
            Value::Enum(x) => write!(f, "{}", x.name),
            Value::Bitfield(x) => write!(f, "{:#b}", x),
            Value::Time(x) => write!(f, "@{}", x),
            Value::Opaque(x) => {
                write!(f, "<")?;
                for b in x {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, ">")
            }
            Value::Reference(x) => write!(f, "{}", x),
            Value::String(x) => write!(f, "{:?}", x),
            Value::Array(x) | Value::VarLenArray(x) => write_list(f, x),
            Value::Compound(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_int_value_narrowing() {
        assert_eq!(IntValue::from_i128(-128, IntSize::U1, true), Some(IntValue::I8(-128)));
        assert_eq!(IntValue::from_i128(-129, IntSize::U1, true), None);
        assert_eq!(IntValue::from_i128(255, IntSize::U1, false), Some(IntValue::U8(255)));
        assert_eq!(IntValue::from_i128(-1, IntSize::U8, false), None);
        assert_eq!(IntValue::U64(u64::MAX).to_i128(), u64::MAX as i128);
        assert!(IntValue::I16(0).is_signed());
        assert_eq!(IntValue::U32(7).size(), IntSize::U4);
    }

    #[test]
    pub fn test_accessors() {
        let v = Value::Compound(vec![
            ("a".into(), Value::Integer(1u8.into())),
            ("b".into(), Value::Float32(0.5)),
        ]);
        assert_eq!(v.field("a").unwrap().as_int().unwrap(), IntValue::U8(1));
        assert_eq!(v.field("b").unwrap().as_f64().unwrap(), 0.5);
        assert_eq!(v.field("c"), Err(ValueError::MissingField("c".into())));
        assert_eq!(
            v.as_int(),
            Err(ValueError::Mismatch { expected: "integer", found: "compound" })
        );
        assert_eq!(Value::Integer(IntValue::I8(2)).enum_bits().unwrap(), 2);
    }

    #[test]
    pub fn test_display() {
        let v = Value::Compound(vec![
            ("id".into(), Value::Integer(IntValue::U64(1000))),
            ("s".into(), Value::String("x".into())),
            ("a".into(), Value::Array(vec![Value::Boolean(true), Value::Bitfield(5)])),
            ("o".into(), Value::Opaque(b"AB".to_vec())),
        ]);
        assert_eq!(v.to_string(), "{id: 1000, s: \"x\", a: [true, 0b101], o: <4142>}");
        assert_eq!(
            ValueError::OutOfRange { value: 300, target: "uint8" }.to_string(),
            "value error: 300 is out of range for uint8"
        );
    }
}
