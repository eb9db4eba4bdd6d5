use std::fmt::{self, Display};
use std::mem;

use crate::cycle::IntegerRange;
use crate::string::{FixedAscii, FixedUnicode, VarLenAscii};
use crate::value::{IntValue, Value, ValueError};

/// Size of a variable-length slot: element count, heap collection address, object index.
pub const VARLEN_SLOT_SIZE: usize = 16;

/// Size of an object reference slot.
pub const REFERENCE_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntSize {
    U1 = 1,
    U2 = 2,
    U4 = 4,
    U8 = 8,
}

impl IntSize {
    pub fn from_int(size: usize) -> Option<IntSize> {
        match size {
            1 => Some(IntSize::U1),
            2 => Some(IntSize::U2),
            4 => Some(IntSize::U4),
            8 => Some(IntSize::U8),
            _ => None,
        }
    }

    #[inline]
    pub fn bits(self) -> u32 {
        8 * self as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloatSize {
    U4 = 4,
    U8 = 8,
}

impl FloatSize {
    pub fn from_int(size: usize) -> Option<FloatSize> {
        match size {
            4 => Some(FloatSize::U4),
            8 => Some(FloatSize::U8),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub size: IntSize,
    pub signed: bool,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    #[inline]
    pub fn base_type(&self) -> TypeDescriptor {
        if self.signed {
            TypeDescriptor::Integer(self.size)
        } else {
            TypeDescriptor::Unsigned(self.size)
        }
    }

    pub fn member_by_value(&self, value: u64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }

    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Integer stored in a `size`-byte word of which `precision` bits starting
/// at `bit_offset` are significant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedPointType {
    pub size: IntSize,
    pub signed: bool,
    pub bit_offset: u32,
    pub precision: u32,
}

impl FixedPointType {
    /// Range of the significant bits alone.
    pub fn precision_range(&self) -> IntegerRange {
        if self.signed {
            IntegerRange::signed(self.precision)
        } else {
            IntegerRange::unsigned(self.precision)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueType {
    pub size: usize,
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundField {
    pub name: String,
    pub ty: TypeDescriptor,
    pub offset: usize,
    pub index: usize,
}

impl CompoundField {
    pub fn new(name: &str, ty: TypeDescriptor, offset: usize, index: usize) -> Self {
        Self { name: name.to_owned(), ty, offset, index }
    }

    pub fn typed<T: H5Type>(name: &str, offset: usize, index: usize) -> Self {
        Self::new(name, T::type_descriptor(), offset, index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundType {
    pub fields: Vec<CompoundField>,
    pub size: usize,
}

impl CompoundType {
    /// Builds a compound from fields listed in declaration order, laid out
    /// back to back with C alignment.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, TypeDescriptor)>,
    {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(index, (name, ty))| CompoundField { name, ty, offset: 0, index })
            .collect();
        CompoundType { fields, size: 0 }.to_c_repr()
    }

    pub fn field(&self, name: &str) -> Option<&CompoundField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn to_c_repr(&self) -> CompoundType {
        let mut layout = self.clone();
        layout.fields.sort_by_key(|f| f.index);
        let mut offset: usize = 0;
        let mut max_align: usize = 1;
        for f in &mut layout.fields {
            f.ty = f.ty.to_c_repr();
            let align = f.ty.c_alignment();
            offset = offset.next_multiple_of(align);
            f.offset = offset;
            max_align = max_align.max(align);
            offset += f.ty.size();
        }
        layout.size = offset.next_multiple_of(max_align);
        layout
    }

    pub fn to_packed_repr(&self) -> CompoundType {
        let mut layout = self.clone();
        layout.fields.sort_by_key(|f| f.index);
        layout.size = 0;
        for f in &mut layout.fields {
            f.ty = f.ty.to_packed_repr();
            f.offset = layout.size;
            layout.size += f.ty.size();
        }
        layout
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDescriptor {
    Integer(IntSize),
    Unsigned(IntSize),
    FixedPoint(FixedPointType),
    Float(FloatSize),
    Boolean,
    Enum(EnumType),
    Compound(CompoundType),
    FixedArray(Box<TypeDescriptor>, usize),
    FixedAscii(usize),
    FixedUnicode(usize),
    VarLenArray(Box<TypeDescriptor>),
    VarLenAscii,
    VarLenUnicode,
    Bitfield(IntSize),
    Opaque(OpaqueType),
    Reference,
    Time,
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeDescriptor::Integer(size) => write!(f, "int{}", size.bits()),
            TypeDescriptor::Unsigned(size) => write!(f, "uint{}", size.bits()),
            TypeDescriptor::FixedPoint(tp) => write!(
                f,
                "{}fixed{} (bits {}..{})",
                if tp.signed { "" } else { "u" },
                tp.size.bits(),
                tp.bit_offset,
                tp.bit_offset + tp.precision
            ),
            TypeDescriptor::Float(FloatSize::U4) => write!(f, "float32"),
            TypeDescriptor::Float(FloatSize::U8) => write!(f, "float64"),
            TypeDescriptor::Boolean => write!(f, "bool"),
            TypeDescriptor::Enum(ref tp) => write!(f, "enum ({})", tp.base_type()),
            TypeDescriptor::Compound(ref tp) => write!(f, "compound ({} fields)", tp.fields.len()),
            TypeDescriptor::FixedArray(ref tp, n) => write!(f, "[{}; {}]", tp, n),
            TypeDescriptor::FixedAscii(n) => write!(f, "string (len {})", n),
            TypeDescriptor::FixedUnicode(n) => write!(f, "unicode (len {})", n),
            TypeDescriptor::VarLenArray(ref tp) => write!(f, "[{}] (var len)", tp),
            TypeDescriptor::VarLenAscii => write!(f, "string (var len)"),
            TypeDescriptor::VarLenUnicode => write!(f, "unicode (var len)"),
            TypeDescriptor::Bitfield(size) => write!(f, "bitfield{}", size.bits()),
            TypeDescriptor::Opaque(ref tp) => write!(f, "opaque (len {})", tp.size),
            TypeDescriptor::Reference => write!(f, "reference"),
            TypeDescriptor::Time => write!(f, "time"),
        }
    }
}

impl TypeDescriptor {
    pub fn size(&self) -> usize {
        use self::TypeDescriptor::*;

        match *self {
            Integer(size) | Unsigned(size) | Bitfield(size) => size as _,
            FixedPoint(ref tp) => tp.size as _,
            Float(size) => size as _,
            Boolean => 1,
            Enum(ref enum_type) => enum_type.size as _,
            Compound(ref compound) => compound.size,
            FixedArray(ref ty, len) => ty.size() * len,
            FixedAscii(len) | FixedUnicode(len) => len,
            VarLenArray(_) | VarLenAscii | VarLenUnicode => VARLEN_SLOT_SIZE,
            Opaque(ref tp) => tp.size,
            Reference => REFERENCE_SIZE,
            Time => 8,
        }
    }

    pub fn c_alignment(&self) -> usize {
        use self::TypeDescriptor::*;

        match *self {
            Compound(ref compound) => {
                compound.fields.iter().map(|f| f.ty.c_alignment()).max().unwrap_or(1)
            }
            FixedArray(ref ty, _) => ty.c_alignment(),
            FixedAscii(_) | FixedUnicode(_) | Opaque(_) => 1,
            VarLenArray(_) | VarLenAscii | VarLenUnicode | Reference => 8,
            _ => self.size(),
        }
    }

    pub fn to_c_repr(&self) -> Self {
        use self::TypeDescriptor::*;

        match *self {
            Compound(ref compound) => Compound(compound.to_c_repr()),
            FixedArray(ref ty, size) => FixedArray(Box::new(ty.to_c_repr()), size),
            VarLenArray(ref ty) => VarLenArray(Box::new(ty.to_c_repr())),
            _ => self.clone(),
        }
    }

    pub fn to_packed_repr(&self) -> Self {
        use self::TypeDescriptor::*;

        match *self {
            Compound(ref compound) => Compound(compound.to_packed_repr()),
            FixedArray(ref ty, size) => FixedArray(Box::new(ty.to_packed_repr()), size),
            VarLenArray(ref ty) => VarLenArray(Box::new(ty.to_packed_repr())),
            _ => self.clone(),
        }
    }

    /// Range of values representable by an integer-class type.
    ///
    /// Fixed-point types report the range of their whole storage word.
    pub fn integer_range(&self) -> Option<IntegerRange> {
        use self::TypeDescriptor::*;

        match *self {
            Integer(size) => Some(IntegerRange::signed(size.bits())),
            Unsigned(size) | Bitfield(size) => Some(IntegerRange::unsigned(size.bits())),
            FixedPoint(ref tp) if tp.signed => Some(IntegerRange::signed(tp.size.bits())),
            FixedPoint(ref tp) => Some(IntegerRange::unsigned(tp.size.bits())),
            Enum(ref tp) => tp.base_type().integer_range(),
            _ => None,
        }
    }
}

/// A Rust type with a fixed HDF5 representation.
///
/// Values cross the storage boundary as dynamic [`Value`]s, so implementors
/// describe their layout and convert to and from that form.
pub trait H5Type: Sized + 'static {
    fn type_descriptor() -> TypeDescriptor;

    fn to_value(&self) -> Value;

    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

macro_rules! impl_h5type_int {
    ($ty:ty, $variant:ident, $size:expr, $repr:ty) => {
        impl H5Type for $ty {
            #[inline]
            fn type_descriptor() -> TypeDescriptor {
                $crate::h5type::TypeDescriptor::$variant($size)
            }

            #[inline]
            fn to_value(&self) -> Value {
                Value::Integer(IntValue::from(*self as $repr))
            }

            fn from_value(value: &Value) -> Result<Self, ValueError> {
                let x = value.as_int()?.to_i128();
                <$ty>::try_from(x)
                    .map_err(|_| ValueError::OutOfRange { value: x, target: stringify!($ty) })
            }
        }
    };
}

impl_h5type_int!(i8, Integer, IntSize::U1, i8);
impl_h5type_int!(i16, Integer, IntSize::U2, i16);
impl_h5type_int!(i32, Integer, IntSize::U4, i32);
impl_h5type_int!(i64, Integer, IntSize::U8, i64);
impl_h5type_int!(u8, Unsigned, IntSize::U1, u8);
impl_h5type_int!(u16, Unsigned, IntSize::U2, u16);
impl_h5type_int!(u32, Unsigned, IntSize::U4, u32);
impl_h5type_int!(u64, Unsigned, IntSize::U8, u64);

#[cfg(target_pointer_width = "32")]
impl_h5type_int!(isize, Integer, IntSize::U4, i32);
#[cfg(target_pointer_width = "32")]
impl_h5type_int!(usize, Unsigned, IntSize::U4, u32);

#[cfg(target_pointer_width = "64")]
impl_h5type_int!(isize, Integer, IntSize::U8, i64);
#[cfg(target_pointer_width = "64")]
impl_h5type_int!(usize, Unsigned, IntSize::U8, u64);

impl H5Type for f32 {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Float(FloatSize::U4)
    }

    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match *value {
            Value::Float32(x) => Ok(x),
            _ => value.as_f64().map(|x| x as f32),
        }
    }
}

impl H5Type for f64 {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Float(FloatSize::U8)
    }

    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_f64()
    }
}

impl H5Type for bool {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Boolean
    }

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_bool()
    }
}

impl H5Type for String {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::VarLenUnicode
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_str().map(ToOwned::to_owned)
    }
}

impl H5Type for VarLenAscii {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::VarLenAscii
    }

    fn to_value(&self) -> Value {
        Value::String(self.as_str().to_owned())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(Self::from_ascii(value.as_str()?)?)
    }
}

impl<const N: usize> H5Type for FixedAscii<N> {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::FixedAscii(N)
    }

    fn to_value(&self) -> Value {
        Value::String(self.as_str().to_owned())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(Self::from_ascii(value.as_str()?)?)
    }
}

impl<const N: usize> H5Type for FixedUnicode<N> {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::FixedUnicode(N)
    }

    fn to_value(&self) -> Value {
        Value::String(self.as_str().to_owned())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(value.as_str()?.parse()?)
    }
}

impl<T: H5Type, const N: usize> H5Type for [T; N] {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::FixedArray(Box::new(T::type_descriptor()), N)
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(H5Type::to_value).collect())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let items = value.as_array()?;
        let found = items.len();
        let items = items.iter().map(T::from_value).collect::<Result<Vec<_>, _>>()?;
        items.try_into().map_err(|_| ValueError::Length { expected: N, found })
    }
}

impl<T: H5Type> H5Type for Vec<T> {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::VarLenArray(Box::new(T::type_descriptor()))
    }

    fn to_value(&self) -> Value {
        Value::VarLenArray(self.iter().map(H5Type::to_value).collect())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value.as_varlen()?.iter().map(T::from_value).collect()
    }
}

macro_rules! impl_tuple {
    ($($t:ident $i:tt),+) => {
        impl<$($t: H5Type),+> H5Type for ($($t,)+) {
            fn type_descriptor() -> TypeDescriptor {
                let mut fields = vec![$(
                    CompoundField::typed::<$t>(stringify!($i), mem::offset_of!(Self, $i), $i),
                )+];
                fields.sort_by_key(|f| f.offset);
                TypeDescriptor::Compound(CompoundType { fields, size: mem::size_of::<Self>() })
            }

            fn to_value(&self) -> Value {
                Value::Compound(vec![$((stringify!($i).to_owned(), self.$i.to_value()),)+])
            }

            fn from_value(value: &Value) -> Result<Self, ValueError> {
                Ok(($($t::from_value(value.field(stringify!($i))?)?,)+))
            }
        }
    };
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);
impl_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
