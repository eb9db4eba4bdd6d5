use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;
use std::str::{self, FromStr};

use ascii::{AsAsciiStrError, AsciiStr};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StringError {
    InternalNull,
    InsufficientCapacity,
    AsciiError(AsAsciiStrError),
}

impl From<AsAsciiStrError> for StringError {
    fn from(err: AsAsciiStrError) -> Self {
        StringError::AsciiError(err)
    }
}

impl StdError for StringError {}

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StringError::InternalNull => {
                write!(f, "string error: variable length string with internal null")
            }
            StringError::InsufficientCapacity => {
                write!(f, "string error: insufficient capacity for fixed sized string")
            }
            StringError::AsciiError(err) => write!(f, "string error: {}", err),
        }
    }
}

macro_rules! impl_string_traits {
    ($ty:ty $(, const $n:ident)?) => {
        impl<$(const $n: usize)?> fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Debug::fmt(self.as_str(), f)
            }
        }

        impl<$(const $n: usize)?> fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl<$(const $n: usize)?> Deref for $ty {
            type Target = str;

            #[inline]
            fn deref(&self) -> &str {
                self.as_str()
            }
        }

        impl<$(const $n: usize)?> AsRef<str> for $ty {
            #[inline]
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl<$(const $n: usize)?> PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl<'a, $(const $n: usize)?> PartialEq<&'a str> for $ty {
            fn eq(&self, other: &&'a str) -> bool {
                self.as_str() == *other
            }
        }

        impl<$(const $n: usize)?> PartialEq<String> for $ty {
            fn eq(&self, other: &String) -> bool {
                self.as_str() == other.as_str()
            }
        }

        impl<$(const $n: usize)?> From<$ty> for String {
            fn from(s: $ty) -> String {
                s.as_str().to_owned()
            }
        }
    };
}

impl_string_traits!(FixedAscii<N>, const N);
impl_string_traits!(FixedUnicode<N>, const N);
impl_string_traits!(VarLenAscii);

/// Number of meaningful bytes in a null-padded buffer.
fn padded_len(buf: &[u8]) -> usize {
    buf.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1)
}

fn fill_padded<const N: usize>(bytes: &[u8]) -> Result<[u8; N], StringError> {
    if bytes.len() > N {
        return Err(StringError::InsufficientCapacity);
    }
    let mut buf = [0; N];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(buf)
}

/// Null-padded ASCII string stored inline in `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedAscii<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> Default for FixedAscii<N> {
    fn default() -> Self {
        Self { buf: [0; N] }
    }
}

impl<const N: usize> FixedAscii<N> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn capacity() -> usize {
        N
    }

    pub fn from_ascii<B: ?Sized + AsRef<[u8]>>(bytes: &B) -> Result<Self, StringError> {
        let bytes = AsciiStr::from_ascii(bytes.as_ref())?.as_bytes();
        Ok(Self { buf: fill_padded(bytes)? })
    }

    #[inline]
    pub fn len(&self) -> usize {
        padded_len(&self.buf)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    /// The full null-padded buffer.
    #[inline]
    pub fn as_raw(&self) -> &[u8; N] {
        &self.buf
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // only ever filled from validated ascii
        str::from_utf8(self.as_bytes()).unwrap_or_default()
    }
}

/// Null-padded UTF-8 string stored inline in `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedUnicode<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> Default for FixedUnicode<N> {
    fn default() -> Self {
        Self { buf: [0; N] }
    }
}

impl<const N: usize> FixedUnicode<N> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn capacity() -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        padded_len(&self.buf)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        str::from_utf8(self.as_bytes()).unwrap_or_default()
    }
}

impl<const N: usize> FromStr for FixedUnicode<N> {
    type Err = StringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { buf: fill_padded(s.as_bytes())? })
    }
}

/// Heap-allocated ASCII string; may not contain null bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct VarLenAscii {
    buf: String,
}

impl VarLenAscii {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ascii<B: ?Sized + AsRef<[u8]>>(bytes: &B) -> Result<Self, StringError> {
        let bytes = bytes.as_ref();
        if bytes.contains(&0) {
            return Err(StringError::InternalNull);
        }
        let s = AsciiStr::from_ascii(bytes)?;
        Ok(Self { buf: s.as_str().to_owned() })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}
