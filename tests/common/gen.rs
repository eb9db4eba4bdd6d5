use std::fmt;

use h5fixture::types::{FixedAscii, FixedUnicode, VarLenAscii, CYCLE_LENGTH};
use h5fixture::{cycled, Cycled, H5Type};

use ndarray::ArrayD;
use rand::distributions::{Alphanumeric, Uniform};
use rand::prelude::{Rng, SliceRandom};

/// Random values for round-trip tests.
pub trait Gen: Sized + fmt::Debug {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

/// Random alphanumeric string of exactly `len` characters.
pub fn gen_ascii<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

pub fn gen_vec<R: Rng + ?Sized, T: Gen>(rng: &mut R, size: usize) -> Vec<T> {
    (0..size).map(|_| T::gen(rng)).collect()
}

/// Array of random shape with `ndim` axes; extents are in `0..=6` so empty arrays show up too.
pub fn gen_arr<T, R>(rng: &mut R, ndim: usize) -> ArrayD<T>
where
    T: H5Type + Gen,
    R: Rng + ?Sized,
{
    let shape: Vec<usize> = (0..ndim).map(|_| rng.gen_range(0..=6)).collect();
    let data = gen_vec(rng, shape.iter().product());
    ArrayD::from_shape_vec(shape, data).unwrap()
}

/// Half of the time picks one of the five boundary values, otherwise a uniform sample.
fn gen_boundary<T, R>(rng: &mut R) -> T
where
    T: Cycled,
    R: Rng + ?Sized,
    rand::distributions::Standard: rand::distributions::Distribution<T>,
{
    if rng.gen_bool(0.5) {
        cycled(rng.gen_range(0..CYCLE_LENGTH))
    } else {
        rng.gen()
    }
}

macro_rules! impl_gen_numeric {
    ($($ty:ty),+) => {
        $(
            impl Gen for $ty {
                fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
                    gen_boundary(rng)
                }
            }
        )+
    };
}

impl_gen_numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Gen for bool {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}

macro_rules! impl_gen_tuple {
    ($($t:ident),+) => {
        impl<$($t: Gen),+> Gen for ($($t,)+) {
            fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
                ($(<$t as Gen>::gen(rng),)+)
            }
        }
    };
}

impl_gen_tuple!(A);
impl_gen_tuple!(A, B);
impl_gen_tuple!(A, B, C);
impl_gen_tuple!(A, B, C, D);

/// Printable ASCII without NUL, at most `max_len` bytes.
fn gen_ascii_bytes<R: Rng + ?Sized>(rng: &mut R, max_len: usize) -> Vec<u8> {
    let len = rng.gen_range(0..=max_len);
    let printable = Uniform::new_inclusive(b' ', b'~');
    (0..len).map(|_| rng.sample(printable)).collect()
}

/// Non-NUL unicode string whose UTF-8 encoding fits into `max_bytes`.
fn gen_unicode<R: Rng + ?Sized>(rng: &mut R, max_bytes: usize) -> String {
    let budget = rng.gen_range(0..=max_bytes);
    let mut s = String::new();
    loop {
        let c: char = rng.gen();
        if c == '\0' {
            continue;
        }
        if s.len() + c.len_utf8() > budget {
            return s;
        }
        s.push(c);
    }
}

impl<const N: usize> Gen for FixedAscii<N> {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        FixedAscii::from_ascii(&gen_ascii_bytes(rng, N)).unwrap()
    }
}

impl<const N: usize> Gen for FixedUnicode<N> {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        gen_unicode(rng, N).parse().unwrap()
    }
}

impl Gen for VarLenAscii {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        VarLenAscii::from_ascii(&gen_ascii_bytes(rng, 12)).unwrap()
    }
}

impl Gen for String {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        gen_unicode(rng, 24)
    }
}

impl<T: Gen> Gen for Vec<T> {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let len = rng.gen_range(0..=5);
        gen_vec(rng, len)
    }
}

#[derive(H5Type, Clone, Copy, Debug, PartialEq)]
#[repr(i16)]
pub enum Enum {
    X = -2,
    Y = 3,
}

impl Gen for Enum {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *[Enum::X, Enum::Y].choose(rng).unwrap()
    }
}

#[derive(H5Type, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct TupleStruct(bool, Enum);

impl Gen for TupleStruct {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        TupleStruct(Gen::gen(rng), Gen::gen(rng))
    }
}

/// Fixed-size members only: strings, a tuple and an array of compounds.
#[derive(H5Type, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct FixedStruct {
    tag: FixedAscii<3>,
    label: FixedUnicode<11>,
    triple: (i8, u64, f32),
    pairs: [TupleStruct; 2],
}

impl Gen for FixedStruct {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        FixedStruct {
            tag: Gen::gen(rng),
            label: Gen::gen(rng),
            triple: Gen::gen(rng),
            pairs: [Gen::gen(rng), Gen::gen(rng)],
        }
    }
}

/// Every member lives on the heap.
#[derive(H5Type, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct VarLenStruct {
    ascii: VarLenAscii,
    text: String,
    levels: Vec<Enum>,
}

impl Gen for VarLenStruct {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        VarLenStruct { ascii: Gen::gen(rng), text: Gen::gen(rng), levels: Gen::gen(rng) }
    }
}

#[derive(H5Type, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct RenameStruct {
    id: u32,
    #[hdf5(rename = "reading.raw")]
    raw: i64,
}

impl Gen for RenameStruct {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        RenameStruct { id: Gen::gen(rng), raw: Gen::gen(rng) }
    }
}

#[derive(H5Type, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct RenameTupleStruct(#[hdf5(rename = "valid")] bool, #[hdf5(rename = "state")] Enum);

impl Gen for RenameTupleStruct {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        RenameTupleStruct(Gen::gen(rng), Gen::gen(rng))
    }
}

#[derive(H5Type, Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum RenameEnum {
    #[hdf5(rename = "coord.first")]
    First = 1,
    #[hdf5(rename = "coord.second")]
    Second = 2,
}

impl Gen for RenameEnum {
    fn gen<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *[RenameEnum::First, RenameEnum::Second].choose(rng).unwrap()
    }
}
