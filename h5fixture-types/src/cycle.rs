//! Boundary-value cycling.
//!
//! Fixture records need deterministic field values that sweep each type's
//! extremes and interior points. Record `index` maps onto one of five
//! positions (`index % 5`), and each position picks a value of the target
//! type:
//!
//! | position | signed               | unsigned        |
//! |----------|----------------------|-----------------|
//! | 0        | `min`                | `0`             |
//! | 1        | `-(max / 2) - 1`     | `max / 4`       |
//! | 2        | `0`                  | `max / 2`       |
//! | 3        | `max / 2`            | `(max / 4) * 3` |
//! | 4        | `max`                | `max`           |
//!
//! The mapping is a pure function of `(index, type)`: nothing is cached and
//! nothing is allocated. It is exposed statically through [`Cycled`] and
//! dynamically through [`IntegerRange::cycled`], which also covers widths
//! that have no Rust primitive (e.g. a 57-bit fixed-point field).
//!
//! [`LinearCycle`] is a separate generator that interpolates evenly between
//! `min` and `max` over a configurable number of steps.

use std::marker::PhantomData;

/// Number of distinct positions in a boundary-value cycle.
pub const CYCLE_LENGTH: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Minimum,
    LowerInterior,
    Midpoint,
    UpperInterior,
    Maximum,
}

impl Position {
    #[inline]
    pub const fn of(index: u64) -> Self {
        match index % CYCLE_LENGTH {
            0 => Position::Minimum,
            1 => Position::LowerInterior,
            2 => Position::Midpoint,
            3 => Position::UpperInterior,
            _ => Position::Maximum,
        }
    }
}

/// Closed integer interval `[min, max]` of a target type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntegerRange {
    min: i128,
    max: i128,
    signed: bool,
}

impl IntegerRange {
    /// Two's complement range of a `bits`-wide signed integer.
    pub fn signed(bits: u32) -> Self {
        assert!((1..=64).contains(&bits), "unsupported integer width: {} bits", bits);
        let half = 1i128 << (bits - 1);
        Self { min: -half, max: half - 1, signed: true }
    }

    /// Range of a `bits`-wide unsigned integer.
    pub fn unsigned(bits: u32) -> Self {
        assert!((1..=64).contains(&bits), "unsupported integer width: {} bits", bits);
        Self { min: 0, max: (1i128 << bits) - 1, signed: false }
    }

    /// Arbitrary range; treated as signed when `min` is negative.
    ///
    /// Panics if `min >= max`.
    pub fn new(min: i128, max: i128) -> Self {
        assert!(min < max, "invalid integer range: min ({}) must be less than max ({})", min, max);
        Self { min, max, signed: min < 0 }
    }

    #[inline]
    pub fn min(&self) -> i128 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> i128 {
        self.max
    }

    #[inline]
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    #[inline]
    pub fn contains(&self, value: i128) -> bool {
        self.min <= value && value <= self.max
    }

    /// Boundary value for record `index`.
    ///
    /// Results for ranges that are not a full native range are clamped into
    /// `[min, max]`.
    pub fn cycled(&self, index: u64) -> i128 {
        let (min, max) = (self.min, self.max);
        let value = match Position::of(index) {
            Position::Minimum => min,
            Position::LowerInterior if self.signed => (-(max / 2) - 1).clamp(min, 0),
            Position::LowerInterior => max / 4,
            Position::Midpoint if self.signed => 0,
            Position::Midpoint => max / 2,
            Position::UpperInterior if self.signed => max / 2,
            Position::UpperInterior => (max / 4) * 3,
            Position::Maximum => max,
        };
        value.clamp(min, max)
    }
}

/// Types with a deterministic value for every record index.
pub trait Cycled: Sized {
    fn cycled(index: u64) -> Self;
}

/// Shorthand for `T::cycled(index)`.
#[inline]
pub fn cycled<T: Cycled>(index: u64) -> T {
    T::cycled(index)
}

macro_rules! impl_cycled_signed {
    ($($ty:ty),*) => {
        $(
            impl Cycled for $ty {
                #[inline]
                fn cycled(index: u64) -> Self {
                    match Position::of(index) {
                        Position::Minimum => <$ty>::MIN,
                        Position::LowerInterior => (-(<$ty>::MAX / 2) - 1).clamp(<$ty>::MIN, 0),
                        Position::Midpoint => 0,
                        Position::UpperInterior => <$ty>::MAX / 2,
                        Position::Maximum => <$ty>::MAX,
                    }
                }
            }
        )*
    };
}

macro_rules! impl_cycled_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Cycled for $ty {
                #[inline]
                fn cycled(index: u64) -> Self {
                    match Position::of(index) {
                        Position::Minimum => <$ty>::MIN,
                        Position::LowerInterior => <$ty>::MAX / 4,
                        Position::Midpoint => <$ty>::MAX / 2,
                        Position::UpperInterior => (<$ty>::MAX / 4) * 3,
                        Position::Maximum => <$ty>::MAX,
                    }
                }
            }
        )*
    };
}

impl_cycled_signed!(i8, i16, i32, i64, isize);
impl_cycled_unsigned!(u8, u16, u32, u64, usize);

impl Cycled for f64 {
    #[inline]
    fn cycled(index: u64) -> Self {
        LinearCycle::new(CYCLE_LENGTH).float(index, f64::MIN, f64::MAX)
    }
}

impl Cycled for f32 {
    #[inline]
    fn cycled(index: u64) -> Self {
        LinearCycle::new(CYCLE_LENGTH).float(index, f32::MIN.into(), f32::MAX.into()) as f32
    }
}

impl<T: Cycled, const N: usize> Cycled for [T; N] {
    /// Element `j` takes the value for `index + j`, so arrays sweep the cycle too.
    fn cycled(index: u64) -> Self {
        std::array::from_fn(|j| T::cycled(index.wrapping_add(j as u64)))
    }
}

impl<T> Cycled for PhantomData<T> {
    #[inline]
    fn cycled(_: u64) -> Self {
        PhantomData
    }
}

macro_rules! impl_cycled_tuple {
    ($($t:ident),+) => {
        impl<$($t: Cycled),+> Cycled for ($($t,)+) {
            #[inline]
            fn cycled(index: u64) -> Self {
                ($($t::cycled(index),)+)
            }
        }
    };
}

impl_cycled_tuple!(A);
impl_cycled_tuple!(A, B);
impl_cycled_tuple!(A, B, C);
impl_cycled_tuple!(A, B, C, D);
impl_cycled_tuple!(A, B, C, D, E);
impl_cycled_tuple!(A, B, C, D, E, F);

/// Evenly spaced sweep from `min` to `max` over `cycle_length` records.
///
/// Position `0` yields `min` and position `cycle_length - 1` yields exactly
/// `max`; a cycle of length one always yields `min`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinearCycle {
    cycle_length: u64,
}

impl LinearCycle {
    /// Panics if `cycle_length` is zero.
    pub const fn new(cycle_length: u64) -> Self {
        assert!(cycle_length > 0, "cycle length must be positive");
        Self { cycle_length }
    }

    #[inline]
    pub const fn cycle_length(&self) -> u64 {
        self.cycle_length
    }

    #[inline]
    pub const fn position(&self, index: u64) -> u64 {
        index % self.cycle_length
    }

    /// Linear interpolation between `min` and `max`; panics unless `min < max`.
    pub fn float(&self, index: u64, min: f64, max: f64) -> f64 {
        assert!(min < max, "invalid float range: min ({}) must be less than max ({})", min, max);
        let pos = self.position(index);
        if self.cycle_length == 1 {
            return min;
        }
        let last = self.cycle_length - 1;
        if pos == last {
            return max;
        }
        let t = pos as f64 / last as f64;
        // weighted form stays finite for the full f64 range
        min * (1.0 - t) + max * t
    }

    /// Integral sweep using a truncated step of `(max - min) / (cycle_length - 1)`.
    pub fn integer(&self, index: u64, range: &IntegerRange) -> i128 {
        let pos = self.position(index);
        if self.cycle_length == 1 {
            return range.min();
        }
        let last = self.cycle_length - 1;
        if pos == last {
            return range.max();
        }
        let step = (range.max() - range.min()) / i128::from(last);
        range.min() + i128::from(pos) * step
    }
}
