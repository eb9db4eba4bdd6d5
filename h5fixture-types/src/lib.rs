#![recursion_limit = "1024"]

//! Native Rust equivalents of HDF5 types, and deterministic boundary values for them.

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod cycle;
mod h5type;
mod scalars;
mod string;
pub mod value;

pub use self::cycle::{cycled, Cycled, IntegerRange, LinearCycle, Position, CYCLE_LENGTH};
pub use self::h5type::{
    CompoundField, CompoundType, EnumMember, EnumType, FixedPointType, FloatSize, H5Type,
    IntSize, OpaqueType, TypeDescriptor, REFERENCE_SIZE, VARLEN_SLOT_SIZE,
};
pub use self::scalars::{
    Bitfield16, Bitfield32, Bitfield64, Bitfield8, ObjectReference, ScaledU64, Timestamp,
};
pub use self::string::{FixedAscii, FixedUnicode, StringError, VarLenAscii};
pub use self::value::{EnumValue, IntValue, Value, ValueError};
