//! Ready-made fixture generators.
//!
//! Every generator is a small options struct implementing [`Fixture`]: it
//! carries the names and sizes of what it produces, can write itself into any
//! [`Storage`], and knows the file it would normally live in. Defaults
//! reproduce the classic HDF5 datatype example files.

use crate::internal_prelude::*;

macro_rules! impl_options {
    ($ty:ident { $($field:ident: $t:ty),* $(,)? }) => {
        impl $ty {
            $(
                #[must_use]
                pub fn $field(mut self, $field: $t) -> Self {
                    self.$field = $field.into();
                    self
                }
            )*
        }
    };
}

mod alltypes;
mod arrays;
mod compound;
mod cycled;
mod dimensions;
mod scalars;

pub use self::alltypes::{
    AllTypesCompound, AllTypesRecord, AllTypesSeparate, Level, NestedPair, OpaqueData, OPAQUE_TAG,
};
pub use self::arrays::{CompoundArray, CompoundArrayRecord, VarLenTypes};
pub use self::compound::{CompoundFixture, CompoundRecord, ScaledUint};
pub use self::cycled::{write_cycled, CycledIntegers, CycledVector};
pub use self::dimensions::{Dimensions, SalesCube, TicTacToe};
pub use self::scalars::{SingleInt, TwentyDatasets};

/// A generator of one fixture file.
pub trait Fixture {
    /// Name of the file the fixture is written to by [`Fixture::create`].
    fn output(&self) -> &str;

    /// Writes every dataset of the fixture into `storage`.
    fn write(&self, storage: &dyn Storage) -> Result<()>;

    /// Creates (truncating) the output file and writes the fixture into it.
    fn create(&self) -> Result<File> {
        let file = File::create(self.output())?;
        self.write(&file)?;
        info!(file = self.output(), size = file.size(), "fixture complete");
        Ok(file)
    }
}

/// All fixtures with their default options.
pub fn all_fixtures() -> Vec<Box<dyn Fixture>> {
    vec![
        Box::new(CompoundFixture::default()),
        Box::new(AllTypesSeparate::default()),
        Box::new(AllTypesCompound::default()),
        Box::new(CompoundArray::default()),
        Box::new(VarLenTypes::default()),
        Box::new(Dimensions::default()),
        Box::new(TicTacToe::default()),
        Box::new(SalesCube::default()),
        Box::new(TwentyDatasets::default()),
        Box::new(SingleInt::default()),
        Box::new(CycledIntegers::default()),
    ]
}

/// Creates every default fixture file, returning the open handles.
pub fn write_all() -> Result<Vec<File>> {
    all_fixtures().iter().map(|fixture| fixture.create()).collect()
}
