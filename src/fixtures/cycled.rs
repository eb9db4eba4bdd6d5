use std::fmt::{self, Debug};
use std::marker::PhantomData;

use crate::fixtures::Fixture;
use crate::internal_prelude::*;

/// Writes `records` values `T::cycled(0..records)` as a 1-D dataset.
pub fn write_cycled<'a, T>(storage: &'a dyn Storage, name: &str, records: usize) -> Result<Dataset<'a>>
where
    T: H5Type + Cycled,
{
    let values: Vec<T> = (0..records as u64).map(cycled).collect();
    let ds = DatasetBuilder::new(storage).with_data(&values).create(name)?;
    debug!(dataset = name, dtype = %ds.dtype(), records, "cycled values written");
    Ok(ds)
}

/// A single dataset of cycled `T` values.
pub struct CycledVector<T> {
    file_name: String,
    dataset_name: String,
    records: usize,
    _marker: PhantomData<T>,
}

impl<T> Clone for CycledVector<T> {
    fn clone(&self) -> Self {
        Self {
            file_name: self.file_name.clone(),
            dataset_name: self.dataset_name.clone(),
            records: self.records,
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for CycledVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CycledVector")
            .field("file_name", &self.file_name)
            .field("dataset_name", &self.dataset_name)
            .field("records", &self.records)
            .finish()
    }
}

impl<T: H5Type> Default for CycledVector<T> {
    fn default() -> Self {
        let dtype = T::type_descriptor();
        Self {
            file_name: format!("cycled_{}.h5", dtype),
            dataset_name: dtype.to_string(),
            records: 10,
            _marker: PhantomData,
        }
    }
}

impl<T> CycledVector<T> {
    #[must_use]
    pub fn file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub fn dataset_name(mut self, dataset_name: &str) -> Self {
        self.dataset_name = dataset_name.into();
        self
    }

    #[must_use]
    pub fn records(mut self, records: usize) -> Self {
        self.records = records;
        self
    }
}

impl<T: H5Type + Cycled> Fixture for CycledVector<T> {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        write_cycled::<T>(storage, &self.dataset_name, self.records)?;
        Ok(())
    }
}

/// `cycled_integers.h5`: one cycled dataset per integer type, named after the type.
#[derive(Clone, Debug)]
pub struct CycledIntegers {
    file_name: String,
    records: usize,
}

impl Default for CycledIntegers {
    fn default() -> Self {
        Self { file_name: "cycled_integers.h5".into(), records: 10 }
    }
}

impl_options!(CycledIntegers { file_name: &str, records: usize });

impl CycledIntegers {
    fn write_one<T: H5Type + Cycled>(&self, storage: &dyn Storage) -> Result<()> {
        write_cycled::<T>(storage, &T::type_descriptor().to_string(), self.records)?;
        Ok(())
    }
}

impl Fixture for CycledIntegers {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        self.write_one::<i8>(storage)?;
        self.write_one::<u8>(storage)?;
        self.write_one::<i16>(storage)?;
        self.write_one::<u16>(storage)?;
        self.write_one::<i32>(storage)?;
        self.write_one::<u32>(storage)?;
        self.write_one::<i64>(storage)?;
        self.write_one::<u64>(storage)?;
        info!(records = self.records, "cycled integer datasets written");
        Ok(())
    }
}
