use crate::fixtures::Fixture;
use crate::internal_prelude::*;

/// `twenty_datasets.h5`: `dataset_1` .. `dataset_N`, each an int32 scalar equal to its number.
#[derive(Clone, Debug)]
pub struct TwentyDatasets {
    file_name: String,
    count: usize,
}

impl Default for TwentyDatasets {
    fn default() -> Self {
        Self { file_name: "twenty_datasets.h5".into(), count: 20 }
    }
}

impl_options!(TwentyDatasets { file_name: &str, count: usize });

impl Fixture for TwentyDatasets {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        for n in 1..=self.count {
            let value = i32::try_from(n).map_err(|_| format!("dataset count {} exceeds int32", n))?;
            DatasetBuilder::new(storage).with_scalar(&value).create(&format!("dataset_{}", n))?;
        }
        info!(datasets = self.count, "scalar datasets written");
        Ok(())
    }
}

/// `single_int_v2.h5`: one int32 scalar.
#[derive(Clone, Debug)]
pub struct SingleInt {
    file_name: String,
    dataset_name: String,
    value: i32,
}

impl Default for SingleInt {
    fn default() -> Self {
        Self { file_name: "single_int_v2.h5".into(), dataset_name: "MyIntegerValue".into(), value: 42 }
    }
}

impl_options!(SingleInt { file_name: &str, dataset_name: &str, value: i32 });

impl Fixture for SingleInt {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        DatasetBuilder::new(storage).with_scalar(&self.value).create(&self.dataset_name)?;
        info!(dataset = %self.dataset_name, value = self.value, "dataset written");
        Ok(())
    }
}
