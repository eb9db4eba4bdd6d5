use crate::fixtures::Fixture;
use crate::internal_prelude::*;
use crate::types::{FixedAscii, ScaledU64};

/// Unsigned fixed-point value with 7 fractional bits.
pub type ScaledUint = ScaledU64<7>;

const FIXED_STR: &str = "FixedData";
const REVISION_ATTR: &str = "GIT root revision";

#[allow(clippy::approx_constant)]
const FLOAT_STEP: f32 = 3.14;
#[allow(clippy::approx_constant)]
const DOUBLE_STEP: f64 = 2.718;

/// One record of the compound example; integer members sweep their boundary values.
#[derive(H5Type, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct CompoundRecord {
    #[hdf5(rename = "recordId")]
    pub record_id: u64,
    #[hdf5(rename = "fixedStr")]
    pub fixed_str: FixedAscii<10>,
    #[hdf5(rename = "varStr")]
    pub var_str: String,
    #[hdf5(rename = "floatVal")]
    pub float_val: f32,
    #[hdf5(rename = "doubleVal")]
    pub double_val: f64,
    #[hdf5(rename = "int8_Val")]
    pub int8_val: i8,
    #[hdf5(rename = "uint8_Val")]
    pub uint8_val: u8,
    #[hdf5(rename = "int16_Val")]
    pub int16_val: i16,
    #[hdf5(rename = "uint16_Val")]
    pub uint16_val: u16,
    #[hdf5(rename = "int32_Val")]
    pub int32_val: i32,
    #[hdf5(rename = "uint32_Val")]
    pub uint32_val: u32,
    #[hdf5(rename = "int64_Val")]
    pub int64_val: i64,
    #[hdf5(rename = "uint64_Val")]
    pub uint64_val: u64,
    #[hdf5(rename = "scaledUintVal")]
    pub scaled_uint_val: ScaledUint,
}

impl CompoundRecord {
    /// Builds the record stored at `index`.
    pub fn at(index: u64) -> Result<Self> {
        Ok(Self {
            record_id: 1000 + index,
            fixed_str: FixedAscii::from_ascii(FIXED_STR)?,
            var_str: format!("varStr:{}", index + 1),
            float_val: index as f32 * FLOAT_STEP,
            double_val: index as f64 * DOUBLE_STEP,
            int8_val: cycled(index),
            uint8_val: cycled(index),
            int16_val: cycled(index),
            uint16_val: cycled(index),
            int32_val: cycled(index),
            uint32_val: cycled(index),
            int64_val: cycled(index),
            uint64_val: cycled(index),
            scaled_uint_val: ScaledUint::from_raw(((index + 1) << 7) | ((index % 4) * 32)),
        })
    }
}

/// `compound_example.h5`: a table of [`CompoundRecord`]s with a revision attribute.
#[derive(Clone, Debug)]
pub struct CompoundFixture {
    file_name: String,
    dataset_name: String,
    records: usize,
    revision: String,
    packed: bool,
}

impl Default for CompoundFixture {
    fn default() -> Self {
        Self {
            file_name: "compound_example.h5".into(),
            dataset_name: "CompoundData".into(),
            records: 1000,
            revision: "Revision: , URL: ".into(),
            packed: false,
        }
    }
}

impl_options!(CompoundFixture {
    file_name: &str,
    dataset_name: &str,
    records: usize,
    revision: &str,
    packed: bool,
});

impl CompoundFixture {
    pub fn records_data(&self) -> Result<Vec<CompoundRecord>> {
        (0..self.records as u64).map(CompoundRecord::at).collect()
    }

    /// Reads back at most `limit` leading records of the dataset.
    pub fn preview(&self, storage: &dyn Storage, limit: usize) -> Result<Vec<CompoundRecord>> {
        let ds = Dataset::open(storage, &self.dataset_name)?;
        let mut records = ds.read_raw::<CompoundRecord>()?;
        records.truncate(limit);
        Ok(records)
    }
}

impl Fixture for CompoundFixture {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        let records = self.records_data()?;
        info!(records = records.len(), "prepared compound records");
        let ds = DatasetBuilder::new(storage)
            .packed(self.packed)
            .with_data(records.as_slice())
            .create(&self.dataset_name)?;
        ds.new_attr_builder().with_scalar(&self.revision).create(REVISION_ATTR)?;
        info!(dataset = %self.dataset_name, dtype = %ds.dtype(), size = ds.storage_size(), "dataset written");
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_record_values() {
        let r0 = CompoundRecord::at(0).unwrap();
        assert_eq!(r0.record_id, 1000);
        assert_eq!(r0.fixed_str, "FixedData");
        assert_eq!(r0.var_str, "varStr:1");
        assert_eq!(r0.float_val, 0.);
        assert_eq!((r0.int8_val, r0.uint8_val), (i8::MIN, 0));
        assert_eq!(r0.scaled_uint_val.raw(), 128);

        let r3 = CompoundRecord::at(3).unwrap();
        assert_eq!(r3.var_str, "varStr:4");
        assert_eq!((r3.int8_val, r3.uint8_val), (63, 189));
        assert_eq!((r3.int64_val, r3.uint64_val), (i64::MAX / 2, (u64::MAX / 4) * 3));
        assert_eq!(r3.scaled_uint_val.integral(), 4);
        assert_eq!(r3.scaled_uint_val.to_f64(), 4.75);

        let r4 = CompoundRecord::at(4).unwrap();
        assert_eq!((r4.int16_val, r4.uint16_val), (i16::MAX, u16::MAX));
    }

    #[test]
    pub fn test_layout() {
        let td = CompoundRecord::type_descriptor();
        assert_eq!(td.to_c_repr().size(), 96);
        assert_eq!(td.to_packed_repr().size(), 84);
        assert_eq!(td.to_string(), "compound (14 fields)");
        let TypeDescriptor::Compound(ct) = td else { panic!("expected compound") };
        assert_eq!(ct.field("varStr").unwrap().ty, TypeDescriptor::VarLenUnicode);
        assert_eq!(ct.field("fixedStr").unwrap().ty, TypeDescriptor::FixedAscii(10));
    }

    #[test]
    pub fn test_write_and_preview() {
        with_tmp_file(|file| {
            let fixture = CompoundFixture::default().records(12).dataset_name("table");
            fixture.write(&file).unwrap();
            let ds = file.dataset("table").unwrap();
            assert_eq!(ds.shape(), vec![12]);
            assert_eq!(ds.dtype().size(), 96);
            let revision = ds.attr("GIT root revision").unwrap();
            assert_eq!(revision.read_scalar::<String>().unwrap(), "Revision: , URL: ");

            let preview = fixture.preview(&file, 10).unwrap();
            assert_eq!(preview.len(), 10);
            assert_eq!(preview, fixture.records_data().unwrap()[..10].to_vec());
        })
    }

    #[test]
    pub fn test_packed() {
        with_tmp_file(|file| {
            CompoundFixture::default().records(3).packed(true).write(&file).unwrap();
            let ds = file.dataset("CompoundData").unwrap();
            assert_eq!(ds.dtype().size(), 84);
            assert_eq!(ds.read_raw::<CompoundRecord>().unwrap()[2].record_id, 1002);
        })
    }
}
