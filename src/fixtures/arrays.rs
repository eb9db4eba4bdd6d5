use crate::fixtures::Fixture;
use crate::internal_prelude::*;
use crate::types::VarLenAscii;

pub const ARRAY_LEN: usize = 10;

#[derive(H5Type, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct CompoundArrayRecord {
    #[hdf5(rename = "recordId")]
    pub record_id: u64,
    pub data: [u64; ARRAY_LEN],
}

impl CompoundArrayRecord {
    pub fn at(index: u64) -> Self {
        let base = (index + 1) * 100;
        let mut data = [0; ARRAY_LEN];
        for (j, x) in (0..).zip(data.iter_mut()) {
            *x = base + j;
        }
        Self { record_id: index + 1, data }
    }
}

/// `compound_array.h5`: records pairing an id with a fixed-size array.
#[derive(Clone, Debug)]
pub struct CompoundArray {
    file_name: String,
    dataset_name: String,
    records: usize,
}

impl Default for CompoundArray {
    fn default() -> Self {
        Self { file_name: "compound_array.h5".into(), dataset_name: "records".into(), records: 10 }
    }
}

impl_options!(CompoundArray { file_name: &str, dataset_name: &str, records: usize });

impl Fixture for CompoundArray {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        let records: Vec<_> = (0..self.records as u64).map(CompoundArrayRecord::at).collect();
        DatasetBuilder::new(storage).with_data(&records).create(&self.dataset_name)?;
        info!(dataset = %self.dataset_name, records = records.len(), "dataset written");
        Ok(())
    }
}

/// `vlen_types_example.h5`: scalar variable-length sequences and a string.
#[derive(Clone, Debug)]
pub struct VarLenTypes {
    file_name: String,
}

impl Default for VarLenTypes {
    fn default() -> Self {
        Self { file_name: "vlen_types_example.h5".into() }
    }
}

impl_options!(VarLenTypes { file_name: &str });

impl Fixture for VarLenTypes {
    fn output(&self) -> &str {
        &self.file_name
    }

    #[allow(clippy::approx_constant)]
    fn write(&self, storage: &dyn Storage) -> Result<()> {
        DatasetBuilder::new(storage).with_scalar(&vec![1_i32, 2, 3, 4]).create("vlen_int")?;
        DatasetBuilder::new(storage).with_scalar(&vec![3.14_f32, 2.71]).create("vlen_float")?;
        let text = VarLenAscii::from_ascii("Hello VLEN!")?;
        DatasetBuilder::new(storage).with_scalar(&text).create("vlen_str")?;
        info!(file = %self.file_name, "variable-length datasets written");
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_record() {
        let r = CompoundArrayRecord::at(2);
        assert_eq!(r.record_id, 3);
        assert_eq!(r.data[0], 300);
        assert_eq!(r.data[9], 309);
        assert_eq!(CompoundArrayRecord::type_descriptor().to_c_repr().size(), 88);
    }

    #[test]
    pub fn test_compound_array() {
        with_tmp_file(|file| {
            CompoundArray::default().write(&file).unwrap();
            let records = file.dataset("records").unwrap().read_1d::<CompoundArrayRecord>().unwrap();
            assert_eq!(records.len(), 10);
            assert_eq!(records[9].record_id, 10);
            assert_eq!(records[9].data[5], 1005);
        })
    }

    #[test]
    #[allow(clippy::approx_constant)]
    pub fn test_vlen() {
        with_tmp_file(|file| {
            VarLenTypes::default().write(&file).unwrap();
            assert_eq!(file.dataset_names().unwrap(), vec!["vlen_float", "vlen_int", "vlen_str"]);
            let ints = file.dataset("vlen_int").unwrap().read_scalar::<Vec<i32>>().unwrap();
            assert_eq!(ints, vec![1, 2, 3, 4]);
            let floats = file.dataset("vlen_float").unwrap().read_scalar::<Vec<f32>>().unwrap();
            assert_eq!(floats, vec![3.14, 2.71]);
            let text = file.dataset("vlen_str").unwrap().read_scalar::<VarLenAscii>().unwrap();
            assert_eq!(text, "Hello VLEN!");
            assert_eq!(file.dataset("vlen_str").unwrap().dtype(), &TypeDescriptor::VarLenAscii);
        })
    }
}
