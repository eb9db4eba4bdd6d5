use crate::fixtures::Fixture;
use crate::internal_prelude::*;
use crate::types::{Bitfield8, FixedAscii, OpaqueType, Timestamp, ValueError};

pub const OPAQUE_TAG: &str = "4-byte opaque data";

const DUMMY: &str = "dummy";
const GREETING: &str = "Hello HDF5!";
const SEPARATE_TIME: i64 = 1_672_531_200;
const COMPOUND_TIME: i64 = 1_698_765_432;

#[allow(clippy::approx_constant)]
const FLOATING_POINT: f32 = 3.14;
#[allow(clippy::approx_constant)]
const NESTED_DOUBLE: f64 = 2.718;

/// Four raw bytes stored as an opaque type tagged [`OPAQUE_TAG`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpaqueData(pub [u8; 4]);

impl H5Type for OpaqueData {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Opaque(OpaqueType { size: 4, tag: OPAQUE_TAG.into() })
    }

    fn to_value(&self) -> Value {
        Value::Opaque(self.0.to_vec())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let bytes = value.as_opaque()?;
        <[u8; 4]>::try_from(bytes)
            .map(Self)
            .map_err(|_| ValueError::Length { expected: 4, found: bytes.len() })
    }
}

#[derive(H5Type, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct NestedPair {
    pub nested_int: i16,
    pub nested_double: f64,
}

#[derive(H5Type, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum Level {
    #[hdf5(rename = "LOW")]
    Low = 0,
    #[hdf5(rename = "MEDIUM")]
    Medium = 1,
    #[hdf5(rename = "HIGH")]
    High = 2,
}

/// A record holding one member of every datatype class.
#[derive(H5Type, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct AllTypesRecord {
    pub fixed_point: i32,
    pub floating_point: f32,
    pub time: Timestamp,
    pub string: FixedAscii<16>,
    pub bit_field: Bitfield8,
    pub opaque: OpaqueData,
    pub compound: NestedPair,
    pub reference: ObjectReference,
    pub enumerated: Level,
    pub array: [i32; 3],
    pub variable_length: Vec<i32>,
}

impl AllTypesRecord {
    pub fn new(reference: ObjectReference) -> Result<Self> {
        Ok(Self {
            fixed_point: 42,
            floating_point: FLOATING_POINT,
            time: Timestamp(COMPOUND_TIME),
            string: FixedAscii::from_ascii(GREETING)?,
            bit_field: Bitfield8(0b1010_1010),
            opaque: OpaqueData(*b"ABCD"),
            compound: NestedPair { nested_int: 123, nested_double: NESTED_DOUBLE },
            reference,
            enumerated: Level::Medium,
            array: [1, 2, 3],
            variable_length: vec![10, 20, 30],
        })
    }
}

/// `alltypes_separate.h5`: one scalar dataset per datatype class.
#[derive(Clone, Debug)]
pub struct AllTypesSeparate {
    file_name: String,
}

impl Default for AllTypesSeparate {
    fn default() -> Self {
        Self { file_name: "alltypes_separate.h5".into() }
    }
}

impl_options!(AllTypesSeparate { file_name: &str });

fn write_scalar<T: H5Type>(storage: &dyn Storage, name: &str, value: &T) -> Result<()> {
    let ds = DatasetBuilder::new(storage).with_scalar(value).create(name)?;
    debug!(dataset = name, dtype = %ds.dtype(), "scalar written");
    Ok(())
}

impl Fixture for AllTypesSeparate {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        write_scalar(storage, "fixed_point", &42_i32)?;
        write_scalar(storage, "floating_point", &FLOATING_POINT)?;
        write_scalar(storage, "time", &Timestamp(SEPARATE_TIME))?;
        write_scalar(storage, "string", &FixedAscii::<16>::from_ascii(GREETING)?)?;
        write_scalar(storage, "bit_field", &Bitfield8(0b1010_1010))?;
        write_scalar(storage, "opaque", &OpaqueData(*b"ABCD"))?;
        write_scalar(storage, "compound", &NestedPair { nested_int: 123, nested_double: NESTED_DOUBLE })?;
        write_scalar(storage, DUMMY, &0_i32)?;
        write_scalar(storage, "reference", &storage.reference(DUMMY)?)?;
        write_scalar(storage, "enumerated", &Level::Medium)?;
        write_scalar(storage, "array", &[1_i32, 2, 3])?;
        write_scalar(storage, "variable_length", &vec![10_i32, 20, 30])?;
        info!(datasets = storage.dataset_names()?.len(), "separate datatype datasets written");
        Ok(())
    }
}

/// `compound_alltypes.h5`: every datatype class as a member of one compound.
#[derive(Clone, Debug)]
pub struct AllTypesCompound {
    file_name: String,
    dataset_name: String,
    records: usize,
    packed: bool,
}

impl Default for AllTypesCompound {
    fn default() -> Self {
        Self {
            file_name: "compound_alltypes.h5".into(),
            dataset_name: "myDataset".into(),
            records: 10,
            packed: false,
        }
    }
}

impl_options!(AllTypesCompound {
    file_name: &str,
    dataset_name: &str,
    records: usize,
    packed: bool,
});

impl Fixture for AllTypesCompound {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        DatasetBuilder::new(storage).with_data(&[0_i32]).create(DUMMY)?;
        let record = AllTypesRecord::new(storage.reference(DUMMY)?)?;
        let records = vec![record; self.records];
        let ds = DatasetBuilder::new(storage)
            .packed(self.packed)
            .with_data(records.as_slice())
            .create(&self.dataset_name)?;
        info!(dataset = %self.dataset_name, records = records.len(), size = ds.dtype().size(), "dataset written");
        Ok(())
    }
}
