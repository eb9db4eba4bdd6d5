use std::fmt;

use rand::prelude::{SeedableRng, SmallRng};

use h5fixture::{H5Type, Storage};

mod common;

use self::common::gen::{Enum, FixedStruct, Gen, TupleStruct, VarLenStruct};
use self::common::util::new_file;

/// Tests attribute creation, writing, reading.
fn test_read_write<T>() -> h5fixture::Result<()>
where
    T: H5Type + fmt::Debug + PartialEq + Gen + Clone,
{
    let mut rng = SmallRng::seed_from_u64(42);
    let file = new_file()?;
    let ds = file.new_dataset::<T>().create("/dataset")?;

    for i in 0..200 {
        let value = T::gen(&mut rng);
        let attr = ds.new_attr::<T>().create(&format!("attr_{}", i))?;
        attr.write_scalar(&value)?;
        assert_eq!(value, attr.read_scalar::<T>()?);
    }
    assert_eq!(ds.attr_names()?.len(), 200);
    Ok(())
}

#[test]
pub fn test_read_write_primitive() -> h5fixture::Result<()> {
    test_read_write::<i8>()?;
    test_read_write::<i16>()?;
    test_read_write::<i32>()?;
    test_read_write::<i64>()?;
    test_read_write::<u8>()?;
    test_read_write::<u16>()?;
    test_read_write::<u32>()?;
    test_read_write::<u64>()?;
    test_read_write::<isize>()?;
    test_read_write::<usize>()?;
    test_read_write::<bool>()?;
    test_read_write::<f32>()?;
    test_read_write::<f64>()?;
    Ok(())
}

#[test]
fn test_read_write_enum() -> h5fixture::Result<()> {
    test_read_write::<Enum>()
}

#[test]
fn test_read_write_tuple_struct() -> h5fixture::Result<()> {
    test_read_write::<TupleStruct>()
}

#[test]
fn test_read_write_fixed_struct() -> h5fixture::Result<()> {
    test_read_write::<FixedStruct>()
}

#[test]
fn test_read_write_varlen_struct() -> h5fixture::Result<()> {
    test_read_write::<VarLenStruct>()
}

#[test]
fn test_read_write_tuples() -> h5fixture::Result<()> {
    test_read_write::<(u8,)>()?;
    test_read_write::<(u64, f32)>()?;
    test_read_write::<(i8, u64, f32)>()?;
    Ok(())
}

#[test]
fn test_attribute_debug() {
    let file = new_file().unwrap();
    let ds = file.new_dataset::<u8>().shape(3).create("bytes").unwrap();
    let attr = ds.new_attr_builder().with_data(&[1.5_f64, 2.5]).create("scale").unwrap();
    assert_eq!(format!("{:?}", attr), r#"<attribute "scale" of "bytes": (2,) float64>"#);
    assert_eq!(format!("{:?}", ds), r#"<dataset "bytes": (3,) uint8>"#);
}
