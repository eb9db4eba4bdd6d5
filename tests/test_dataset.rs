use std::fmt;

use ndarray::{arr2, Array2, ArrayD};
use rand::prelude::{SeedableRng, SmallRng};

use h5fixture::types::TypeDescriptor;
use h5fixture::{H5Type, Storage};

#[macro_use]
mod common;

use self::common::gen::{
    gen_arr, Enum, FixedStruct, Gen, RenameEnum, RenameStruct, RenameTupleStruct, TupleStruct,
    VarLenStruct,
};
use self::common::util::new_file;

fn test_read<T>(ds: &h5fixture::Dataset, arr: &ArrayD<T>, ndim: usize) -> h5fixture::Result<()>
where
    T: H5Type + fmt::Debug + PartialEq + Gen,
{
    ds.write(arr)?;

    // read_raw()
    let out_vec = ds.read_raw::<T>();
    assert_eq!(arr.as_slice().unwrap(), out_vec?.as_slice());

    // read_dyn()
    let out_dyn = ds.read_dyn::<T>();
    assert_eq!(arr, &out_dyn?.into_dimensionality().unwrap());

    // read_scalar()
    let out_scalar = ds.read_scalar::<T>();
    if ndim == 0 {
        assert_eq!(arr.as_slice().unwrap()[0], out_scalar?);
    } else {
        assert!(out_scalar.is_err());
    }

    // read_1d()
    let out_1d = ds.read_1d::<T>();
    if ndim == 1 {
        assert_eq!(arr, &out_1d?.into_dimensionality().unwrap());
    } else {
        assert!(out_1d.is_err());
    }

    // read_2d()
    let out_2d = ds.read_2d::<T>();
    if ndim == 2 {
        assert_eq!(arr, &out_2d?.into_dimensionality().unwrap());
    } else {
        assert!(out_2d.is_err());
    }

    Ok(())
}

fn test_write<T>(ds: &h5fixture::Dataset, arr: &ArrayD<T>, ndim: usize) -> h5fixture::Result<()>
where
    T: H5Type + fmt::Debug + PartialEq + Gen,
{
    // .write()
    ds.write(arr)?;
    assert_eq!(&ds.read_dyn::<T>()?, arr);

    // .write_scalar()
    if ndim == 0 {
        ds.write_scalar(&arr.as_slice().unwrap()[0])?;
        assert_eq!(&ds.read_dyn::<T>()?, arr);
    } else if arr.len() > 0 {
        assert!(ds.write_scalar(&arr.as_slice().unwrap()[0]).is_err());
    }

    // .write_raw()
    ds.write_raw(arr.as_slice().unwrap())?;
    assert_eq!(&ds.read_dyn::<T>()?, arr);

    // a buffer of the wrong length is rejected and leaves the data intact
    if arr.len() > 0 {
        let short = &arr.as_slice().unwrap()[1..];
        assert_err!(ds.write_raw(short), "shape mismatch when writing");
        assert_eq!(&ds.read_dyn::<T>()?, arr);
    }

    Ok(())
}

fn test_values<T>(ds: &h5fixture::Dataset, arr: &ArrayD<T>) -> h5fixture::Result<()>
where
    T: H5Type + fmt::Debug + PartialEq + Gen,
{
    let values: Vec<_> = arr.iter().map(H5Type::to_value).collect();
    ds.as_writer().write_values(&values)?;
    assert_eq!(ds.read_values()?, values);
    assert_eq!(&ds.read_dyn::<T>()?, arr);
    Ok(())
}

fn test_read_write<T>() -> h5fixture::Result<()>
where
    T: H5Type + fmt::Debug + PartialEq + Gen + Clone,
{
    let td = T::type_descriptor();
    let mut packed = vec![false];
    if let TypeDescriptor::Compound(_) = td {
        packed.push(true);
    }

    let mut rng = SmallRng::seed_from_u64(42);
    let file = new_file()?;

    for packed in &packed {
        for ndim in 0..=4 {
            for _ in 0..=10 {
                for mode in 0..3 {
                    let arr: ArrayD<T> = gen_arr(&mut rng, ndim);

                    let ds = file.new_dataset::<T>().packed(*packed).shape(arr.shape()).create("x")?;

                    let result = if mode == 0 {
                        test_read(&ds, &arr, ndim)
                    } else if mode == 1 {
                        test_write(&ds, &arr, ndim)
                    } else {
                        test_values(&ds, &arr)
                    };
                    file.unlink("x")?;
                    result?;
                }
            }
        }
    }

    Ok(())
}

#[test]
fn test_read_write_primitive() -> h5fixture::Result<()> {
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
fn test_read_write_rename_fields() -> h5fixture::Result<()> {
    test_read_write::<RenameStruct>()?;
    test_read_write::<RenameTupleStruct>()?;
    test_read_write::<RenameEnum>()?;
    Ok(())
}

#[test]
fn test_create_on_databuilder() {
    let file = new_file().unwrap();

    let _ds = file.new_dataset_builder().empty::<i32>().create("ds1").unwrap();
    let _ds = file.new_dataset_builder().with_data(&[1_i32, 2, 3]).create("ds2").unwrap();
    let _ds = file.new_dataset::<i32>().create("ds3").unwrap();
    let _ds = file.new_dataset::<i32>().shape(2).create("ds4").unwrap();
    assert_eq!(file.dataset_names().unwrap(), vec!["ds1", "ds2", "ds3", "ds4"]);
    assert!(file.dataset("ds1").unwrap().is_scalar());
    assert_eq!(file.dataset("ds4").unwrap().read_raw::<i32>().unwrap(), vec![0, 0]);
}

#[test]
fn test_empty_data() {
    let file = new_file().unwrap();

    let data: &[u16] = &[];
    let ds = file.new_dataset_builder().with_data(data).create("ds2").unwrap();
    assert_eq!(ds.shape(), vec![0]);

    let data: Array2<u16> = Array2::from_shape_fn((0, 0), |(_i, _j)| unreachable!());
    let ds = file.new_dataset_builder().with_data(&data).create("ds3").unwrap();
    assert_eq!(ds.read_2d::<u16>().unwrap(), data);
}

#[test]
fn test_shape_mismatch() {
    let file = new_file().unwrap();
    let ds = file.new_dataset::<f64>().shape((2, 2)).create("grid").unwrap();
    assert_err_re!(
        ds.write(&arr2(&[[1.0, 2.0, 3.0]])),
        r"^shape mismatch when writing: memory = \[1, 3\], destination = \[2, 2\]$"
    );
    assert_err!(ds.read_1d::<f64>(), "ndim mismatch: expected 1, got 2");
    assert_err!(ds.read_scalar::<f64>(), "ndim mismatch: expected scalar, got 2");
}

#[test]
fn test_out_of_range_values() {
    let file = new_file().unwrap();
    let ds = file.new_dataset::<u8>().shape(2).create("bytes").unwrap();
    assert_err!(ds.write_raw(&[1_i32, 256]), "value 256 is out of range for uint8");
    assert_err!(ds.write_raw(&[-1_i64, 0]), "value -1 is out of range for uint8");
    ds.write_raw(&[255_u16, 0]).unwrap();
    assert_eq!(ds.read_raw::<u8>().unwrap(), vec![255, 0]);
    assert_err!(ds.read_raw::<i8>(), "out of range");
}
