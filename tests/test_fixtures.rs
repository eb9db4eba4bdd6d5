use std::thread;

use pretty_assertions::assert_eq;
use regex::Regex;

use h5fixture::fixtures::{
    self, write_cycled, AllTypesCompound, AllTypesRecord, CompoundFixture, CompoundRecord,
    Dimensions, Fixture, Level, SalesCube, TicTacToe,
};
use h5fixture::types::{TypeDescriptor, CYCLE_LENGTH};
use h5fixture::{cycled, File, Storage};

#[macro_use]
mod common;

use self::common::util::{new_file, random_filename};

fn field_names(td: &TypeDescriptor) -> Vec<String> {
    match td {
        TypeDescriptor::Compound(ct) => ct.fields.iter().map(|f| f.name.clone()).collect(),
        _ => panic!("expected a compound type, got {}", td),
    }
}

#[test]
fn test_write_all() {
    let files = fixtures::write_all().unwrap();
    let mut listing: Vec<(String, Vec<String>)> = files
        .iter()
        .map(|f| (f.filename(), f.dataset_names().unwrap().into_iter().take(3).collect()))
        .collect();
    listing.sort();
    let expected: Vec<(String, Vec<String>)> = vec![
        ("alltypes_separate.h5", vec!["array", "bit_field", "compound"]),
        ("compound_alltypes.h5", vec!["dummy", "myDataset"]),
        ("compound_array.h5", vec!["records"]),
        ("compound_example.h5", vec!["CompoundData"]),
        ("cycled_integers.h5", vec!["int16", "int32", "int64"]),
        ("dimensions.h5", vec!["1d_dataset", "2d_dataset", "2d_dataset_permuted"]),
        ("sales_cube.h5", vec!["sales"]),
        ("single_int_v2.h5", vec!["MyIntegerValue"]),
        ("tictactoe_4d_state.h5", vec!["game"]),
        ("twenty_datasets.h5", vec!["dataset_1", "dataset_10", "dataset_11"]),
        ("vlen_types_example.h5", vec!["vlen_float", "vlen_int", "vlen_str"]),
    ]
    .into_iter()
    .map(|(f, ds)| (f.to_owned(), ds.into_iter().map(str::to_owned).collect()))
    .collect();
    assert_eq!(listing, expected);

    let reopened = File::open("compound_example.h5").unwrap();
    assert!(reopened.is_read_only());
    let ds = reopened.dataset("CompoundData").unwrap();
    let re = Regex::new(r#"^<dataset "CompoundData": \(1000,\) compound \(14 fields\)>$"#).unwrap();
    assert!(re.is_match(&format!("{:?}", ds)));
    assert_eq!(ds.storage_size(), 96 * 1000);
}

#[test]
fn test_compound_members() {
    let file = new_file().unwrap();
    CompoundFixture::default().records(5).write(&file).unwrap();
    let ds = file.dataset("CompoundData").unwrap();
    assert_eq!(
        field_names(ds.dtype()),
        vec![
            "recordId",
            "fixedStr",
            "varStr",
            "floatVal",
            "doubleVal",
            "int8_Val",
            "uint8_Val",
            "int16_Val",
            "uint16_Val",
            "int32_Val",
            "uint32_Val",
            "int64_Val",
            "uint64_Val",
            "scaledUintVal",
        ]
    );
    let TypeDescriptor::Compound(ct) = ds.dtype() else { panic!("expected a compound type") };
    assert_eq!(ct.field("varStr").unwrap().ty, TypeDescriptor::VarLenUnicode);
    let records = ds.read_raw::<CompoundRecord>().unwrap();
    let var_strs: Vec<_> = records.iter().map(|r| r.var_str.as_str()).collect();
    assert_eq!(var_strs, vec!["varStr:1", "varStr:2", "varStr:3", "varStr:4", "varStr:5"]);
    let scaled: Vec<_> = records.iter().map(|r| r.scaled_uint_val.to_f64()).collect();
    assert_eq!(scaled, vec![1.0, 2.25, 3.5, 4.75, 5.0]);
}

#[test]
fn test_compound_values_by_name() {
    let file = new_file().unwrap();
    CompoundFixture::default().records(2).write(&file).unwrap();
    let values = file.dataset("CompoundData").unwrap().read_values().unwrap();
    assert_eq!(values[1].field("recordId").unwrap().to_string(), "1001");
    assert_eq!(values[1].field("fixedStr").unwrap().as_str().unwrap(), "FixedData");
    assert_eq!(values[0].field("int64_Val").unwrap().to_string(), i64::MIN.to_string());
    assert!(values[0].field("missing").is_err());
}

#[test]
fn test_alltypes_compound_members() {
    let file = new_file().unwrap();
    AllTypesCompound::default().records(2).write(&file).unwrap();
    let ds = file.dataset("myDataset").unwrap();
    assert_eq!(
        field_names(ds.dtype()),
        vec![
            "fixed_point",
            "floating_point",
            "time",
            "string",
            "bit_field",
            "opaque",
            "compound",
            "reference",
            "enumerated",
            "array",
            "variable_length",
        ]
    );
    let records = ds.read_raw::<AllTypesRecord>().unwrap();
    assert_eq!(records[1].enumerated, Level::Medium);
    assert_eq!(file.dereference(records[1].reference).unwrap(), "dummy");
}

#[test]
fn test_several_fixtures_in_one_storage() {
    let file = new_file().unwrap();
    Dimensions::default().write(&file).unwrap();
    TicTacToe::default().write(&file).unwrap();
    SalesCube::default().write(&file).unwrap();
    assert_eq!(
        file.dataset_names().unwrap(),
        vec!["1d_dataset", "2d_dataset", "2d_dataset_permuted", "game", "sales", "scalar_dataset"]
    );
    assert_err!(SalesCube::default().write(&file), "unable to create dataset: 'sales' already exists");
}

#[test]
fn test_read_only_target() {
    let name = random_filename();
    drop(File::create(&name).unwrap());
    let file = File::open(&name).unwrap();
    assert_err_re!(TicTacToe::default().write(&file), r"no write intent on file$");
    assert!(file.dataset_names().unwrap().is_empty());
}

#[test]
fn test_custom_output_name() {
    let name = random_filename();
    let fixture = SalesCube::default().file_name(&name).dataset_name("cube").extent(4);
    assert_eq!(fixture.output(), name);
    let file = fixture.create().unwrap();
    assert_eq!(file.dataset("cube").unwrap().shape(), vec![4, 4, 4]);
    assert!(File::open(&name).unwrap().dataset("cube").is_ok());
    assert_err!(File::open("definitely-missing.h5"), "unable to open file");
}

#[test]
fn test_concurrent_writers() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<File>();

    let name = random_filename();
    let workers: Vec<_> = (0..8_usize)
        .map(|n| {
            let name = name.clone();
            thread::spawn(move || {
                let file = File::append(&name).unwrap();
                write_cycled::<i16>(&file, &format!("worker_{}", n), 10 + n).unwrap();
                (0..CYCLE_LENGTH * 4).map(cycled::<i64>).collect::<Vec<_>>()
            })
        })
        .collect();
    let tables: Vec<Vec<i64>> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    let expected: Vec<i64> = (0..CYCLE_LENGTH * 4).map(cycled).collect();
    assert!(tables.iter().all(|table| *table == expected));

    let file = File::open(&name).unwrap();
    let names: Vec<String> = (0..8).map(|n| format!("worker_{}", n)).collect();
    assert_eq!(file.dataset_names().unwrap(), names);
    for n in 0..8_u64 {
        let values = file.dataset(&format!("worker_{}", n)).unwrap().read_raw::<i16>().unwrap();
        let expected: Vec<i16> = (0..10 + n).map(cycled).collect();
        assert_eq!(values, expected);
    }
}
