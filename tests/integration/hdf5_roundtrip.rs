//! Real HDF5 files written with the `hdf5` crate and read back through the loader

use hawk_loader::loader::{dump_hdf5, load_hdf5};
use hawk_loader::types::{get_path, ArrayData, LoadOptions, META_KEY};
use hdf5::types::{FixedAscii, FixedUnicode, VarLenUnicode};
use hdf5::{File, Group, Location};
use ndarray::arr1;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

fn text(value: &str) -> VarLenUnicode {
    value.parse().unwrap()
}

fn set_units(location: &Location, units: &str) {
    location
        .new_attr::<VarLenUnicode>()
        .shape(())
        .create("units")
        .unwrap()
        .write_scalar(&text(units))
        .unwrap();
}

fn write_axis_pair(field: &Group, x: &[i64], y: &[i64]) {
    let ds = field.new_dataset_builder().with_data(&arr1(x)).create("X_data").unwrap();
    set_units(&ds, "s");
    let ds = field.new_dataset_builder().with_data(&arr1(y)).create("Y_data").unwrap();
    set_units(&ds, "g");
}

fn write_lms(path: &Path) {
    let file = File::create(path).unwrap();
    let meta = file.create_group("Meta").unwrap();
    meta.new_dataset::<f64>()
        .shape(())
        .create("level")
        .unwrap()
        .write_scalar(&0.5)
        .unwrap();
    meta.new_dataset::<VarLenUnicode>()
        .shape(())
        .create("excitation")
        .unwrap()
        .write_scalar(&text("sine sweep"))
        .unwrap();

    let field = file.create_group("S1").unwrap().create_group("F1").unwrap();
    write_axis_pair(&field, &[0, 1, 2], &[1, 4, 9]);
}

fn write_ni(path: &Path) {
    let file = File::create(path).unwrap();
    let meta = file
        .new_dataset::<u8>()
        .shape(())
        .create("meta")
        .unwrap();
    meta.new_attr::<f64>()
        .shape(())
        .create("sample_rate")
        .unwrap()
        .write_scalar(&2048.0)
        .unwrap();

    let sensor = file.create_group("A1").unwrap();
    sensor
        .new_attr::<VarLenUnicode>()
        .shape(())
        .create("Units")
        .unwrap()
        .write_scalar(&text("m/s^2"))
        .unwrap();
    sensor
        .new_dataset_builder()
        .with_data(&arr1(&[0.25f32, f32::NAN, -1.5]))
        .create("Measurement")
        .unwrap();
    sensor
        .new_dataset_builder()
        .with_data(&arr1(&[0.0f64, 0.5, 1.0]))
        .create("Timestamp")
        .unwrap();
}

#[test]
fn test_lms_file_reference_scenario() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("LMS_BR_AR_1_1.hd5");
    write_lms(&path);

    let opts = LoadOptions::default().with_meta(false);
    let out = load_hdf5(&path, &opts).unwrap();
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({"S1": {"F1": {
            "X_data": {"value": [0, 1, 2], "units": "s"},
            "Y_data": {"value": [1, 4, 9], "units": "g"}
        }}})
    );

    let out = load_hdf5(&path, &LoadOptions::default()).unwrap();
    assert_eq!(get_path(&out, &["Meta", "level"]).unwrap().value(), Some(&ArrayData::from(0.5f64)));
    assert_eq!(
        get_path(&out, &["Meta", "excitation"]).unwrap().value().unwrap().as_text(),
        Some("sine sweep")
    );
}

#[test]
fn test_ni_file_keeps_float_bits() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("NI_DS_TLE_1_1.hd5");
    write_ni(&path);

    let out = load_hdf5(&path, &LoadOptions::default().compressed(true)).unwrap();
    let measurement = get_path(&out, &["A1", "Measurement"]).unwrap();
    assert_eq!(measurement.units(), Some("m/s^2"));
    match measurement.value().unwrap() {
        ArrayData::F32(values) => {
            let bits: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits, vec![0.25f32.to_bits(), f32::NAN.to_bits(), (-1.5f32).to_bits()]);
        }
        other => panic!("expected f32 payload, got {}", other.dtype_name()),
    }
    assert_eq!(out["Timestamp"].units(), Some("s"));
    assert!(out[META_KEY].as_group().unwrap().contains_key("sample_rate"));
}

fn write_fixed_string_lms(path: &Path) {
    let file = File::create(path).unwrap();
    let field = file.create_group("S1").unwrap().create_group("F1").unwrap();
    let x = field.new_dataset_builder().with_data(&arr1(&[0i64, 1])).create("X_data").unwrap();
    x.new_attr::<FixedAscii<8>>()
        .shape(())
        .create("units")
        .unwrap()
        .write_scalar(&FixedAscii::<8>::from_ascii(b"Hz").unwrap())
        .unwrap();
    let y = field.new_dataset_builder().with_data(&arr1(&[3i64, 4])).create("Y_data").unwrap();
    y.new_attr::<FixedUnicode<300>>()
        .shape(())
        .create("units")
        .unwrap()
        .write_scalar(&"m/s²".parse::<FixedUnicode<300>>().unwrap())
        .unwrap();

    file.group("S1")
        .unwrap()
        .new_dataset::<FixedAscii<16>>()
        .shape(())
        .create("model")
        .unwrap()
        .write_scalar(&FixedAscii::<16>::from_ascii(b"352C33").unwrap())
        .unwrap();
}

#[test]
fn test_fixed_length_strings() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("LMS_fixed_1_1.hd5");
    write_fixed_string_lms(&path);

    let out = load_hdf5(&path, &LoadOptions::default()).unwrap();
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({"S1": {
            "F1": {
                "X_data": {"value": [0, 1], "units": "Hz"},
                "Y_data": {"value": [3, 4], "units": "m/s²"}
            },
            "model": "352C33"
        }})
    );
}

#[test]
fn test_dump_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("LMS_dump.hd5");
    write_lms(&path);

    let tree = dump_hdf5(&path).unwrap();
    let x = get_path(&tree, &["S1", "F1", "X_data"]).unwrap().as_group().unwrap();
    assert_eq!(x["units"].value().unwrap().as_text(), Some("s"));
}

#[test]
fn test_missing_file_is_access_error() {
    let err = load_hdf5(Path::new("/nonexistent/LMS_x.hd5"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, hawk_loader::LoaderError::ContainerAccess { .. }));
}
