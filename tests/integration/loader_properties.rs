//! Loader behaviour over whole containers
//!
//! Reference scenarios, unit wrapping, read fidelity, compression
//! equivalence, filter monotonicity, schema inference and the metadata
//! toggle.

use crate::common::{
    dataset_paths, keys_subset, lms_container, ni_container, same_bits, scenario_container,
    LMS_FIELDS, LMS_SENSORS, NI_SENSORS,
};
use hawk_loader::container::{dataset_units, Container};
use hawk_loader::loader::load_container;
use hawk_loader::types::{get_path, LoadOptions, Tree, META_KEY};
use hawk_loader::LoaderError;
use serde_json::json;
use std::path::Path;

const LMS_FILE: &str = "LMS_BR_AR_1_1.hd5";
const NI_FILE: &str = "NI_BR_AR_1_1.hd5";

fn lms(opts: &LoadOptions) -> Tree {
    load_container(&lms_container(), Path::new(LMS_FILE), opts).unwrap()
}

fn ni(opts: &LoadOptions) -> Tree {
    load_container(&ni_container(), Path::new(NI_FILE), opts).unwrap()
}

#[test]
fn test_reference_scenario_uncompressed() {
    let out = load_container(&scenario_container(), Path::new("LMS_x.hd5"), &LoadOptions::default()).unwrap();
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({"S1": {"F1": {
            "X_data": {"value": [0, 1, 2], "units": "s"},
            "Y_data": {"value": [1, 4, 9], "units": "g"}
        }}})
    );
}

#[test]
fn test_reference_scenario_compressed() {
    let opts = LoadOptions::default().compressed(true);
    let out = load_container(&scenario_container(), Path::new("LMS_x.hd5"), &opts).unwrap();
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({
            "X_data": {"F1": {"value": [0, 1, 2], "units": "s"}},
            "S1": {"F1": {"Y_data": {"value": [1, 4, 9], "units": "g"}}}
        })
    );
}

#[test]
fn test_units_wrap_exactly_the_datasets_that_carry_them() {
    let container = lms_container();
    let out = lms(&LoadOptions::default());
    for path in dataset_paths(&container, "/") {
        let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let leaf = get_path(&out, &parts).unwrap_or_else(|| panic!("{} not loaded", path));
        let units = dataset_units(&container, &path).unwrap();
        assert_eq!(leaf.units(), units.as_deref(), "units mismatch at {}", path);
    }
}

#[test]
fn test_leaves_reproduce_source_bits() {
    let container = lms_container();
    let out = lms(&LoadOptions::default());
    for path in dataset_paths(&container, "/") {
        let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let leaf = get_path(&out, &parts).unwrap().value().unwrap();
        assert!(same_bits(leaf, &container.read(&path).unwrap()), "bits differ at {}", path);
    }

    let container = ni_container();
    let out = ni(&LoadOptions::default());
    for sensor in NI_SENSORS {
        for name in ["Measurement", "Timestamp"] {
            let leaf = get_path(&out, &[sensor, name]).unwrap().value().unwrap();
            let source = container.read(&format!("/{}/{}", sensor, name)).unwrap();
            assert!(same_bits(leaf, &source));
        }
    }
}

#[test]
fn test_compression_preserves_dependent_values() {
    let plain = lms(&LoadOptions::default());
    let packed = lms(&LoadOptions::default().compressed(true));

    for sensor in LMS_SENSORS {
        for field in LMS_FIELDS {
            let a = get_path(&plain, &[sensor, field, "Y_data"]).unwrap();
            let b = get_path(&packed, &[sensor, field, "Y_data"]).unwrap();
            assert!(same_bits(a.value().unwrap(), b.value().unwrap()));
            assert_eq!(a.units(), b.units());
            assert!(get_path(&packed, &[sensor, field, "X_data"]).is_none());
        }
    }
    // One shared axis per field
    assert_eq!(packed["X_data"].leaf_count(), LMS_FIELDS.len());

    let plain = ni(&LoadOptions::default());
    let packed = ni(&LoadOptions::default().compressed(true));
    for sensor in NI_SENSORS {
        assert_eq!(
            get_path(&plain, &[sensor, "Measurement"]),
            get_path(&packed, &[sensor, "Measurement"])
        );
    }
    let timestamps = packed
        .values()
        .flat_map(|e| e.as_group().into_iter().flat_map(|g| g.keys()))
        .filter(|k| k.as_str() == "Timestamp")
        .count();
    assert_eq!(timestamps, 0);
    assert!(packed.contains_key("Timestamp"));
}

#[test]
fn test_filters_are_monotonic() {
    let full = lms(&LoadOptions::default());
    let cases = [
        LoadOptions::default().with_sensors(["S1"]),
        LoadOptions::default().with_sensors(["S3", "S2"]),
        LoadOptions::default().with_data(["FRF"]),
        LoadOptions::default().with_sensors(["S2"]).with_data(["Coherence"]),
    ];
    for opts in &cases {
        let filtered = lms(opts);
        assert!(keys_subset(&filtered, &full), "{:?} is not a subset", opts);
    }

    let full = ni(&LoadOptions::default());
    let filtered = ni(&LoadOptions::default().with_sensors(["A1", "A3"]));
    assert!(keys_subset(&filtered, &full));
    assert!(!filtered.contains_key("A2"));
}

#[test]
fn test_schema_inferred_from_file_name() {
    let container = ni_container();
    // NI prefix wins over an LMS fallback
    let out = load_container(&container, Path::new("NI_foo.hd5"), &LoadOptions::default()).unwrap();
    assert!(get_path(&out, &["A1", "Timestamp"]).is_some());

    // LMS rules applied to an NI layout fail: no X_data under Measurement
    let err = load_container(&container, Path::new("LMS_foo.hd5"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoaderError::MissingPath(_) | LoaderError::ContainerAccess { .. }));

    // Neither prefix: the explicit tag decides
    let opts = LoadOptions::default().with_series("NI");
    let out = load_container(&container, Path::new("foo.hd5"), &opts).unwrap();
    assert!(out.contains_key(META_KEY));
    assert!(get_path(&out, &["A2", "Measurement"]).is_some());
}

#[test]
fn test_meta_toggle_removes_meta_key() {
    let opts = LoadOptions::default().with_meta(false);
    assert!(!lms(&opts).contains_key(META_KEY));
    assert!(!ni(&opts).contains_key(META_KEY));
    assert!(!ni(&opts.compressed(true)).contains_key(META_KEY));
    assert!(lms(&LoadOptions::default()).contains_key(META_KEY));
}
