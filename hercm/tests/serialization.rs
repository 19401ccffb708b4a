//! JSON form of the store types
#![cfg(feature = "serde")]

use hercm::{Matrix, Symmetry, TransformPolicy};

fn sample() -> Matrix {
    let mut m = Matrix::new(3, 3).unwrap();
    m.set_value(1, 0, 2.0).unwrap();
    m.set_value(2, 2, -1.5).unwrap();
    m.add_remark("json");
    m.make_symmetrical(TransformPolicy::Truncate).unwrap();
    m.refresh_verification();
    m
}

#[test]
fn matrix_json_round_trip() {
    let m = sample();
    let json = serde_json::to_string(&m).unwrap();
    let back: Matrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
    assert!(back.is_verification_fresh());
}

#[test]
fn out_of_bounds_element_is_rejected() {
    let json = r#"{
        "height": 2, "width": 2, "symmetry": "Asymmetric",
        "elements": [{"row": 5, "col": 0, "val": 1.0}],
        "remarks": [], "verification": null, "verification_fresh": false
    }"#;
    let err = serde_json::from_str::<Matrix>(json).unwrap_err();
    assert!(err.to_string().contains("out of bounds"), "{err}");
}

#[test]
fn invalid_shape_is_rejected() {
    let json = r#"{
        "height": 2, "width": 3, "symmetry": "Symmetric",
        "elements": [], "remarks": [], "verification": null, "verification_fresh": false
    }"#;
    assert!(serde_json::from_str::<Matrix>(json).is_err());
}

#[test]
fn symmetric_upper_entries_fold_and_stale_verification_is_not_trusted() {
    // (1, 0, 4.0) sums to 5 mod 1 = 0, so the recorded 2.5 is stale
    let json = r#"{
        "height": 2, "width": 2, "symmetry": "Symmetric",
        "elements": [{"row": 0, "col": 1, "val": 4.0}],
        "remarks": [], "verification": 2.5, "verification_fresh": true
    }"#;
    let m: Matrix = serde_json::from_str(json).unwrap();
    assert_eq!(m.symmetry(), Symmetry::Symmetric);
    assert_eq!(m.elements()[0].coordinates(), (1, 0));
    assert_eq!(m.get_value(0, 1), Ok(4.0));
    assert!(!m.is_verification_fresh());
}
