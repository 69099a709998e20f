use super::*;

#[test]
fn bare_string_deserializes_as_named() {
    let desc: AlgorithmDescriptor = serde_json::from_str(r#""alpha""#).unwrap();
    assert_eq!(desc, AlgorithmDescriptor::named("alpha"));
    assert!(desc.params().is_none());
}

#[test]
fn object_deserializes_as_parametrized() {
    let desc: AlgorithmDescriptor = serde_json::from_str(
        r#"{"algorithm": "mask_top", "params": {"factor": 0.5, "tobias": true, "matias": "x"}}"#,
    )
    .unwrap();
    assert_eq!(desc.name(), "mask_top");
    let params = desc.params().unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params["factor"], ParamValue::Float(0.5));
}

#[test]
fn object_without_params_gets_empty_map() {
    let desc: AlgorithmDescriptor =
        serde_json::from_str(r#"{"algorithm": "destination_over"}"#).unwrap();
    assert_eq!(desc.name(), "destination_over");
    assert!(desc.params().unwrap().is_empty());
}

#[test]
fn mixed_plan_array_deserializes() {
    let plan: AlgorithmPlan = serde_json::from_str(
        r#"["alpha", {"algorithm": "mask_top", "params": {"factor": 2}}, "multiplicative"]"#,
    )
    .unwrap();
    assert_eq!(plan.label(), "alpha,mask_top,multiplicative");
    assert_eq!(plan.descriptors().len(), 3);
}

#[test]
fn with_params_builds_map() {
    let desc = AlgorithmDescriptor::with_params("mask_top", [("factor", 0.25)]);
    assert_eq!(desc.params().unwrap()["factor"], ParamValue::Float(0.25));
    assert_eq!(desc.to_string(), "mask_top");
}
