use super::*;

#[test]
fn alpha_transparent_top_is_noop() {
    for bottom in [[10, 20, 30, 40], [255, 0, 0, 255], [7, 8, 9, 0]] {
        assert_eq!(alpha(bottom, [200, 100, 50, 0]), bottom);
    }
}

#[test]
fn alpha_opaque_top_replaces_bottom() {
    let top = [255, 0, 0, 255];
    assert_eq!(alpha([0, 0, 255, 255], top), top);
    assert_eq!(alpha([0, 0, 0, 0], top), top);
}

#[test]
fn alpha_half_top_mixes_and_accumulates_alpha() {
    let out = alpha([0, 0, 0, 255], [255, 255, 255, 128]);
    assert_eq!(out, [128, 128, 128, 255]);

    let out = alpha([0, 0, 0, 0], [255, 255, 255, 128]);
    assert_eq!(out[3], 128);
}

#[test]
fn source_over_matches_alpha() {
    let pairs = [
        ([10, 20, 30, 40], [50, 60, 70, 80]),
        ([255, 255, 255, 255], [0, 0, 0, 100]),
    ];
    for (b, t) in pairs {
        assert_eq!(source_over(b, t), alpha(b, t));
    }
}

#[test]
fn destination_over_keeps_opaque_bottom() {
    let bottom = [1, 2, 3, 255];
    assert_eq!(destination_over(bottom, [200, 200, 200, 255]), bottom);
    let top = [9, 9, 9, 200];
    assert_eq!(destination_over([0, 0, 0, 0], top), top);
}

#[test]
fn multiplicative_multiplies_channels() {
    let out = multiplicative([255, 128, 0, 255], [128, 255, 255, 255]);
    assert_eq!(out, [128, 128, 0, 255]);
    let out = multiplicative([200, 200, 200, 255], [255, 255, 255, 0]);
    assert_eq!(out, [200, 200, 200, 255]);
}

#[test]
fn mask_top_factor_scales_influence() {
    let bottom = [0, 0, 0, 255];
    let top = [200, 100, 50, 255];
    assert_eq!(mask_top(bottom, top, 1.0), top);
    assert_eq!(mask_top(bottom, top, 0.0), bottom);
    assert_eq!(mask_top(bottom, top, 0.5), [100, 50, 25, 255]);
    // Scaled mask saturates at full influence.
    assert_eq!(mask_top(bottom, [200, 100, 50, 128], 4.0), [200, 100, 50, 128]);
}

#[test]
fn first_top_and_first_bottom_pick_visible_pixel() {
    let b = [1, 2, 3, 4];
    let t = [5, 6, 7, 8];
    assert_eq!(first_top(b, t), t);
    assert_eq!(first_top(b, [5, 6, 7, 0]), b);
    assert_eq!(first_bottom(b, t), b);
    assert_eq!(first_bottom([1, 2, 3, 0], t), t);
}

#[test]
fn disjoint_debug_flags_overlap() {
    assert_eq!(disjoint_debug([0, 0, 0, 100], [0, 0, 0, 100]), [0, 255, 0, 200]);
    assert_eq!(disjoint_debug([0, 0, 0, 200], [0, 0, 0, 200]), [255, 0, 0, 255]);
}

#[test]
fn disjoint_over_with_transparent_bottom_yields_top() {
    assert_eq!(disjoint_over([0, 0, 0, 0], [10, 20, 30, 255]), [10, 20, 30, 255]);
}

#[test]
fn disjoint_under_with_transparent_top_yields_bottom() {
    assert_eq!(disjoint_under([10, 20, 30, 255], [0, 0, 0, 0]), [10, 20, 30, 255]);
}

#[test]
fn builtins_cover_declared_names() {
    let names: Vec<&str> = builtins().iter().map(|a| a.name()).collect();
    assert_eq!(names, BUILTIN_ALGORITHMS.to_vec());
}

#[test]
fn mask_top_rejects_negative_factor() {
    let mut params = crate::blend::params::BlendParams::new();
    params.insert("factor".to_string(), ParamValue::Float(-1.0));
    let resolved = crate::blend::params::resolve_params(
        "mask_top",
        MaskTop.params(),
        Some(&params),
        crate::blend::params::UnknownParamPolicy::Ignore,
    )
    .unwrap();
    assert!(matches!(
        MaskTop.kernel(&resolved),
        Err(BlendError::InvalidAlgorithmParams { .. })
    ));
}

#[test]
fn mask_top_huge_factor_keeps_bottom_under_transparent_top() {
    let mut params = crate::blend::params::BlendParams::new();
    params.insert("factor".to_string(), ParamValue::Float(1e300));
    let resolved = crate::blend::params::resolve_params(
        "mask_top",
        MaskTop.params(),
        Some(&params),
        crate::blend::params::UnknownParamPolicy::Ignore,
    )
    .unwrap();
    let kernel = MaskTop.kernel(&resolved).unwrap();

    let bottom = [10, 20, 30, 255];
    assert_eq!(kernel(bottom, [200, 100, 50, 0]), bottom);
    assert_eq!(kernel(bottom, [200, 100, 50, 1]), [200, 100, 50, 1]);
    assert_eq!(mask_top(bottom, [200, 100, 50, 0], f32::INFINITY), bottom);
}
