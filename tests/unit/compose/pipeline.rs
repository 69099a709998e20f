use super::*;
use crate::blend::algorithms::{alpha, destination_over, multiplicative};
use crate::blend::descriptor::AlgorithmDescriptor;

fn layer(seed: u8) -> PixelBuffer {
    let data: Vec<u8> = (0..(6 * 4))
        .flat_map(|i| {
            let i = i as u8;
            [
                seed.wrapping_mul(3).wrapping_add(i),
                seed.wrapping_add(i.wrapping_mul(7)),
                255u8.wrapping_sub(seed).wrapping_add(i),
                seed.wrapping_mul(41).wrapping_add(i.wrapping_mul(13)),
            ]
        })
        .collect();
    PixelBuffer::from_rgba8(6, 4, data).unwrap()
}

fn reference(layers: &[PixelBuffer], fs: &[fn([u8; 4], [u8; 4]) -> [u8; 4]]) -> PixelBuffer {
    let (w, h) = layers[0].dimensions();
    let mut out = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let mut acc = layers[0].pixel(x, y).unwrap();
            for (f, l) in fs.iter().zip(&layers[1..]) {
                acc = f(acc, l.pixel(x, y).unwrap());
            }
            out.extend_from_slice(&acc);
        }
    }
    PixelBuffer::from_rgba8(w, h, out).unwrap()
}

#[test]
fn empty_stack_fails() {
    let reg = AlgorithmRegistry::with_builtins();
    let err = composite(&reg, &[], &AlgorithmPlan::uniform("alpha")).unwrap_err();
    assert!(matches!(err, BlendError::EmptyStack));
}

#[test]
fn single_layer_is_returned_unchanged() {
    let reg = AlgorithmRegistry::with_builtins();
    let a = layer(1);
    let out = composite(&reg, std::slice::from_ref(&a), &AlgorithmPlan::uniform("alpha")).unwrap();
    assert_eq!(out, a);
}

#[test]
fn single_layer_still_checks_algorithm_name() {
    let reg = AlgorithmRegistry::with_builtins();
    let err = composite(&reg, &[layer(1)], &AlgorithmPlan::uniform("nonexistent")).unwrap_err();
    assert!(matches!(err, BlendError::UnknownAlgorithm { .. }));
}

#[test]
fn uniform_plan_is_left_fold() {
    let reg = AlgorithmRegistry::with_builtins();
    let layers = [layer(10), layer(90), layer(200)];
    let out = composite(&reg, &layers, &AlgorithmPlan::uniform("alpha")).unwrap();
    assert_eq!(out, reference(&layers, &[alpha, alpha]));
}

#[test]
fn per_step_plan_applies_in_order() {
    let reg = AlgorithmRegistry::with_builtins();
    let layers = [layer(3), layer(77), layer(150), layer(220)];
    let plan = AlgorithmPlan::per_step(["multiplicative", "destination_over", "alpha"]);
    let out = composite(&reg, &layers, &plan).unwrap();
    assert_eq!(
        out,
        reference(&layers, &[multiplicative, destination_over, alpha])
    );

    let reordered = AlgorithmPlan::per_step(["alpha", "destination_over", "multiplicative"]);
    let other = composite(&reg, &layers, &reordered).unwrap();
    assert_ne!(out, other);
}

#[test]
fn per_step_length_must_match_steps() {
    let reg = AlgorithmRegistry::with_builtins();
    let layers = [layer(1), layer(2), layer(3)];
    for plan in [
        AlgorithmPlan::per_step(["alpha"]),
        AlgorithmPlan::per_step(["alpha", "alpha", "alpha"]),
    ] {
        match composite(&reg, &layers, &plan).unwrap_err() {
            BlendError::PlanLengthMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, plan.descriptors().len());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn mismatched_layer_is_reported_before_blending() {
    let reg = AlgorithmRegistry::with_builtins();
    let small = PixelBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
    let layers = [layer(1), layer(2), small];
    match composite(&reg, &layers, &AlgorithmPlan::uniform("alpha")).unwrap_err() {
        BlendError::DimensionMismatch { expected, actual } => {
            assert_eq!(expected, (6, 4));
            assert_eq!(actual, (2, 2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parametrized_steps_resolve() {
    let reg = AlgorithmRegistry::with_builtins();
    let plan = AlgorithmPlan::per_step([AlgorithmDescriptor::with_params(
        "mask_top",
        [("factor", 0.0)],
    )]);
    let a = layer(5);
    let out = composite(&reg, &[a.clone(), layer(6)], &plan).unwrap();
    assert_eq!(out, a);
}
