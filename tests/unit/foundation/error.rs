use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BlendError::unknown_algorithm("nope")
            .to_string()
            .contains("unknown algorithm: 'nope'")
    );
    assert!(
        BlendError::invalid_params("mask_top", "x")
            .to_string()
            .contains("invalid algorithm params:")
    );
    assert!(
        BlendError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        BlendError::invalid_option("x")
            .to_string()
            .contains("invalid encoding option:")
    );
    assert!(BlendError::EmptyStack.to_string().contains("empty stack"));
}

#[test]
fn dimension_mismatch_reports_both_sizes() {
    let err = BlendError::DimensionMismatch {
        expected: (4, 3),
        actual: (2, 1),
    };
    assert_eq!(err.to_string(), "dimension mismatch: expected 4x3, got 2x1");
}

#[test]
fn plan_length_mismatch_reports_lengths() {
    let err = BlendError::PlanLengthMismatch {
        expected: 4,
        actual: 2,
    };
    let msg = err.to_string();
    assert!(msg.contains("expected 4"));
    assert!(msg.contains("got 2"));
}

#[test]
fn io_keeps_path_and_source() {
    let err = BlendError::io("missing/out.png", std::io::Error::other("boom"));
    let msg = err.to_string();
    assert!(msg.contains("missing/out.png"));
    assert!(msg.contains("boom"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BlendError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), "Other");
}

#[test]
fn kinds_are_distinct_tags() {
    assert_eq!(
        BlendError::unknown_algorithm("x").kind(),
        "UnknownAlgorithm"
    );
    assert_eq!(BlendError::decode("x").kind(), "DecodeError");
    assert_eq!(
        BlendError::io("p", std::io::Error::other("x")).kind(),
        "IOError"
    );
}
