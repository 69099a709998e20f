use super::*;

#[test]
fn blend_defaults_to_multiplicative() {
    assert_eq!(
        BlendOpts::default().plan(),
        AlgorithmPlan::uniform(DEFAULT_ALGORITHM)
    );
    assert_eq!(
        BlendOpts::algorithm("alpha").plan(),
        AlgorithmPlan::uniform("alpha")
    );
}

#[test]
fn per_step_list_wins_over_uniform() {
    let opts = MultipleOpts {
        algorithm: Some("alpha".into()),
        algorithms: Some(vec!["multiplicative".into(), "source_over".into()]),
    };
    assert_eq!(
        opts.plan(),
        AlgorithmPlan::per_step(["multiplicative", "source_over"])
    );
    assert_eq!(
        MultipleOpts::default().plan(),
        AlgorithmPlan::uniform("multiplicative")
    );
}

#[test]
fn multiple_opts_from_json_payload() {
    let opts: MultipleOpts = serde_json::from_str(
        r#"{
            "algorithm": "alpha",
            "algorithms": [
                "alpha",
                {"algorithm": "mask_top", "params": {"factor": 0.5, "tobias": true}}
            ]
        }"#,
    )
    .unwrap();
    let plan = opts.plan();
    let descs = plan.descriptors();
    assert_eq!(descs.len(), 2);
    assert_eq!(descs[1].name(), "mask_top");
    assert_eq!(
        descs[1].params().unwrap().get("factor").and_then(|v| v.as_f64()),
        Some(0.5)
    );
}

#[test]
fn engine_opts_defaults() {
    let opts = EngineOpts::default();
    assert_eq!(opts.threads, None);
    assert_eq!(opts.unknown_params, UnknownParamPolicy::Ignore);
}

#[test]
fn plan_round_trips_through_opts() {
    let plan = AlgorithmPlan::per_step(["alpha", "alpha"]);
    assert_eq!(MultipleOpts::from(plan.clone()).plan(), plan);
}
