use super::*;

fn info_with_dsc(dsc: f64) -> DscInfo {
    DscInfo::new(dsc, 1.0, 1.0, vec![], vec![], vec![])
}

#[test]
fn test_p_value_counts_at_or_above_observed() {
    let observed = info_with_dsc(0.5);
    let permuted = [0.1, 0.5, 0.7, 0.2]
        .into_iter()
        .map(info_with_dsc)
        .collect::<Vec<_>>();
    let summary = NullSummary::from_results(&observed, &permuted);
    assert_eq!(summary.permutations, 4);
    assert_eq!(summary.usable, 4);
    assert_eq!(summary.exceed_count, 2);
    assert_eq!(summary.p_value, 0.5);
    assert!((summary.null_mean - 0.375).abs() < 1e-12);
    assert!(summary.null_sd > 0.0);
}

#[test]
fn test_non_finite_null_values_are_unusable() {
    let observed = info_with_dsc(0.3);
    let permuted = vec![info_with_dsc(f64::NAN), info_with_dsc(0.4)];
    let summary = NullSummary::from_results(&observed, &permuted);
    assert_eq!(summary.permutations, 2);
    assert_eq!(summary.usable, 1);
    assert_eq!(summary.p_value, 1.0);
    assert!(summary.null_sd.is_nan());
}

#[test]
fn test_empty_null_distribution() {
    let summary = NullSummary::from_results(&info_with_dsc(0.3), &[]);
    assert!(summary.p_value.is_nan());
    assert!(summary.null_mean.is_nan());
    let json = summary.to_json();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["p_value"].is_null());
    assert_eq!(value["observed_dsc"], serde_json::json!(0.3));
    assert_eq!(value["permutations"], serde_json::json!(0));
}
