use correlate_metrics::analyzer::{
    analyze_correlations, CorrelationConfig, CorrelationDirection, CorrelationStrength,
};
use correlate_metrics::error::CorrelationError;
use correlate_metrics::measures::CorrelationMethod;
use polars::prelude::*;
use rstest::rstest;

/// Twelve rows where churn mirrors visits exactly and signups tracks
/// visits with a small wiggle
fn trio_frame() -> DataFrame {
    let visits: Vec<f64> = (1..=12).map(|i| 10.0 * i as f64).collect();
    let wiggle = [0.0, 1.0, -1.0];
    let signups: Vec<f64> = visits
        .iter()
        .enumerate()
        .map(|(i, v)| 2.0 * v + wiggle[i % 3])
        .collect();
    let churn: Vec<f64> = visits.iter().map(|v| 130.0 - v).collect();

    df! {
        "visits" => visits,
        "signups" => signups,
        "churn" => churn,
    }
    .unwrap()
}

/// One perfectly correlated pair plus a zig-zag unrelated to either
fn ramp_and_noise_frame() -> DataFrame {
    let visits: Vec<f64> = (1..=12).map(|i| 10.0 * i as f64).collect();
    let signups: Vec<f64> = visits.iter().map(|v| 3.0 * v).collect();
    let noise: Vec<f64> = (0..12)
        .map(|i| if i % 2 == 0 { 5.0 } else { 7.0 })
        .collect();

    df! {
        "visits" => visits,
        "signups" => signups,
        "noise" => noise,
    }
    .unwrap()
}

#[test]
fn test_matrix_diagonal_and_symmetry() {
    let df = trio_frame();
    let report =
        analyze_correlations(&df, &["visits", "signups", "churn"], &CorrelationConfig::default())
            .unwrap();

    let corr = &report.correlation_matrix;
    let p = &report.p_value_matrix;
    for name in ["visits", "signups", "churn"] {
        assert_eq!(corr.get(name, name), Some(1.0));
        assert_eq!(p.get(name, name), Some(0.0));
    }
    assert_eq!(
        corr.get("visits", "signups"),
        corr.get("signups", "visits")
    );
    assert_eq!(p.get("visits", "churn"), p.get("churn", "visits"));
    assert_eq!(corr.get("visits", "missing"), None);
}

#[test]
fn test_perfectly_opposed_pair() {
    let df = trio_frame();
    let report =
        analyze_correlations(&df, &["visits", "signups", "churn"], &CorrelationConfig::default())
            .unwrap();

    // churn = 130 - visits, so the pair is exactly -1 with p = 0
    assert_eq!(report.correlation_matrix.get("visits", "churn"), Some(-1.0));
    assert_eq!(report.p_value_matrix.get("visits", "churn"), Some(0.0));
}

#[test]
fn test_significant_pairs_sorted_by_magnitude() {
    let df = trio_frame();
    let report =
        analyze_correlations(&df, &["visits", "signups", "churn"], &CorrelationConfig::default())
            .unwrap();

    let pairs = &report.significant_pairs;
    assert_eq!(pairs.len(), 3);

    // The exact -1 pair leads; the two wiggle pairs tie and keep scan order
    assert_eq!(pairs[0].variable1, "visits");
    assert_eq!(pairs[0].variable2, "churn");
    assert_eq!(pairs[0].correlation, -1.0);
    assert_eq!(pairs[0].strength, CorrelationStrength::Strong);
    assert_eq!(pairs[0].direction, CorrelationDirection::Negative);

    assert_eq!(pairs[1].variable1, "visits");
    assert_eq!(pairs[1].variable2, "signups");
    assert!(pairs[1].correlation > 0.9999 && pairs[1].correlation < 1.0);
    assert_eq!(pairs[1].direction, CorrelationDirection::Positive);

    assert_eq!(pairs[2].variable1, "signups");
    assert_eq!(pairs[2].variable2, "churn");
}

#[test]
fn test_report_attaches_derived_analyses() {
    let df = trio_frame();
    let report =
        analyze_correlations(&df, &["visits", "signups", "churn"], &CorrelationConfig::default())
            .unwrap();

    // All three variables move together
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.clusters[0].cluster_id, 1);
    assert_eq!(report.clusters[0].size, 3);
    assert_eq!(report.clusters[0].variables, &["visits", "signups", "churn"]);
    assert!(report.clusters[0].avg_correlation > 0.999);

    // churn is an exact linear combination of visits, so the VIF
    // regressions hit a singular design and the map is abandoned
    assert!(report.vif_scores.is_empty());

    // Each pair is controlled for the remaining variable
    let partials = &report.partial_correlations;
    assert_eq!(partials.len(), 3);
    assert_eq!(partials[0].variable1, "visits");
    assert_eq!(partials[0].variable2, "signups");
    assert_eq!(partials[0].controlled_for, &["churn"]);
    // visits and churn stay opposed once signups is regressed out
    assert!(partials[1].partial_correlation < -0.999);

    // Every pair is strong between trending series
    assert_eq!(report.spurious_correlations.len(), 3);
    assert_eq!(
        report.spurious_correlations[0].reason,
        "Both variables are non-stationary (trending)"
    );
}

#[test]
fn test_report_metadata_echoes_the_request() {
    let df = trio_frame();
    let config = CorrelationConfig {
        method: CorrelationMethod::Pearson,
        min_correlation: 0.25,
        max_p_value: 0.1,
    };
    let report = analyze_correlations(&df, &["visits", "signups", "churn"], &config).unwrap();

    assert_eq!(report.method, CorrelationMethod::Pearson);
    assert_eq!(report.num_variables, 3);
    assert_eq!(report.num_observations, 12);
    assert_eq!(report.metadata.columns, &["visits", "signups", "churn"]);
    assert_eq!(report.metadata.min_correlation_threshold, 0.25);
    assert_eq!(report.metadata.max_p_value_threshold, 0.1);
}

#[test]
fn test_thresholds_filter_pairs() {
    let df = ramp_and_noise_frame();

    // Default p cutoff keeps only the perfect pair
    let report =
        analyze_correlations(&df, &["visits", "signups", "noise"], &CorrelationConfig::default())
            .unwrap();
    assert_eq!(report.significant_pairs.len(), 1);
    assert_eq!(report.significant_pairs[0].variable1, "visits");
    assert_eq!(report.significant_pairs[0].variable2, "signups");

    // Relaxing the p cutoff lets the weak pairs through
    let loose = CorrelationConfig {
        max_p_value: 1.0,
        ..CorrelationConfig::default()
    };
    let report = analyze_correlations(&df, &["visits", "signups", "noise"], &loose).unwrap();
    assert_eq!(report.significant_pairs.len(), 3);

    // A magnitude floor drops them again
    let strict = CorrelationConfig {
        min_correlation: 0.5,
        max_p_value: 1.0,
        ..CorrelationConfig::default()
    };
    let report = analyze_correlations(&df, &["visits", "signups", "noise"], &strict).unwrap();
    assert_eq!(report.significant_pairs.len(), 1);
}

#[rstest]
#[case(-0.1, 0.05)]
#[case(1.5, 0.05)]
#[case(f64::NAN, 0.05)]
#[case(0.0, -0.01)]
#[case(0.0, 1.01)]
fn test_invalid_config_rejected(#[case] min_correlation: f64, #[case] max_p_value: f64) {
    let df = trio_frame();
    let config = CorrelationConfig {
        method: CorrelationMethod::Pearson,
        min_correlation,
        max_p_value,
    };
    let result = analyze_correlations(&df, &["visits", "signups"], &config);
    assert!(matches!(result, Err(CorrelationError::InvalidParameter(_))));
}

#[test]
fn test_spearman_method_flows_through() {
    let df = trio_frame();
    let config = CorrelationConfig {
        method: CorrelationMethod::Spearman,
        ..CorrelationConfig::default()
    };
    let report = analyze_correlations(&df, &["visits", "signups", "churn"], &config).unwrap();

    // Ranks of churn are exactly reversed
    assert_eq!(report.correlation_matrix.get("visits", "churn"), Some(-1.0));
    assert_eq!(report.method, CorrelationMethod::Spearman);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"method\":\"spearman\""));
}

#[test]
fn test_dropped_column_leaves_the_report() {
    let df = df! {
        "visits" => &[10.0, 20.0, 30.0, 40.0],
        "flat" => &[5.0, 5.0, 5.0, 5.0],
        "revenue" => &[1.0, 2.0, 3.0, 4.0],
    }
    .unwrap();

    let report = analyze_correlations(
        &df,
        &["visits", "flat", "revenue"],
        &CorrelationConfig::default(),
    )
    .unwrap();

    assert_eq!(report.num_variables, 2);
    assert_eq!(report.metadata.columns, &["visits", "revenue"]);
    assert_eq!(report.correlation_matrix.get("flat", "visits"), None);
}

#[test]
fn test_identical_inputs_produce_identical_reports() {
    let df = trio_frame();
    let config = CorrelationConfig::default();

    let first = analyze_correlations(&df, &["visits", "signups", "churn"], &config).unwrap();
    let second = analyze_correlations(&df, &["visits", "signups", "churn"], &config).unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[rstest]
#[case(0.7, CorrelationStrength::Strong)]
#[case(0.69, CorrelationStrength::Moderate)]
#[case(0.4, CorrelationStrength::Moderate)]
#[case(0.39, CorrelationStrength::Weak)]
#[case(-0.85, CorrelationStrength::Strong)]
#[case(0.0, CorrelationStrength::Weak)]
fn test_strength_grading(#[case] r: f64, #[case] expected: CorrelationStrength) {
    assert_eq!(CorrelationStrength::from_coefficient(r), expected);
}

#[test]
fn test_direction_and_labels() {
    assert_eq!(
        CorrelationDirection::from_coefficient(0.1),
        CorrelationDirection::Positive
    );
    assert_eq!(
        CorrelationDirection::from_coefficient(-0.1),
        CorrelationDirection::Negative
    );
    // Zero is graded as non-positive
    assert_eq!(
        CorrelationDirection::from_coefficient(0.0),
        CorrelationDirection::Negative
    );

    assert_eq!(CorrelationStrength::Strong.to_string(), "strong");
    assert_eq!(CorrelationDirection::Positive.to_string(), "positive");
}
