use correlate_metrics::error::CorrelationError;
use correlate_metrics::significance::correlation_significance;
use rstest::rstest;

#[test]
fn test_perfect_correlation_collapses_to_a_point() {
    let report = correlation_significance(1.0, 10, 0.05).unwrap();

    assert_eq!(report.t_statistic, f64::INFINITY);
    assert_eq!(report.p_value, 0.0);
    assert!(report.is_significant);
    assert_eq!(report.confidence_interval.lower, 1.0);
    assert_eq!(report.confidence_interval.upper, 1.0);
    assert!((report.confidence_interval.level - 0.95).abs() < 1e-12);

    let negative = correlation_significance(-1.0, 10, 0.05).unwrap();
    assert_eq!(negative.t_statistic, f64::NEG_INFINITY);
    assert_eq!(negative.confidence_interval.lower, -1.0);
    assert_eq!(negative.confidence_interval.upper, -1.0);
}

#[test]
fn test_three_observations_leave_the_interval_open() {
    let report = correlation_significance(0.5, 3, 0.05).unwrap();

    // One degree of freedom: t = 1/sqrt(3), and the Cauchy tail gives
    // p = 2 * (1 - 2/3) = 2/3 exactly
    assert!((report.p_value - 2.0 / 3.0).abs() < 1e-9);
    assert!(!report.is_significant);
    assert_eq!(report.confidence_interval.lower, -1.0);
    assert_eq!(report.confidence_interval.upper, 1.0);
}

#[test]
fn test_fisher_interval_known_values() {
    let report = correlation_significance(0.5, 28, 0.05).unwrap();

    // z = atanh(0.5), se = 1/sqrt(25), z_crit = 1.96
    let interval = report.confidence_interval;
    assert!((interval.lower - 0.156).abs() < 1e-3);
    assert!((interval.upper - 0.736).abs() < 1e-3);
    assert!(interval.lower < report.correlation && report.correlation < interval.upper);

    assert!(report.is_significant);
    assert!(report.p_value < 0.01);
    assert_eq!(report.sample_size, 28);
}

#[test]
fn test_zero_correlation_is_never_significant() {
    let report = correlation_significance(0.0, 30, 0.05).unwrap();

    assert_eq!(report.t_statistic, 0.0);
    assert!((report.p_value - 1.0).abs() < 1e-9);
    assert!(!report.is_significant);
    // The Fisher interval is symmetric around zero
    assert!((report.confidence_interval.lower + report.confidence_interval.upper).abs() < 1e-12);
}

#[test]
fn test_smaller_alpha_widens_the_interval() {
    let loose = correlation_significance(0.6, 40, 0.10).unwrap();
    let strict = correlation_significance(0.6, 40, 0.01).unwrap();

    assert!(strict.confidence_interval.lower < loose.confidence_interval.lower);
    assert!(strict.confidence_interval.upper > loose.confidence_interval.upper);
    assert!((loose.confidence_interval.level - 0.90).abs() < 1e-12);
    assert!((strict.confidence_interval.level - 0.99).abs() < 1e-12);
}

#[rstest]
#[case(1.5)]
#[case(-1.01)]
#[case(f64::NAN)]
fn test_out_of_range_correlation_rejected(#[case] r: f64) {
    let result = correlation_significance(r, 10, 0.05);
    assert!(matches!(result, Err(CorrelationError::InvalidParameter(_))));
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(-0.05)]
#[case(f64::NAN)]
fn test_out_of_range_alpha_rejected(#[case] alpha: f64) {
    let result = correlation_significance(0.5, 10, alpha);
    match result {
        Err(CorrelationError::InvalidParameter(msg)) => {
            assert!(msg.contains("alpha must be strictly between 0 and 1"));
        }
        other => panic!("Expected InvalidParameter, got {:?}", other),
    }
}

#[test]
fn test_too_few_observations_rejected() {
    let result = correlation_significance(0.5, 2, 0.05);
    match result {
        Err(CorrelationError::InsufficientData(msg)) => {
            assert!(msg.contains("Need at least 3 observations"));
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }
}
