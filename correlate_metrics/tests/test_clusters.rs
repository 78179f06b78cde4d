use correlate_metrics::analyzer::CorrelationMatrix;
use correlate_metrics::clusters::identify_clusters;

fn matrix(variables: &[&str], values: Vec<Vec<f64>>) -> CorrelationMatrix {
    CorrelationMatrix {
        variables: variables.iter().map(|s| s.to_string()).collect(),
        values,
    }
}

#[test]
fn test_tight_trio_forms_one_cluster() {
    let m = matrix(
        &["visits", "signups", "revenue", "latency"],
        vec![
            vec![1.0, 0.9, 0.9, 0.1],
            vec![0.9, 1.0, 0.9, 0.1],
            vec![0.9, 0.9, 1.0, 0.1],
            vec![0.1, 0.1, 0.1, 1.0],
        ],
    );

    let clusters = identify_clusters(&m);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].cluster_id, 1);
    assert_eq!(clusters[0].size, 3);
    assert_eq!(clusters[0].variables, &["visits", "signups", "revenue"]);
    assert!((clusters[0].avg_correlation - 0.9).abs() < 1e-9);
}

#[test]
fn test_clusters_sorted_by_size() {
    let m = matrix(
        &["a", "b", "c", "d", "e"],
        vec![
            vec![1.0, 0.95, 0.95, 0.0, 0.0],
            vec![0.95, 1.0, 0.95, 0.0, 0.0],
            vec![0.95, 0.95, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0, 0.8],
            vec![0.0, 0.0, 0.0, 0.8, 1.0],
        ],
    );

    let clusters = identify_clusters(&m);

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].cluster_id, 1);
    assert_eq!(clusters[0].size, 3);
    assert_eq!(clusters[1].cluster_id, 2);
    assert_eq!(clusters[1].variables, &["d", "e"]);
    assert!((clusters[1].avg_correlation - 0.8).abs() < 1e-9);
}

#[test]
fn test_negative_correlations_cluster_by_magnitude() {
    // Sign is ignored: strongly opposed variables still move together
    let m = matrix(
        &["visits", "churn"],
        vec![vec![1.0, -0.9], vec![-0.9, 1.0]],
    );

    let clusters = identify_clusters(&m);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].size, 2);
    assert!((clusters[0].avg_correlation - 0.9).abs() < 1e-9);
}

#[test]
fn test_cut_distance_separates_weak_pairs() {
    let joined = matrix(
        &["a", "b"],
        vec![vec![1.0, 0.75], vec![0.75, 1.0]],
    );
    assert_eq!(identify_clusters(&joined).len(), 1);

    let split = matrix(
        &["a", "b"],
        vec![vec![1.0, 0.65], vec![0.65, 1.0]],
    );
    assert!(identify_clusters(&split).is_empty());
}

#[test]
fn test_average_linkage_keeps_outliers_out() {
    // b bridges a and c, but the average distance to c stays too large:
    // ((1 - 0.45) + (1 - 0.75)) / 2 = 0.4
    let m = matrix(
        &["a", "b", "c"],
        vec![
            vec![1.0, 0.9, 0.45],
            vec![0.9, 1.0, 0.75],
            vec![0.45, 0.75, 1.0],
        ],
    );

    let clusters = identify_clusters(&m);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].variables, &["a", "b"]);
}

#[test]
fn test_members_keep_matrix_order() {
    let m = matrix(
        &["zeta", "alpha"],
        vec![vec![1.0, 0.9], vec![0.9, 1.0]],
    );

    let clusters = identify_clusters(&m);

    assert_eq!(clusters[0].variables, &["zeta", "alpha"]);
}

#[test]
fn test_too_few_variables_yield_nothing() {
    let single = matrix(&["alone"], vec![vec![1.0]]);
    assert!(identify_clusters(&single).is_empty());

    let empty = matrix(&[], Vec::new());
    assert!(identify_clusters(&empty).is_empty());
}

#[test]
fn test_non_finite_matrix_yields_nothing() {
    let m = matrix(
        &["a", "b"],
        vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
    );
    assert!(identify_clusters(&m).is_empty());
}
