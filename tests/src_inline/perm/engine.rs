use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::fixtures::{assert_close, sequential_matrix, toy_labels, toy_matrix};
use crate::perm::outcome::TaskErrorKind;

fn engine(seed: u64, permutations: usize, workers: usize) -> DscPerm {
    DscPerm::new(
        toy_matrix(),
        toy_labels(),
        &PermConfig::new(seed, permutations, workers),
    )
    .unwrap()
}

fn sorted(mut row: Vec<f64>) -> Vec<f64> {
    row.sort_by(|a, b| a.total_cmp(b));
    row
}

#[test]
fn test_perm_only_shuffles_within_rows() {
    let original = sequential_matrix();
    let labels = BatchLabels::new(vec!["x".to_string(); 8]);
    let mut perm = DscPerm::new(original.clone(), labels, &PermConfig::new(314, 0, 1)).unwrap();
    perm.perm_only();
    let shuffled = perm.matrix();
    assert_eq!(shuffled.n_features(), 4);
    assert_eq!(shuffled.n_samples(), 8);
    for f in 0..4 {
        assert_eq!(sorted(shuffled.row(f).to_vec()), original.row(f).to_vec());
    }
    assert_ne!(shuffled, &original);
}

#[test]
fn test_perm_only_reproducible() {
    let labels = BatchLabels::new(vec!["x".to_string(); 8]);
    let config = PermConfig::new(314, 0, 1);
    let mut a = DscPerm::new(sequential_matrix(), labels.clone(), &config).unwrap();
    let mut b = DscPerm::new(sequential_matrix(), labels, &config).unwrap();
    a.perm_only();
    b.perm_only();
    assert_eq!(a.matrix(), b.matrix());
    a.perm_only();
    assert_ne!(a.matrix(), b.matrix());
}

#[test]
fn test_perm_only_seed_314_order() {
    // 1-based sample positions drawn per feature for seed 314
    let expected = [
        [3, 1, 6, 7, 8, 5, 2, 4],
        [7, 4, 2, 1, 5, 6, 8, 3],
        [5, 4, 8, 1, 7, 2, 3, 6],
        [4, 2, 8, 5, 6, 3, 1, 7],
    ];
    let original = sequential_matrix();
    let labels = BatchLabels::new(vec!["x".to_string(); 8]);
    let mut perm = DscPerm::new(original.clone(), labels, &PermConfig::new(314, 0, 1)).unwrap();
    perm.perm_only();
    for (f, order) in expected.iter().enumerate() {
        let want = order
            .iter()
            .map(|&s| original.get(f, s - 1))
            .collect::<Vec<_>>();
        assert_eq!(perm.matrix().row(f), want.as_slice(), "feature {f}");
    }
}

#[test]
fn test_perm_dsc_once_seed_314_values() {
    let info = engine(314, 1, 1).perm_dsc_once().unwrap();
    assert_close(info.dsc(), 0.2171420982, 1e-8);
    assert_close(info.db(), 0.4261265915, 1e-8);
    assert_close(info.dw(), 1.9624319515, 1e-8);
    let expected = [0.1837782316, 0.2354287080, 0.2466315054, 0.2176675741];
    for (got, want) in info.feature_dsc().iter().zip(expected) {
        assert_close(*got, want, 1e-8);
    }
}

#[test]
fn test_rows_are_shuffled_independently() {
    // identical rows stay identical only if every row drew the same order
    let rows = vec![(0..20).map(|v| v as f64).collect::<Vec<_>>(); 3];
    let m = Matrix::from_rows(rows).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let p = permuted_rows(&m, &mut rng);
    assert!(p.row(0) != p.row(1) || p.row(1) != p.row(2));
}

#[test]
fn test_perm_dsc_once_reproducible() {
    let a = engine(314, 1, 1).perm_dsc_once().unwrap();
    let b = engine(314, 1, 1).perm_dsc_once().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.feature_dsc().len(), 4);
    let c = engine(315, 1, 1).perm_dsc_once().unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_multi_matches_sequential_once_calls() {
    let multi = engine(314, 6, 3).perm_dsc_multi().unwrap();
    let mut serial = engine(314, 6, 1);
    let once = (0..6)
        .map(|_| serial.perm_dsc_once().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(multi, once);
}

#[test]
fn test_multi_independent_of_worker_count() {
    let one = engine(314, 20, 1).perm_dsc_multi().unwrap();
    let many = engine(314, 20, 10).perm_dsc_multi().unwrap();
    assert_eq!(one.len(), 20);
    assert_eq!(one, many);
}

#[test]
fn test_multi_zero_permutations() {
    assert!(engine(314, 0, 4).perm_dsc_multi().unwrap().is_empty());
}

#[test]
fn test_new_rejects_label_mismatch() {
    let labels = BatchLabels::from(&["a", "b", "c"][..]);
    let err = DscPerm::new(toy_matrix(), labels, &PermConfig::new(1, 1, 1)).unwrap_err();
    assert!(matches!(err, DscError::SampleCountMismatch { .. }));
}

#[test]
fn test_new_rejects_zero_workers() {
    let err = DscPerm::new(toy_matrix(), toy_labels(), &PermConfig::new(1, 1, 0)).unwrap_err();
    assert!(matches!(err, DscError::InvalidConfig(_)));
}

fn panics_on_third_call(
    calls: &AtomicUsize,
) -> impl Fn(&Matrix, &BatchLabels) -> Result<DscInfo, DscError> + Sync + '_ {
    move |m: &Matrix, l: &BatchLabels| {
        if calls.fetch_add(1, Ordering::SeqCst) == 2 {
            panic!("worker blew up");
        }
        calculate(m, l)
    }
}

#[test]
fn test_best_effort_drops_failed_task() {
    let calls = AtomicUsize::new(0);
    let results = engine(314, 5, 2)
        .perm_dsc_multi_with(&panics_on_third_call(&calls))
        .unwrap();
    assert_eq!(results.len(), 4);
}

#[test]
fn test_strict_reports_failed_task() {
    let calls = AtomicUsize::new(0);
    let config = PermConfig::new(314, 5, 2).with_failure_policy(FailurePolicy::Strict);
    let mut perm = DscPerm::new(toy_matrix(), toy_labels(), &config).unwrap();
    let err = perm
        .perm_dsc_multi_with(&panics_on_third_call(&calls))
        .unwrap_err();
    assert!(matches!(
        err,
        DscError::PermutationFailures {
            failed: 1,
            requested: 5
        }
    ));
}

#[test]
fn test_outcomes_identify_failed_index() {
    let calls = AtomicUsize::new(0);
    let outcomes = engine(314, 5, 1).perm_dsc_outcomes_with(&panics_on_third_call(&calls));
    assert_eq!(outcomes.requested(), 5);
    assert_eq!(outcomes.succeeded(), 4);
    assert!(!outcomes.is_complete());
    let failures = outcomes.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 2);
    assert!(matches!(failures[0].kind, TaskErrorKind::Panicked(_)));

    let clean = engine(314, 5, 2).perm_dsc_outcomes();
    assert!(clean.is_complete());
    assert_eq!(clean.into_results().len(), 5);
}
