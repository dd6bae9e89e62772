//! Batch-effect quantification for omics matrices.
//!
//! The Dispersion Separability Criterion (DSC) is the ratio of
//! between-batch to within-batch dispersion of a feature-by-sample matrix.
//! [`calculate`] computes it once; [`run_permutation_test`] builds its null
//! distribution by shuffling every feature across samples with a seeded
//! generator and recalculating on a fixed-size worker pool.
//!
//! ```no_run
//! use mbatch_dsc::{BatchLabels, Matrix, NullSummary, calculate, run_permutation_test};
//!
//! let matrix = Matrix::from_rows(vec![
//!     vec![1.0, 1.2, 3.1, 3.3],
//!     vec![0.5, 0.4, 0.9, 1.1],
//! ])?;
//! let labels = BatchLabels::from(&["a", "a", "b", "b"][..]);
//! let observed = calculate(&matrix, &labels)?;
//! let null = run_permutation_test(&matrix, &labels, 314, 100, 4)?;
//! println!("{}", NullSummary::from_results(&observed, &null).to_json());
//! # Ok::<(), mbatch_dsc::DscError>(())
//! ```

pub mod config;
pub mod dsc;
pub mod error;
pub mod logging;
pub mod model;
pub mod perm;

#[cfg(test)]
#[path = "../tests/src_inline/fixtures.rs"]
pub(crate) mod fixtures;

pub use config::{FailurePolicy, PermConfig};
pub use dsc::{DscInfo, DscStatistic, Statistic, WriteMode, calculate, epsilon_zero};
pub use error::DscError;
pub use logging::init_tracing;
pub use model::{BatchGroups, BatchLabels, Matrix};
pub use perm::{DscPerm, NullSummary, PermutationOutcomes, TaskError, TaskErrorKind};

/// Runs `permutation_count` permutations on `worker_count` workers and
/// returns the DSC results that succeeded, in submission order.
pub fn run_permutation_test(
    matrix: &Matrix,
    labels: &BatchLabels,
    seed: u64,
    permutation_count: usize,
    worker_count: usize,
) -> Result<Vec<DscInfo>, DscError> {
    let config = PermConfig::new(seed, permutation_count, worker_count);
    run_permutation_test_with(matrix, labels, &config)
}

pub fn run_permutation_test_with(
    matrix: &Matrix,
    labels: &BatchLabels,
    config: &PermConfig,
) -> Result<Vec<DscInfo>, DscError> {
    let mut engine = DscPerm::new(matrix.clone(), labels.clone(), config)?;
    engine.perm_dsc_multi()
}

pub fn run_permutation_outcomes(
    matrix: &Matrix,
    labels: &BatchLabels,
    config: &PermConfig,
) -> Result<PermutationOutcomes, DscError> {
    let mut engine = DscPerm::new(matrix.clone(), labels.clone(), config)?;
    Ok(engine.perm_dsc_outcomes())
}
