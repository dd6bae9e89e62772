use std::time::Instant;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::{FailurePolicy, PermConfig};
use crate::dsc::{DscInfo, DscStatistic, Statistic, calculate};
use crate::error::DscError;
use crate::model::{BatchLabels, Matrix};
use crate::perm::outcome::PermutationOutcomes;
use crate::perm::pool::run_pool;

/// Permutation test over one matrix and its batch labels.
///
/// A single seeded generator drives every permutation, so the sequence of
/// permuted matrices depends only on the seed and on how many have been
/// drawn. Methods taking `&mut self` advance that generator.
#[derive(Debug)]
pub struct DscPerm {
    config: PermConfig,
    rng: ChaCha8Rng,
    matrix: Matrix,
    labels: BatchLabels,
}

impl DscPerm {
    pub fn new(matrix: Matrix, labels: BatchLabels, config: &PermConfig) -> Result<Self, DscError> {
        config.validate()?;
        if matrix.n_samples() != labels.len() {
            return Err(DscError::SampleCountMismatch {
                samples: matrix.n_samples(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            config: config.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            matrix,
            labels,
        })
    }

    pub fn config(&self) -> &PermConfig {
        &self.config
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn labels(&self) -> &BatchLabels {
        &self.labels
    }

    /// Permutes once and calculates DSC against the unpermuted labels.
    pub fn perm_dsc_once(&mut self) -> Result<DscInfo, DscError> {
        let permuted = permuted_rows(&self.matrix, &mut self.rng);
        calculate(&permuted, &self.labels)
    }

    pub fn perm_only(&mut self) {
        let permuted = permuted_rows(&self.matrix, &mut self.rng);
        self.matrix = permuted;
    }

    pub fn perm_dsc_multi(&mut self) -> Result<Vec<DscInfo>, DscError> {
        self.perm_dsc_multi_with(&DscStatistic)
    }

    pub fn perm_dsc_multi_with<S>(&mut self, statistic: &S) -> Result<Vec<DscInfo>, DscError>
    where
        S: Statistic + ?Sized,
    {
        let outcomes = self.perm_dsc_outcomes_with(statistic);
        let requested = outcomes.requested();
        let failed = requested - outcomes.succeeded();
        if failed > 0 {
            for failure in outcomes.failures() {
                tracing::warn!(%failure, "permutation task failed");
            }
            if self.config.failure_policy == FailurePolicy::Strict {
                return Err(DscError::PermutationFailures { failed, requested });
            }
            tracing::warn!(failed, requested, "returning partial permutation results");
        }
        Ok(outcomes.into_results())
    }

    pub fn perm_dsc_outcomes(&mut self) -> PermutationOutcomes {
        self.perm_dsc_outcomes_with(&DscStatistic)
    }

    pub fn perm_dsc_outcomes_with<S>(&mut self, statistic: &S) -> PermutationOutcomes
    where
        S: Statistic + ?Sized,
    {
        let t0 = Instant::now();
        let n_tasks = self.config.permutations;
        tracing::info!(
            seed = self.config.seed,
            permutations = n_tasks,
            workers = self.config.workers,
            n_features = self.matrix.n_features(),
            n_samples = self.matrix.n_samples(),
            "starting DSC permutations"
        );

        let matrix = &self.matrix;
        let rng = &mut self.rng;
        let outcomes = run_pool(self.config.workers, n_tasks, &self.labels, statistic, || {
            permuted_rows(matrix, rng)
        });
        let outcomes = PermutationOutcomes::new(outcomes);

        tracing::info!(
            succeeded = outcomes.succeeded(),
            requested = outcomes.requested(),
            elapsed_s = t0.elapsed().as_secs_f64(),
            "finished DSC permutations"
        );
        outcomes
    }
}

/// Copy of `matrix` with each row shuffled independently, rows in order.
pub fn permuted_rows(matrix: &Matrix, rng: &mut ChaCha8Rng) -> Matrix {
    let mut out = matrix.clone();
    for feature in 0..out.n_features() {
        out.row_mut(feature).shuffle(rng);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/perm/engine.rs"]
mod tests;
