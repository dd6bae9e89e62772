use std::time::Instant;

use crate::dsc::info::{DscInfo, epsilon_zero};
use crate::error::DscError;
use crate::model::{BatchLabels, Matrix, is_missing};

/// Dispersion Separability Criterion for `matrix` grouped by `labels`.
///
/// Per feature, within-batch dispersion pools each batch's sample variance
/// weighted by `(n_b - 1) / n` and between-batch dispersion pools the squared
/// distance of each batch mean from the feature mean weighted by `n_b / n`.
/// Feature values are the square roots of those sums; the overall values are
/// the square roots of the sums across features. Missing values are left
/// out of every mean and variance.
pub fn calculate(matrix: &Matrix, labels: &BatchLabels) -> Result<DscInfo, DscError> {
    let n_samples = matrix.n_samples();
    if n_samples != labels.len() {
        return Err(DscError::SampleCountMismatch {
            samples: n_samples,
            labels: labels.len(),
        });
    }
    let t0 = Instant::now();

    let groups = labels.groups();
    let n_features = matrix.n_features();
    let sample_cnt = n_samples as f64;

    let mut dw_total = 0.0f64;
    let mut db_total = 0.0f64;
    let mut feature_dsc = Vec::with_capacity(n_features);
    let mut feature_db = Vec::with_capacity(n_features);
    let mut feature_dw = Vec::with_capacity(n_features);

    let mut batch_values: Vec<f64> = Vec::with_capacity(n_samples);
    for row in matrix.rows() {
        let feature_mean = mean_non_missing(row);
        let mut dw_feature = 0.0f64;
        let mut db_feature = 0.0f64;
        for (_, cols) in groups.iter() {
            batch_values.clear();
            batch_values.extend(cols.iter().map(|&c| row[c]).filter(|v| !is_missing(*v)));
            let batch_mean = mean(&batch_values);
            let batch_variance = sample_variance(&batch_values, batch_mean);
            let batch_size = cols.len() as f64;
            dw_feature += (batch_size - 1.0) / sample_cnt * batch_variance;
            let delta = batch_mean - feature_mean;
            db_feature += batch_size / sample_cnt * delta * delta;
        }
        dw_total += dw_feature;
        db_total += db_feature;

        let dw_feature = epsilon_zero(dw_feature.sqrt());
        let db_feature = db_feature.sqrt();
        feature_dsc.push(feature_ratio(db_feature, dw_feature));
        feature_db.push(db_feature);
        feature_dw.push(dw_feature);
    }

    let dw_total = dw_total.sqrt();
    let mut db_total = db_total.sqrt();
    let mut dsc = if dw_total > 0.0 {
        db_total / dw_total
    } else {
        f64::NAN
    };

    if n_samples < 2 {
        // zero lists are sized by sample count, not feature count
        feature_dsc = vec![0.0; n_samples];
        feature_db = vec![0.0; n_samples];
        dsc = 0.0;
        db_total = 0.0;
    }

    tracing::debug!(
        n_features,
        n_samples,
        n_batches = groups.len(),
        elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
        "dsc calculated"
    );

    Ok(DscInfo::new(
        dsc,
        db_total,
        dw_total,
        feature_dsc,
        feature_db,
        feature_dw,
    ))
}

/// `dw` must already be epsilon-normalized.
fn feature_ratio(db: f64, dw: f64) -> f64 {
    if dw == 0.0 {
        f64::INFINITY
    } else if epsilon_zero(db) == 0.0 {
        0.0
    } else {
        db / dw
    }
}

fn mean_non_missing(values: &[f64]) -> f64 {
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for &v in values {
        if !is_missing(v) {
            sum += v;
            n += 1;
        }
    }
    sum / n as f64
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64], mean: f64) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => 0.0,
        n => {
            let ss: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum();
            ss / (n - 1) as f64
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/dsc/calc.rs"]
mod tests;
