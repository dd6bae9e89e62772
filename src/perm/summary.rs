use serde::Serialize;

use crate::dsc::DscInfo;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullSummary {
    pub observed_dsc: f64,
    pub permutations: usize,
    /// Permuted results with a finite overall DSC.
    pub usable: usize,
    /// Usable permuted results with DSC at or above the observed value.
    pub exceed_count: usize,
    pub p_value: f64,
    pub null_mean: f64,
    pub null_sd: f64,
}

impl NullSummary {
    pub fn from_results(observed: &DscInfo, permuted: &[DscInfo]) -> Self {
        let observed_dsc = observed.dsc();
        let null = permuted
            .iter()
            .map(DscInfo::dsc)
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        let usable = null.len();
        let exceed_count = null.iter().filter(|&&v| v >= observed_dsc).count();
        let p_value = if usable == 0 || observed_dsc.is_nan() {
            f64::NAN
        } else {
            exceed_count as f64 / usable as f64
        };
        let (null_mean, null_sd) = mean_sd(&null);
        Self {
            observed_dsc,
            permutations: permuted.len(),
            usable,
            exceed_count,
            p_value,
            null_mean,
            null_sd,
        }
    }

    /// Non-finite values render as `null`.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn mean_sd(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, f64::NAN);
    }
    let ss: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum();
    (mean, (ss / (n - 1.0)).sqrt())
}

#[cfg(test)]
#[path = "../../tests/src_inline/perm/summary.rs"]
mod tests;
