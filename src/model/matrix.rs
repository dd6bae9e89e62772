use crate::error::DscError;

/// Dense feature-by-sample matrix stored row-major.
///
/// Rows are features, columns are samples. `NaN` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n_features: usize,
    n_samples: usize,
    values: Vec<f64>,
}

impl Matrix {
    pub fn new(n_features: usize, n_samples: usize, values: Vec<f64>) -> Result<Self, DscError> {
        let expected = n_features.checked_mul(n_samples);
        if expected != Some(values.len()) {
            return Err(DscError::ShapeMismatch {
                n_features,
                n_samples,
                // an overflowing shape can never be filled
                expected: expected.unwrap_or(usize::MAX),
                found: values.len(),
            });
        }
        Ok(Self {
            n_features,
            n_samples,
            values,
        })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DscError> {
        let n_features = rows.len();
        let n_samples = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some((row, data)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_samples) {
            return Err(DscError::RaggedRows {
                row,
                expected: n_samples,
                found: data.len(),
            });
        }
        let values = rows.into_iter().flatten().collect::<Vec<_>>();
        Ok(Self {
            n_features,
            n_samples,
            values,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, feature: usize, sample: usize) -> f64 {
        self.values[feature * self.n_samples + sample]
    }

    #[inline]
    pub fn row(&self, feature: usize) -> &[f64] {
        let start = feature * self.n_samples;
        &self.values[start..start + self.n_samples]
    }

    #[inline]
    pub fn row_mut(&mut self, feature: usize) -> &mut [f64] {
        let start = feature * self.n_samples;
        &mut self.values[start..start + self.n_samples]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero; a matrix without samples still has rows
        let n_samples = self.n_samples;
        (0..self.n_features).map(move |f| &self.values[f * n_samples..(f + 1) * n_samples])
    }
}

#[inline]
pub fn is_missing(v: f64) -> bool {
    v.is_nan()
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/matrix.rs"]
mod tests;
