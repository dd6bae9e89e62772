use std::fmt;

use serde::Serialize;

/// Magnitudes at or below this are reported as exactly zero.
pub const EPSILON_ZERO: f64 = 1e-7;

#[inline]
pub fn epsilon_zero(v: f64) -> f64 {
    if !v.is_nan() && v.abs() <= EPSILON_ZERO {
        0.0
    } else {
        v
    }
}

/// Values are epsilon-normalized on construction and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DscInfo {
    dsc: f64,
    db: f64,
    dw: f64,
    feature_dsc: Vec<f64>,
    feature_db: Vec<f64>,
    feature_dw: Vec<f64>,
}

impl DscInfo {
    pub fn new(
        dsc: f64,
        db: f64,
        dw: f64,
        feature_dsc: Vec<f64>,
        feature_db: Vec<f64>,
        feature_dw: Vec<f64>,
    ) -> Self {
        let mut info = Self {
            dsc,
            db,
            dw,
            feature_dsc,
            feature_db,
            feature_dw,
        };
        info.normalize();
        info
    }

    fn normalize(&mut self) {
        self.dsc = epsilon_zero(self.dsc);
        self.db = epsilon_zero(self.db);
        self.dw = epsilon_zero(self.dw);
        for list in [
            &mut self.feature_dsc,
            &mut self.feature_db,
            &mut self.feature_dw,
        ] {
            for v in list.iter_mut() {
                *v = epsilon_zero(*v);
            }
        }
    }

    pub fn dsc(&self) -> f64 {
        self.dsc
    }

    pub fn db(&self) -> f64 {
        self.db
    }

    pub fn dw(&self) -> f64 {
        self.dw
    }

    pub fn feature_dsc(&self) -> &[f64] {
        &self.feature_dsc
    }

    pub fn feature_db(&self) -> &[f64] {
        &self.feature_db
    }

    pub fn feature_dw(&self) -> &[f64] {
        &self.feature_dw
    }
}

impl fmt::Display for DscInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dsc = {}", self.dsc)?;
        writeln!(f, "db = {}", self.db)?;
        writeln!(f, "dw = {}", self.dw)?;
        writeln!(f, "feature_dsc = {:?}", head3(&self.feature_dsc))?;
        writeln!(f, "feature_db = {:?}", head3(&self.feature_db))?;
        write!(f, "feature_dw = {:?}", head3(&self.feature_dw))
    }
}

fn head3(values: &[f64]) -> &[f64] {
    &values[..values.len().min(3)]
}

#[cfg(test)]
#[path = "../../tests/src_inline/dsc/info.rs"]
mod tests;
