use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLabels(Vec<String>);

impl BatchLabels {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn groups(&self) -> BatchGroups {
        BatchGroups::from_labels(&self.0)
    }
}

impl From<Vec<String>> for BatchLabels {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<&[&str]> for BatchLabels {
    fn from(value: &[&str]) -> Self {
        Self(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Column indices per distinct batch, labels in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchGroups {
    labels: Vec<String>,
    columns: Vec<Vec<usize>>,
}

impl BatchGroups {
    pub fn from_labels(labels: &[String]) -> Self {
        let mut by_label: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (col, label) in labels.iter().enumerate() {
            by_label.entry(label.as_str()).or_default().push(col);
        }
        let mut out_labels = Vec::with_capacity(by_label.len());
        let mut columns = Vec::with_capacity(by_label.len());
        for (label, cols) in by_label {
            out_labels.push(label.to_string());
            columns.push(cols);
        }
        Self {
            labels: out_labels,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.labels
            .iter()
            .zip(self.columns.iter())
            .map(|(l, c)| (l.as_str(), c.as_slice()))
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.len()).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/batches.rs"]
mod tests;
