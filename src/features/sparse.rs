// Sparse term-count vector.

use serde::{Deserialize, Serialize};

/// A vector of `size` dimensions storing only the non-zero entries.
///
/// `indices` is strictly ascending and has the same length as `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub size: usize,
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Build from unordered (index, value) pairs. Zero values are dropped and
    /// duplicate indices are summed.
    pub fn from_pairs(size: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|(i, _)| *i);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            debug_assert!(i < size, "index {i} out of bounds for size {size}");
            match indices.last() {
                Some(&last) if last == i => {
                    if let Some(value) = values.last_mut() {
                        *value += v;
                    }
                }
                _ => {
                    indices.push(i);
                    values.push(v);
                }
            }
        }

        let (indices, values): (Vec<usize>, Vec<f64>) = indices
            .into_iter()
            .zip(values)
            .filter(|(_, v)| *v != 0.0)
            .unzip();

        Self {
            size,
            indices,
            values,
        }
    }

    pub fn empty(size: usize) -> Self {
        Self {
            size,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Sum of all values (the token count for a count vector).
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.size];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}
