use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 1-based position of the pair (row, col), with col <= row, when the lower triangle
/// (diagonal included) is enumerated row by row.
#[inline(always)]
pub const fn packed_index(row: usize, col: usize) -> usize {
    1 + col + row * (row + 1) / 2
}

/// Inverse of [`packed_index`]. Returns (row, col) with col <= row.
pub fn unpack_index(packed: usize) -> (usize, usize) {
    assert!(packed > 0, "packed indices start at 1");
    let k = packed - 1;

    // row is the largest r with r(r+1)/2 <= k; correct the float estimate on both sides
    let mut row = (((8 * k + 1) as f64).sqrt() as usize).saturating_sub(1) / 2;
    while row * (row + 1) / 2 > k {
        row -= 1;
    }
    while (row + 1) * (row + 2) / 2 <= k {
        row += 1;
    }

    (row, k - row * (row + 1) / 2)
}

/// Number of unique entries in the lower triangle of an n x n symmetric matrix.
#[inline(always)]
pub const fn n_unique(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Non-negligible overlap integrals, stored by increasing packed index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSparseOverlap")]
pub struct SparseOverlap {
    indices: Vec<usize>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSparseOverlap {
    indices: Vec<usize>,
    values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSparseOverlap {
    #[error("{indices} packed indices but {values} values")]
    LengthMismatch { indices: usize, values: usize },
    #[error("packed indices start at 1")]
    ZeroIndex,
    #[error("packed index {index} does not follow {previous}")]
    Unordered { previous: usize, index: usize },
}

impl TryFrom<RawSparseOverlap> for SparseOverlap {
    type Error = InvalidSparseOverlap;

    fn try_from(raw: RawSparseOverlap) -> Result<Self, Self::Error> {
        let RawSparseOverlap { indices, values } = raw;

        if indices.len() != values.len() {
            return Err(InvalidSparseOverlap::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        if indices.first() == Some(&0) {
            return Err(InvalidSparseOverlap::ZeroIndex);
        }
        if let Some(pair) = indices.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(InvalidSparseOverlap::Unordered {
                previous: pair[0],
                index: pair[1],
            });
        }

        Ok(Self { indices, values })
    }
}

impl SparseOverlap {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry. Entries must arrive in increasing packed index order.
    pub(crate) fn push(&mut self, row: usize, col: usize, value: f64) {
        let index = packed_index(row, col);
        debug_assert!(
            self.indices.last().map_or(true, |&last| last < index),
            "sparse overlap entries must be pushed in packed order"
        );

        self.indices.push(index);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn packed_indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over the stored entries as (row, col, value), col <= row
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(&index, &value)| {
                let (row, col) = unpack_index(index);
                (row, col, value)
            })
    }

    /// Rebuild the dense, symmetric overlap matrix of the first `n` functions. Entries
    /// missing from the store are zero.
    pub fn to_dense(&self, n: usize) -> DMatrix<f64> {
        let mut matrix = DMatrix::zeros(n, n);

        let mut position = 0;
        for row in 0..n {
            for col in 0..=row {
                if position == self.indices.len() {
                    return matrix;
                }

                if self.indices[position] == packed_index(row, col) {
                    matrix[(row, col)] = self.values[position];
                    matrix[(col, row)] = self.values[position];
                    position += 1;
                }
            }
        }

        matrix
    }
}
