//! Linkage matrix data model and validation.
//!
//! A linkage matrix records the merge history of an agglomerative clustering
//! over `n` observations as `n - 1` rows of
//! `(left_cluster_id, right_cluster_id, distance, cluster_size)`. Ids below
//! `n` name original observations; id `n + i` names the cluster formed by
//! row `i`.
//!
//! Validation is limited to the shape of the merge history: every row must
//! reference existing clusters, no cluster may be merged twice, and distances
//! must be finite and non-negative. Monotonic distances are not required.

mod parse;

use std::io::BufRead;
use std::str::FromStr;

use tracing::warn;

use crate::error::{LinkageError, Result};

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single merge step of an agglomerative clustering.
///
/// # Examples
/// ```
/// use linkplot_core::LinkageRow;
///
/// let row = LinkageRow::new(0, 1, 0.5, 2);
/// assert_eq!(row.children(), (0, 1));
/// assert_eq!(row.distance(), 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkageRow {
    left: usize,
    right: usize,
    distance: f64,
    size: usize,
}

impl LinkageRow {
    /// Creates a row merging `left` and `right` at `distance`.
    #[must_use]
    pub const fn new(left: usize, right: usize, distance: f64, size: usize) -> Self {
        Self {
            left,
            right,
            distance,
            size,
        }
    }

    /// Converts raw numeric fields into a typed row.
    ///
    /// `row` is the 0-based index used when reporting errors.
    ///
    /// # Errors
    /// Returns [`LinkageError::InvalidClusterId`] or
    /// [`LinkageError::InvalidSize`] when the id or size columns do not hold
    /// non-negative integers.
    pub fn try_from_fields(row: usize, fields: [f64; 4]) -> Result<Self> {
        let [left, right, distance, size] = fields;
        let left = integral(left).ok_or(LinkageError::InvalidClusterId { row, value: left })?;
        let right = integral(right).ok_or(LinkageError::InvalidClusterId { row, value: right })?;
        let size = integral(size).ok_or(LinkageError::InvalidSize { row, value: size })?;
        Ok(Self::new(left, right, distance, size))
    }

    /// Returns the ids of the merged clusters as `(left, right)`.
    #[must_use]
    pub const fn children(&self) -> (usize, usize) {
        (self.left, self.right)
    }

    /// Returns the id of the left child.
    #[must_use]
    pub const fn left(&self) -> usize {
        self.left
    }

    /// Returns the id of the right child.
    #[must_use]
    pub const fn right(&self) -> usize {
        self.right
    }

    /// Returns the merge distance.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns the cluster size recorded in the input.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

fn integral(value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > MAX_EXACT_INTEGER {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is a non-negative integer below 2^53"
    )]
    let converted = value as usize;
    Some(converted)
}

/// A validated linkage matrix.
///
/// # Examples
/// ```
/// use linkplot_core::LinkageMatrix;
///
/// let matrix: LinkageMatrix = "0 1 1.0 2\n2 3 2.0 3\n".parse().expect("valid linkage");
/// assert_eq!(matrix.observation_count(), 3);
/// assert_eq!(matrix.root(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LinkageMatrix {
    rows: Vec<LinkageRow>,
    sizes: Vec<usize>,
}

impl LinkageMatrix {
    /// Validates `rows` and wraps them in a matrix.
    ///
    /// # Errors
    /// Returns [`LinkageError::Empty`] when `rows` is empty, or the matching
    /// validation error when a row references a cluster that does not exist
    /// yet, reuses a cluster, merges a cluster with itself or carries an
    /// invalid distance.
    pub fn try_from_rows(rows: Vec<LinkageRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(LinkageError::Empty);
        }
        let observations = rows.len() + 1;
        let total = observations + rows.len();
        let mut merged_by: Vec<Option<usize>> = vec![None; total];
        let mut sizes: Vec<usize> = vec![1; total];

        for (row_index, row) in rows.iter().enumerate() {
            let distance = row.distance();
            if !distance.is_finite() || distance < 0.0 {
                return Err(LinkageError::InvalidDistance {
                    row: row_index,
                    distance,
                });
            }
            let (left, right) = row.children();
            if left == right {
                return Err(LinkageError::SelfMerge {
                    row: row_index,
                    id: left,
                });
            }

            let limit = observations + row_index;
            for id in [left, right] {
                let slot = merged_by
                    .get_mut(id)
                    .filter(|_| id < limit)
                    .ok_or(LinkageError::ForwardReference {
                        row: row_index,
                        id,
                        limit,
                    })?;
                if let Some(previous) = *slot {
                    return Err(LinkageError::ClusterReused {
                        row: row_index,
                        id,
                        previous,
                    });
                }
                *slot = Some(row_index);
            }

            let computed = size_of(&sizes, left) + size_of(&sizes, right);
            if row.size() != computed {
                warn!(
                    row = row_index,
                    recorded = row.size(),
                    computed,
                    "cluster size disagrees with merged children"
                );
            }
            if let Some(slot) = sizes.get_mut(limit) {
                *slot = computed;
            }
        }

        Ok(Self { rows, sizes })
    }

    /// Parses and validates a whitespace-delimited linkage table.
    ///
    /// Blank lines and `#` comments are ignored.
    ///
    /// # Errors
    /// Returns [`LinkageError::Read`] when the reader fails, a parse error for
    /// malformed lines, or a validation error from [`Self::try_from_rows`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let rows = parse::read_rows(reader)?;
        Self::try_from_rows(rows)
    }

    /// Returns the rows in merge order.
    #[must_use]
    pub fn rows(&self) -> &[LinkageRow] {
        &self.rows
    }

    /// Returns the row that formed cluster `id`, if `id` names a merge.
    #[must_use]
    pub fn merge(&self, id: usize) -> Option<&LinkageRow> {
        id.checked_sub(self.observation_count())
            .and_then(|index| self.rows.get(index))
    }

    /// Returns the number of original observations (`rows + 1`).
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Returns the id of the cluster containing every observation.
    #[must_use]
    pub fn root(&self) -> usize {
        2 * self.rows.len()
    }

    /// Returns the number of observations under cluster `id`, derived from
    /// the merge history rather than the recorded size column.
    #[must_use]
    pub fn cluster_size(&self, id: usize) -> Option<usize> {
        self.sizes.get(id).copied()
    }

    /// Returns the largest merge distance.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.rows
            .iter()
            .map(LinkageRow::distance)
            .fold(0.0, f64::max)
    }
}

fn size_of(sizes: &[usize], id: usize) -> usize {
    sizes.get(id).copied().unwrap_or(1)
}

impl FromStr for LinkageMatrix {
    type Err = LinkageError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}
