//! Link colouring by merge-distance threshold.
//!
//! Each link is judged by its own distance: links merging strictly below the
//! threshold take a palette slot, all others share the above-threshold
//! colour. A below-threshold link continues the slot of a below-threshold
//! parent and opens a new slot otherwise, so an inversion that climbs back
//! over the threshold splits its subtree. Slots are numbered in left-first
//! traversal order, which is leaf order for monotone hierarchies.

use crate::linkage::LinkageMatrix;

/// Fraction of the tallest merge used by [`ColorThreshold::Default`].
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.7;

/// Selects the distance below which subtrees receive distinct colours.
///
/// # Examples
/// ```
/// use linkplot_core::ColorThreshold;
///
/// assert_eq!(ColorThreshold::Default.resolve(10.0), Some(7.0));
/// assert_eq!(ColorThreshold::Fixed(0.0).resolve(10.0), None);
/// assert_eq!(ColorThreshold::Disabled.resolve(10.0), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ColorThreshold {
    /// Use 70% of the tallest merge distance.
    #[default]
    Default,
    /// Use the given distance. Non-positive values disable colouring.
    Fixed(f64),
    /// Paint every link with the above-threshold colour.
    Disabled,
}

impl ColorThreshold {
    /// Resolves the effective threshold for a hierarchy whose tallest merge
    /// is `max_height`. Returns `None` when colouring is disabled.
    #[must_use]
    pub fn resolve(self, max_height: f64) -> Option<f64> {
        let threshold = match self {
            Self::Default => DEFAULT_THRESHOLD_RATIO * max_height,
            Self::Fixed(value) => value,
            Self::Disabled => return None,
        };
        (threshold.is_finite() && threshold > 0.0).then_some(threshold)
    }
}

/// Colour assigned to a dendrogram link.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LinkColor {
    /// The link merges at or above the colour threshold.
    AboveThreshold,
    /// The link belongs to the `n`-th coloured group.
    Cluster(usize),
}

/// Assigns a [`LinkColor`] to every row of `linkage`, in row order.
pub(super) fn assign_colors(linkage: &LinkageMatrix, threshold: Option<f64>) -> Vec<LinkColor> {
    let mut colors = vec![LinkColor::AboveThreshold; linkage.rows().len()];
    let Some(threshold) = threshold else {
        return colors;
    };

    let observations = linkage.observation_count();
    let mut next_slot = 0;
    let mut stack: Vec<(usize, Option<usize>)> = vec![(linkage.root(), None)];
    while let Some((id, inherited)) = stack.pop() {
        let Some(row) = linkage.merge(id) else {
            continue;
        };
        let slot = (row.distance() < threshold).then(|| {
            inherited.unwrap_or_else(|| {
                let fresh = next_slot;
                next_slot += 1;
                fresh
            })
        });
        if let Some(color) = colors.get_mut(id - observations) {
            *color = slot.map_or(LinkColor::AboveThreshold, LinkColor::Cluster);
        }
        stack.push((row.right(), slot));
        stack.push((row.left(), slot));
    }
    colors
}
