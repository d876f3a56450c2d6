//! Dendrogram layout for linkage matrices.
//!
//! Leaves sit on the x-axis at unit spacing in the order produced by a
//! left-first depth-first walk from the root. Each merge is placed at the
//! midpoint of its children's x-positions and at a height equal to its merge
//! distance, and is drawn as a bracket joining the two children:
//!
//! ```text
//!   (xl, h) +-------+ (xr, h)
//!           |       |
//!  (xl, yl) +       + (xr, yr)
//! ```
//!
//! Both walks use an explicit stack, so chained hierarchies with thousands of
//! levels are laid out without recursion.

mod color;

use tracing::{debug, instrument};

use crate::linkage::LinkageMatrix;

pub use self::color::{ColorThreshold, DEFAULT_THRESHOLD_RATIO, LinkColor};

/// A point in layout coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal position. Leaf `k` in drawing order sits at `k + 0.5`.
    pub x: f64,
    /// Vertical position. Leaves sit at `0`, merges at their distance.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The bracket drawn for a single merge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    cluster: usize,
    height: f64,
    left: Point,
    right: Point,
    color: LinkColor,
}

impl Bracket {
    /// Returns the id of the cluster formed by this merge.
    #[must_use]
    pub const fn cluster(&self) -> usize {
        self.cluster
    }

    /// Returns the merge distance.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Returns the attachment point of the left child.
    #[must_use]
    pub const fn left(&self) -> Point {
        self.left
    }

    /// Returns the attachment point of the right child.
    #[must_use]
    pub const fn right(&self) -> Point {
        self.right
    }

    /// Returns the position of the merged cluster.
    #[must_use]
    pub fn apex(&self) -> Point {
        Point::new(f64::midpoint(self.left.x, self.right.x), self.height)
    }

    /// Returns the link colour.
    #[must_use]
    pub const fn color(&self) -> LinkColor {
        self.color
    }

    /// Returns the four vertices of the bracket polyline, left child first.
    #[must_use]
    pub const fn polyline(&self) -> [Point; 4] {
        [
            self.left,
            Point::new(self.left.x, self.height),
            Point::new(self.right.x, self.height),
            self.right,
        ]
    }
}

/// Geometry of a dendrogram ready to be drawn.
///
/// # Examples
/// ```
/// use linkplot_core::{ColorThreshold, DendrogramLayout, LinkageMatrix};
///
/// let matrix: LinkageMatrix = "0 1 1.0 2\n2 3 2.0 3\n".parse().expect("valid linkage");
/// let layout = DendrogramLayout::build(&matrix, ColorThreshold::Default);
/// assert_eq!(layout.leaf_order(), &[2, 0, 1]);
/// assert_eq!(layout.brackets().len(), 2);
/// assert_eq!(layout.max_height(), 2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DendrogramLayout {
    leaf_order: Vec<usize>,
    brackets: Vec<Bracket>,
    max_height: f64,
}

impl DendrogramLayout {
    /// Lays out `linkage`, colouring links according to `threshold`.
    #[must_use]
    #[instrument(
        name = "layout.build",
        level = "debug",
        skip(linkage),
        fields(observations = linkage.observation_count())
    )]
    pub fn build(linkage: &LinkageMatrix, threshold: ColorThreshold) -> Self {
        let leaf_order = leaf_order(linkage);
        let observations = linkage.observation_count();
        let mut positions = vec![Point::new(0.0, 0.0); observations + linkage.rows().len()];
        for (rank, &leaf) in leaf_order.iter().enumerate() {
            if let Some(slot) = positions.get_mut(leaf) {
                *slot = Point::new(Self::leaf_x(rank), 0.0);
            }
        }

        let max_height = linkage.max_distance();
        let colors = color::assign_colors(linkage, threshold.resolve(max_height));
        let mut brackets = Vec::with_capacity(linkage.rows().len());
        for ((index, row), color) in linkage.rows().iter().enumerate().zip(colors) {
            let left = position_of(&positions, row.left());
            let right = position_of(&positions, row.right());
            let bracket = Bracket {
                cluster: observations + index,
                height: row.distance(),
                left,
                right,
                color,
            };
            if let Some(slot) = positions.get_mut(bracket.cluster) {
                *slot = bracket.apex();
            }
            brackets.push(bracket);
        }

        debug!(
            leaves = leaf_order.len(),
            brackets = brackets.len(),
            max_height,
            "dendrogram laid out"
        );
        Self {
            leaf_order,
            brackets,
            max_height,
        }
    }

    /// Returns observation ids in left-to-right drawing order.
    #[must_use]
    pub fn leaf_order(&self) -> &[usize] {
        &self.leaf_order
    }

    /// Returns one bracket per linkage row, in row order.
    #[must_use]
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Returns the number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaf_order.len()
    }

    /// Returns the tallest merge distance.
    #[must_use]
    pub const fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Returns the x-position of the leaf drawn at `rank`.
    #[must_use]
    pub fn leaf_x(rank: usize) -> f64 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "leaf ranks stay far below 2^52"
        )]
        let base = rank as f64;
        base + 0.5
    }

    /// Returns the observation drawn nearest to the x-coordinate `x`.
    #[must_use]
    pub fn leaf_at(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < 0.0 {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "x is finite and non-negative; overflow saturates"
        )]
        let rank = x.floor() as usize;
        self.leaf_order.get(rank).copied()
    }
}

fn position_of(positions: &[Point], id: usize) -> Point {
    positions
        .get(id)
        .copied()
        .unwrap_or(Point::new(0.0, 0.0))
}

fn leaf_order(linkage: &LinkageMatrix) -> Vec<usize> {
    let mut order = Vec::with_capacity(linkage.observation_count());
    let mut stack = vec![linkage.root()];
    while let Some(id) = stack.pop() {
        match linkage.merge(id) {
            Some(row) => {
                stack.push(row.right());
                stack.push(row.left());
            }
            None => order.push(id),
        }
    }
    order
}
