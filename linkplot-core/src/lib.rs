//! Linkage matrix parsing and dendrogram layout.
//!
//! [`LinkageMatrix`] reads and validates the merge history produced by an
//! agglomerative clustering, and [`DendrogramLayout`] turns it into the
//! bracket geometry of a dendrogram with leaves along the bottom and merges
//! growing upward.

mod error;
mod layout;
mod linkage;

pub use crate::{
    error::{LinkageError, LinkageErrorCode, Result},
    layout::{
        Bracket, ColorThreshold, DEFAULT_THRESHOLD_RATIO, DendrogramLayout, LinkColor, Point,
    },
    linkage::{LinkageMatrix, LinkageRow},
};
