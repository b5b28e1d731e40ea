//! # Peak Tracking
//!
//! Follows the same physical peak through a sequence of curves measured at
//! increasing temperature. Peaks drift by a few samples between curves, new
//! peaks appear and old ones vanish; the tracker assigns every detected peak to
//! a persistent [`PeakId`] and records where it was seen in a sparse
//! [`TrackedMatrix`].
//!
//! ```text
//!            P0    P1    P3    P2
//! row 0     164   237     .   362
//! row 1     166   240   300   365
//! ```
//!
//! Column order follows peak position; identities follow creation order.

mod error;
mod matrix;
mod tracker;

#[cfg(test)]
mod tests;

pub use error::TrackingError;
pub use matrix::{Cell, PeakId, TrackedMatrix};
pub use tracker::PeakTracker;
