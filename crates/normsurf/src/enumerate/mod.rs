//! Tree-traversal enumeration of normal surfaces and angle structures.
//!
//! Purpose
//! - Enumerate the vertex rays of the admissible cone (matching equations,
//!   nonnegativity, embedded constraints, bans and extra linear rows), the
//!   taut angle structures, or the fundamental solutions, and find single
//!   admissible solutions under non-subspace constraints such as positive
//!   Euler characteristic.
//!
//! Why this design
//! - Depth-first search over sign patterns, pruned by an exact LP at each
//!   node (`lp::LpProblem`, `BigRational` throughout). Admissibility is
//!   combinatorial, so the pattern tree enforces it directly and the LP only
//!   answers "is there a nonnegative point with this sign pattern?".
//! - Constraints and bans are traits chosen at compile time (`LpConstraint`,
//!   `BanConstraint`); `LpSubspace` marks constraints whose solution set is
//!   still a cone, which vertex and fundamental enumeration require.
//! - Cancellation is cooperative: the search polls a `ProgressTracker`
//!   every `EnumCfg::poll_interval` nodes and at each top-level branch.
//!
//! Layout
//! - `types.rs` (column permutation, descriptors, bans, slots), `tableau.rs`
//!   (initial tableau), `constraint.rs` and `ban.rs` (the two families),
//!   `tree.rs` (vertex / single / taut search), `fundamental.rs` (Hilbert
//!   basis) and `progress.rs`.

mod ban;
mod constraint;
mod fundamental;
mod progress;
mod tableau;
mod tree;
mod types;

pub use ban::{BanBoundary, BanConstraint, BanNone, BanTorusBoundary};
pub use constraint::{
    euler_functional, ConverterCfg, CuspConverter, EulerPositive, LpConstraint, LpSubspace,
    NoConstraint, NonSpun, StoredSlopes,
};
pub use fundamental::FundamentalEnumeration;
pub use progress::ProgressTracker;
pub use tableau::InitialTableau;
pub use tree::{TautEnumeration, TreeEnumeration, TreeSingleSolution};
pub use types::{BanSet, ColumnDescriptor, ColumnPermutation, Relation, Slot, SlotPolicy};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::Coords;

/// Reasons an enumeration cannot start.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EnumerateError {
    #[error("coordinate system '{0}' cannot be enumerated")]
    UnsupportedCoords(Coords),
    #[error("constraint '{constraint}' does not apply to this triangulation in {coords} coordinates")]
    Inapplicable {
        constraint: &'static str,
        coords: Coords,
    },
    #[error("{mode} enumeration is not available in {coords} coordinates")]
    UnsupportedMode { mode: &'static str, coords: Coords },
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchOutcome {
    Completed,
    /// The tracker was cancelled; results so far are a prefix.
    Cancelled,
    /// The callback asked to stop.
    Stopped,
}

/// Outcome plus counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Tree nodes whose LP was solved.
    pub nodes: usize,
    pub solutions: usize,
}

impl SearchReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == SearchOutcome::Completed
    }
}

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumCfg {
    /// Nodes between cancellation polls.
    pub poll_interval: usize,
}

impl Default for EnumCfg {
    fn default() -> Self {
        Self { poll_interval: 64 }
    }
}

#[cfg(test)]
mod tests;
