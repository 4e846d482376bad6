//! Normal surfaces and angle structures on 3-manifold triangulations.
//!
//! Layout
//! - `tri`: gluing tables, skeleton, a few named triangulations.
//! - `coords`: coordinate systems (matching equations, embedded groups, column kinds).
//! - `lp`: exact rational linear algebra and a phase-one simplex.
//! - `enumerate`: tableaux, constraint/ban families and the tree-traversal engines.
//! - `surfaces`, `angles`: result lists built on top of `enumerate`.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - `api` is the curated surface for callers; `prelude` is the short list.

pub mod angles;
pub mod api;
pub mod coords;
pub mod enumerate;
pub mod lp;
pub mod surfaces;
pub mod tri;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use coords::{CoordVector, Coords};
pub use tri::Triangulation;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::angles::{AngleStructure, AngleStructureList};
    pub use crate::coords::{CoordVector, Coords};
    pub use crate::enumerate::{EnumCfg, EnumerateError, ProgressTracker, SearchOutcome};
    pub use crate::surfaces::{EnumMode, NormalSurface, NormalSurfaceList, Which};
    pub use crate::tri::{special, Triangulation};
}
