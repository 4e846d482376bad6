//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for project-internal
//!   code (the CLI, benches, experiments). Breaking changes are allowed.
//! - Prefer these re-exports for clarity and consistency across callers.

// Triangulations
pub use crate::tri::rand::{random_triangulation, RandomGluingCfg};
pub use crate::tri::special::{by_name as named_triangulation, from_joins};
pub use crate::tri::{GluingTable, Perm4, Skeleton, TriError, Triangulation};
// Coordinate registry
pub use crate::coords::{
    column_kind, make_embedded_constraints, make_matching_equations, make_zero_vector,
    ColumnKind, CoordVector, Coords,
};
// Exact LP
pub use crate::lp::{LpProblem, LpStats};
// Enumeration engines
pub use crate::enumerate::{
    BanBoundary, BanConstraint, BanNone, BanTorusBoundary, ConverterCfg, CuspConverter, EnumCfg,
    EnumerateError, EulerPositive, FundamentalEnumeration, InitialTableau, LpConstraint,
    LpSubspace, NoConstraint, NonSpun, ProgressTracker, SearchOutcome, SearchReport,
    SlotPolicy, StoredSlopes, TautEnumeration, TreeEnumeration, TreeSingleSolution,
};
// Result lists
pub use crate::angles::{AngleStructure, AngleStructureList};
pub use crate::surfaces::{EnumMode, NormalSurface, NormalSurfaceList, Which};
