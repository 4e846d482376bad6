//! Coordinate-system registry.
//!
//! Purpose
//! - Map a coordinate-system tag to its vector layout and the three factory
//!   operations every enumeration needs: a zero vector, the matching
//!   equations and the embedded constraints.
//!
//! Why this design
//! - The set of systems is closed. Each one is a unit type implementing
//!   `CoordSystem`, so generic code (tableau, search) is monomorphised per
//!   system. Runtime tags go through `for_coords`, a single exhaustive match
//!   that hands a `CoordVisitor` the right type; view-only tags fall back to
//!   a caller-supplied default.
//!
//! Layouts (per tetrahedron `t`)
//! - `Standard`: 4 triangles then 3 quads, `7t..7t+7`.
//! - `Quad`: 3 quads, `3t..3t+3`.
//! - `AnStandard`: 4 triangles, 3 quads, 3 octagons, `10t..10t+10`.
//! - `AnQuadOct`: 3 quads then 3 octagons, `6t..6t+6`.
//! - `Oriented`: 4 triangles then 3 quads, each split as (true, false),
//!   `14t..14t+14`.
//! - `Angle`: 3 angles `3t..3t+3` (angle `k` sits on the two edges that quad
//!   type `k` does not meet), then one trailing scaling column.

mod angle;
mod normal;
pub mod tables;
mod vector;

pub use angle::Angle;
pub use normal::{AnQuadOct, AnStandard, Oriented, Quad, Standard};
pub use tables::{
    vertex_split, vertex_split_meeting, VERTEX_SPLIT, VERTEX_SPLIT_DEFN, VERTEX_SPLIT_MEETING,
};
pub use vector::CoordVector;

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::tri::Triangulation;

/// Coordinate-system tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Coords {
    Standard,
    Quad,
    AnStandard,
    AnQuadOct,
    Oriented,
    Angle,
    /// View-only: edge weights.
    EdgeWeight,
    /// View-only: triangle arc counts.
    TriangleArcs,
    /// View-only: legacy almost normal layout.
    AnLegacy,
}

impl Coords {
    pub const ALL: [Coords; 9] = [
        Coords::Standard,
        Coords::Quad,
        Coords::AnStandard,
        Coords::AnQuadOct,
        Coords::Oriented,
        Coords::Angle,
        Coords::EdgeWeight,
        Coords::TriangleArcs,
        Coords::AnLegacy,
    ];

    /// Short name used on the command line and in serialised output.
    pub fn key(self) -> &'static str {
        match self {
            Coords::Standard => "standard",
            Coords::Quad => "quad",
            Coords::AnStandard => "an-standard",
            Coords::AnQuadOct => "an-quad-oct",
            Coords::Oriented => "oriented",
            Coords::Angle => "angle",
            Coords::EdgeWeight => "edge-weight",
            Coords::TriangleArcs => "triangle-arcs",
            Coords::AnLegacy => "an-legacy",
        }
    }

    /// Human-readable name; view-only tags have no enumeration support.
    pub fn name(self) -> &'static str {
        for_coords(self, NameOf, "Unsupported coordinate system")
    }

    /// Whether the registry can enumerate in this system.
    pub fn is_supported(self) -> bool {
        for_coords(self, Supported, false)
    }

    pub fn is_almost_normal(self) -> bool {
        matches!(self, Coords::AnStandard | Coords::AnQuadOct | Coords::AnLegacy)
    }

    pub fn is_oriented(self) -> bool {
        matches!(self, Coords::Oriented)
    }

    pub fn is_angle(self) -> bool {
        matches!(self, Coords::Angle)
    }

    /// Vector length for a triangulation of `size` tetrahedra.
    pub fn dimension(self, size: usize) -> Option<usize> {
        for_coords(self, Dimension(size), None)
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Coords {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String> {
        Coords::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown coordinate system '{s}'"))
    }
}

/// What a single column of a coordinate vector counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Triangle about `vertex`; `orient` is set in oriented coordinates
    /// (true: oriented towards the vertex).
    Triangle {
        tet: usize,
        vertex: usize,
        orient: Option<bool>,
    },
    /// Quad of type `kind`; `orient` true means oriented towards vertex 0.
    Quad {
        tet: usize,
        kind: usize,
        orient: Option<bool>,
    },
    Octagon { tet: usize, kind: usize },
    /// Dihedral angle on the edge pair of quad type `kind`.
    Angle { tet: usize, kind: usize },
    /// The angle scaling column (represents π).
    Scaling,
}

impl ColumnKind {
    pub fn tet(&self) -> Option<usize> {
        match *self {
            ColumnKind::Triangle { tet, .. }
            | ColumnKind::Quad { tet, .. }
            | ColumnKind::Octagon { tet, .. }
            | ColumnKind::Angle { tet, .. } => Some(tet),
            ColumnKind::Scaling => None,
        }
    }

    /// Quads and octagons: the discs that make a surface non-trivial.
    pub fn is_quad_like(&self) -> bool {
        matches!(self, ColumnKind::Quad { .. } | ColumnKind::Octagon { .. })
    }
}

/// A coordinate system: vector layout plus the factory operations.
pub trait CoordSystem {
    const TAG: Coords;
    const NAME: &'static str;
    /// Columns per tetrahedron.
    const PER_TET: usize;
    /// Columns not tied to any tetrahedron (appended at the end).
    const EXTRA_COLUMNS: usize = 0;
    const ALMOST_NORMAL: bool = false;
    const ORIENTED: bool = false;
    const ANGLE: bool = false;

    #[inline]
    fn dimension(size: usize) -> usize {
        Self::PER_TET * size + Self::EXTRA_COLUMNS
    }

    fn zero_vector(tri: &Triangulation) -> CoordVector {
        CoordVector::zeros(Self::dimension(tri.size()))
    }

    /// One row per matching equation, `dimension` columns.
    fn matching_equations(tri: &Triangulation) -> DMatrix<i64>;

    /// Column groups of which at most one member may be nonzero.
    fn embedded_constraints(tri: &Triangulation) -> Vec<Vec<usize>>;

    /// Meaning of column `column` for a triangulation of `size` tetrahedra.
    fn column_kind(size: usize, column: usize) -> ColumnKind;

    /// Columns that every solution must have strictly positive.
    fn forced_positive(_size: usize) -> Vec<usize> {
        Vec::new()
    }
}

/// Generic operation run against the concrete system behind a tag.
pub trait CoordVisitor {
    type Output;
    fn visit<S: CoordSystem>(self) -> Self::Output;
}

/// Dispatch `visitor` on `coords`; view-only tags return `default`.
pub fn for_coords<V: CoordVisitor>(coords: Coords, visitor: V, default: V::Output) -> V::Output {
    match coords {
        Coords::Standard => visitor.visit::<Standard>(),
        Coords::Quad => visitor.visit::<Quad>(),
        Coords::AnStandard => visitor.visit::<AnStandard>(),
        Coords::AnQuadOct => visitor.visit::<AnQuadOct>(),
        Coords::Oriented => visitor.visit::<Oriented>(),
        Coords::Angle => visitor.visit::<Angle>(),
        Coords::EdgeWeight | Coords::TriangleArcs | Coords::AnLegacy => default,
    }
}

struct NameOf;
impl CoordVisitor for NameOf {
    type Output = &'static str;
    fn visit<S: CoordSystem>(self) -> &'static str {
        S::NAME
    }
}

struct Supported;
impl CoordVisitor for Supported {
    type Output = bool;
    fn visit<S: CoordSystem>(self) -> bool {
        true
    }
}

struct Dimension(usize);
impl CoordVisitor for Dimension {
    type Output = Option<usize>;
    fn visit<S: CoordSystem>(self) -> Option<usize> {
        Some(S::dimension(self.0))
    }
}

struct ZeroVector<'a>(&'a Triangulation);
impl CoordVisitor for ZeroVector<'_> {
    type Output = Option<CoordVector>;
    fn visit<S: CoordSystem>(self) -> Self::Output {
        Some(S::zero_vector(self.0))
    }
}

struct MatchingEquations<'a>(&'a Triangulation);
impl CoordVisitor for MatchingEquations<'_> {
    type Output = Option<DMatrix<i64>>;
    fn visit<S: CoordSystem>(self) -> Self::Output {
        Some(S::matching_equations(self.0))
    }
}

struct EmbeddedConstraints<'a>(&'a Triangulation);
impl CoordVisitor for EmbeddedConstraints<'_> {
    type Output = Option<Vec<Vec<usize>>>;
    fn visit<S: CoordSystem>(self) -> Self::Output {
        Some(S::embedded_constraints(self.0))
    }
}

struct KindOf(usize, usize);
impl CoordVisitor for KindOf {
    type Output = Option<ColumnKind>;
    fn visit<S: CoordSystem>(self) -> Self::Output {
        (self.1 < S::dimension(self.0)).then(|| S::column_kind(self.0, self.1))
    }
}

/// Zero vector of the right length, or `None` for a view-only tag.
pub fn make_zero_vector(tri: &Triangulation, coords: Coords) -> Option<CoordVector> {
    for_coords(coords, ZeroVector(tri), None)
}

/// Matching equations, or `None` for a view-only tag.
pub fn make_matching_equations(tri: &Triangulation, coords: Coords) -> Option<DMatrix<i64>> {
    for_coords(coords, MatchingEquations(tri), None)
}

/// Embedded constraints, or `None` for a view-only tag.
pub fn make_embedded_constraints(tri: &Triangulation, coords: Coords) -> Option<Vec<Vec<usize>>> {
    for_coords(coords, EmbeddedConstraints(tri), None)
}

/// Kind of one column, or `None` out of range / for a view-only tag.
pub fn column_kind(coords: Coords, size: usize, column: usize) -> Option<ColumnKind> {
    for_coords(coords, KindOf(size, column), None)
}

#[cfg(test)]
mod tests;
