//! Column bans: discs that a search must keep at zero.
//!
//! Bans are computed once from the triangulation and expressed per tableau
//! column. Marked columns are not restricted; they only flag solutions that
//! use them (e.g. vertex-linking pieces at a torus boundary).

use crate::coords::{column_kind, ColumnKind, Coords};
use crate::tri::Triangulation;

use super::types::{BanSet, ColumnPermutation};

/// A rule that bans or marks columns.
pub trait BanConstraint {
    const NAME: &'static str;

    /// Flags for every tableau column of `perm`; constraint columns past the
    /// coordinate dimension are never banned.
    fn init(&self, tri: &Triangulation, coords: Coords, perm: &ColumnPermutation) -> BanSet;
}

/// Kind of each tableau column (`None` for constraint columns).
fn kinds(tri: &Triangulation, coords: Coords, perm: &ColumnPermutation) -> Vec<Option<ColumnKind>> {
    (0..perm.len())
        .map(|c| column_kind(coords, tri.size(), perm.original(c)))
        .collect()
}

/// Nothing banned.
#[derive(Clone, Copy, Debug, Default)]
pub struct BanNone;

impl BanConstraint for BanNone {
    const NAME: &'static str = "none";

    fn init(&self, _tri: &Triangulation, _coords: Coords, perm: &ColumnPermutation) -> BanSet {
        BanSet::none(perm.len())
    }
}

/// Bans every disc that meets a boundary triangle.
#[derive(Clone, Copy, Debug, Default)]
pub struct BanBoundary;

impl BanConstraint for BanBoundary {
    const NAME: &'static str = "ban-boundary";

    fn init(&self, tri: &Triangulation, coords: Coords, perm: &ColumnPermutation) -> BanSet {
        let mut set = BanSet::none(perm.len());
        let boundary = |tet: usize, face: usize| tri.adjacent(tet, face).is_none();
        for (c, kind) in kinds(tri, coords, perm).into_iter().enumerate() {
            set.banned[c] = match kind {
                // Every quad and octagon meets all four faces.
                Some(ColumnKind::Quad { tet, .. } | ColumnKind::Octagon { tet, .. }) => {
                    (0..4).any(|f| boundary(tet, f))
                }
                Some(ColumnKind::Triangle { tet, vertex, .. }) => {
                    (0..4).any(|f| f != vertex && boundary(tet, f))
                }
                _ => false,
            };
        }
        set
    }
}

/// Bans discs meeting a real torus boundary component and marks the
/// triangles around its vertices. Other boundary components are untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct BanTorusBoundary;

impl BanConstraint for BanTorusBoundary {
    const NAME: &'static str = "ban-torus-boundary";

    fn init(&self, tri: &Triangulation, coords: Coords, perm: &ColumnPermutation) -> BanSet {
        let mut set = BanSet::none(perm.len());
        let mut ban_triangle = vec![false; tri.triangles().len()];
        let mut mark_vertex = vec![false; tri.vertices().len()];
        for bc in tri.boundary_components() {
            if bc.ideal || !bc.orientable || bc.euler != 0 {
                continue;
            }
            for &t in &bc.triangles {
                ban_triangle[t] = true;
            }
            for &v in &bc.vertices {
                mark_vertex[v] = true;
            }
        }
        let banned_face = |tet: usize, face: usize| ban_triangle[tri.triangle_of(tet, face)];
        for (c, kind) in kinds(tri, coords, perm).into_iter().enumerate() {
            match kind {
                Some(ColumnKind::Quad { tet, .. } | ColumnKind::Octagon { tet, .. }) => {
                    set.banned[c] = (0..4).any(|f| banned_face(tet, f));
                }
                Some(ColumnKind::Triangle { tet, vertex, .. }) => {
                    set.marked[c] = mark_vertex[tri.vertex_of(tet, vertex)];
                    set.banned[c] = (0..4).any(|f| f != vertex && banned_face(tet, f));
                }
                _ => {}
            }
        }
        set
    }
}
