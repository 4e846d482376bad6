//! Angle structure coordinates.
//!
//! Column `3t + k` holds the angle on the two opposite edges of tetrahedron
//! `t` that quad type `k` misses; the final column is the scaling column
//! standing for π. A vector `x` is an angle structure when every angle is
//! nonnegative, the scaling column is positive and the equations below hold.

use nalgebra::DMatrix;

use super::normal::matrix_from_rows;
use super::tables::vertex_split;
use super::{ColumnKind, CoordSystem, Coords};
use crate::tri::Triangulation;

pub struct Angle;

impl CoordSystem for Angle {
    const TAG: Coords = Coords::Angle;
    const NAME: &'static str = "Angle structure";
    const PER_TET: usize = 3;
    const EXTRA_COLUMNS: usize = 1;
    const ANGLE: bool = true;

    /// Per tetrahedron the three angles sum to π; around each internal edge
    /// the angles sum to 2π.
    fn matching_equations(tri: &Triangulation) -> DMatrix<i64> {
        let n = tri.size();
        let cols = Self::dimension(n);
        let scaling = 3 * n;
        let mut rows = Vec::with_capacity(n + tri.edges().len());
        for t in 0..n {
            let mut row = vec![0i64; cols];
            row[3 * t..3 * t + 3].fill(1);
            row[scaling] = -1;
            rows.push(row);
        }
        for edge in tri.edges().iter().filter(|e| !e.boundary) {
            let mut row = vec![0i64; cols];
            for emb in &edge.embeddings {
                row[3 * emb.tet + vertex_split(emb.perm.at(0), emb.perm.at(1))] += 1;
            }
            row[scaling] = -2;
            rows.push(row);
        }
        matrix_from_rows(&rows, cols)
    }

    fn embedded_constraints(_tri: &Triangulation) -> Vec<Vec<usize>> {
        Vec::new()
    }

    fn column_kind(size: usize, column: usize) -> ColumnKind {
        if column >= 3 * size {
            ColumnKind::Scaling
        } else {
            ColumnKind::Angle {
                tet: column / 3,
                kind: column % 3,
            }
        }
    }

    fn forced_positive(size: usize) -> Vec<usize> {
        vec![3 * size]
    }
}
