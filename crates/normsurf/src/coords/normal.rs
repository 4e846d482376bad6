//! Normal and almost normal surface coordinate systems.

use nalgebra::DMatrix;

use super::tables::vertex_split;
use super::{ColumnKind, CoordSystem, Coords};
use crate::tri::{FaceEmbedding, Triangulation};

/// Dense matrix from equal-length rows; `cols` fixes the width when empty.
pub(crate) fn matrix_from_rows(rows: &[Vec<i64>], cols: usize) -> DMatrix<i64> {
    DMatrix::from_fn(rows.len(), cols, |r, c| rows[r][c])
}

/// Both sides of every internal triangle.
fn internal_triangles(tri: &Triangulation) -> impl Iterator<Item = (FaceEmbedding, FaceEmbedding)> + '_ {
    tri.triangles()
        .iter()
        .filter(|t| !t.is_boundary())
        .map(|t| (t.embeddings[0], t.embeddings[1]))
}

fn per_tet_groups(size: usize, stride: usize, offset: usize, width: usize) -> Vec<Vec<usize>> {
    (0..size)
        .map(|t| (0..width).map(|k| stride * t + offset + k).collect())
        .collect()
}

/// Standard normal coordinates: 4 triangles and 3 quads per tetrahedron.
pub struct Standard;

impl CoordSystem for Standard {
    const TAG: Coords = Coords::Standard;
    const NAME: &'static str = "Standard normal (tri-quad)";
    const PER_TET: usize = 7;

    fn matching_equations(tri: &Triangulation) -> DMatrix<i64> {
        let cols = Self::dimension(tri.size());
        let mut rows = Vec::new();
        for (a, b) in internal_triangles(tri) {
            for i in 0..3 {
                let mut row = vec![0i64; cols];
                for (emb, sign) in [(a, 1), (b, -1)] {
                    let (t, p) = (emb.tet, emb.perm);
                    row[7 * t + p.at(i)] += sign;
                    row[7 * t + 4 + vertex_split(p.at(i), p.at(3))] += sign;
                }
                rows.push(row);
            }
        }
        matrix_from_rows(&rows, cols)
    }

    fn embedded_constraints(tri: &Triangulation) -> Vec<Vec<usize>> {
        per_tet_groups(tri.size(), 7, 4, 3)
    }

    fn column_kind(_size: usize, column: usize) -> ColumnKind {
        let (tet, k) = (column / 7, column % 7);
        if k < 4 {
            ColumnKind::Triangle {
                tet,
                vertex: k,
                orient: None,
            }
        } else {
            ColumnKind::Quad {
                tet,
                kind: k - 4,
                orient: None,
            }
        }
    }
}

/// Quadrilateral coordinates: 3 quads per tetrahedron, one equation per
/// internal edge.
pub struct Quad;

impl CoordSystem for Quad {
    const TAG: Coords = Coords::Quad;
    const NAME: &'static str = "Quad normal";
    const PER_TET: usize = 3;

    fn matching_equations(tri: &Triangulation) -> DMatrix<i64> {
        let cols = Self::dimension(tri.size());
        let mut rows = Vec::new();
        for edge in tri.edges().iter().filter(|e| !e.boundary) {
            let mut row = vec![0i64; cols];
            for emb in &edge.embeddings {
                let (t, p) = (emb.tet, emb.perm);
                row[3 * t + vertex_split(p.at(0), p.at(2))] += 1;
                row[3 * t + vertex_split(p.at(0), p.at(3))] -= 1;
            }
            rows.push(row);
        }
        matrix_from_rows(&rows, cols)
    }

    fn embedded_constraints(tri: &Triangulation) -> Vec<Vec<usize>> {
        per_tet_groups(tri.size(), 3, 0, 3)
    }

    fn column_kind(_size: usize, column: usize) -> ColumnKind {
        ColumnKind::Quad {
            tet: column / 3,
            kind: column % 3,
            orient: None,
        }
    }
}

/// Standard almost normal coordinates: triangles, quads and octagons.
pub struct AnStandard;

impl CoordSystem for AnStandard {
    const TAG: Coords = Coords::AnStandard;
    const NAME: &'static str = "Standard almost normal (tri-quad-oct)";
    const PER_TET: usize = 10;
    const ALMOST_NORMAL: bool = true;

    fn matching_equations(tri: &Triangulation) -> DMatrix<i64> {
        let cols = Self::dimension(tri.size());
        let mut rows = Vec::new();
        for (a, b) in internal_triangles(tri) {
            for i in 0..3 {
                let mut row = vec![0i64; cols];
                for (emb, sign) in [(a, 1), (b, -1)] {
                    let (t, p) = (emb.tet, emb.perm);
                    row[10 * t + p.at(i)] += sign;
                    row[10 * t + 4 + vertex_split(p.at(i), p.at(3))] += sign;
                    // An octagon leaves two arcs about each face vertex.
                    row[10 * t + 7 + vertex_split(p.at((i + 1) % 3), p.at(3))] += sign;
                    row[10 * t + 7 + vertex_split(p.at((i + 2) % 3), p.at(3))] += sign;
                }
                rows.push(row);
            }
        }
        matrix_from_rows(&rows, cols)
    }

    fn embedded_constraints(tri: &Triangulation) -> Vec<Vec<usize>> {
        per_tet_groups(tri.size(), 10, 4, 6)
    }

    fn column_kind(_size: usize, column: usize) -> ColumnKind {
        let (tet, k) = (column / 10, column % 10);
        match k {
            0..=3 => ColumnKind::Triangle {
                tet,
                vertex: k,
                orient: None,
            },
            4..=6 => ColumnKind::Quad {
                tet,
                kind: k - 4,
                orient: None,
            },
            _ => ColumnKind::Octagon { tet, kind: k - 7 },
        }
    }
}

/// Quad-octagon almost normal coordinates.
pub struct AnQuadOct;

impl CoordSystem for AnQuadOct {
    const TAG: Coords = Coords::AnQuadOct;
    const NAME: &'static str = "Quad-oct almost normal";
    const PER_TET: usize = 6;
    const ALMOST_NORMAL: bool = true;

    fn matching_equations(tri: &Triangulation) -> DMatrix<i64> {
        let cols = Self::dimension(tri.size());
        let mut rows = Vec::new();
        for edge in tri.edges().iter().filter(|e| !e.boundary) {
            let mut row = vec![0i64; cols];
            for emb in &edge.embeddings {
                let (t, p) = (emb.tet, emb.perm);
                let up = vertex_split(p.at(0), p.at(2));
                let down = vertex_split(p.at(0), p.at(3));
                row[6 * t + up] += 1;
                row[6 * t + down] -= 1;
                row[6 * t + 3 + down] += 1;
                row[6 * t + 3 + up] -= 1;
            }
            rows.push(row);
        }
        matrix_from_rows(&rows, cols)
    }

    fn embedded_constraints(tri: &Triangulation) -> Vec<Vec<usize>> {
        per_tet_groups(tri.size(), 6, 0, 6)
    }

    fn column_kind(_size: usize, column: usize) -> ColumnKind {
        let (tet, k) = (column / 6, column % 6);
        if k < 3 {
            ColumnKind::Quad {
                tet,
                kind: k,
                orient: None,
            }
        } else {
            ColumnKind::Octagon { tet, kind: k - 3 }
        }
    }
}

/// Transversely oriented standard coordinates.
pub struct Oriented;

impl Oriented {
    #[inline]
    fn triangle(tet: usize, vertex: usize, orient: bool) -> usize {
        14 * tet + 2 * vertex + usize::from(!orient)
    }

    #[inline]
    fn quad(tet: usize, kind: usize, orient: bool) -> usize {
        14 * tet + 8 + 2 * kind + usize::from(!orient)
    }
}

impl CoordSystem for Oriented {
    const TAG: Coords = Coords::Oriented;
    const NAME: &'static str = "Transversely oriented standard normal";
    const PER_TET: usize = 14;
    const ORIENTED: bool = true;

    fn matching_equations(tri: &Triangulation) -> DMatrix<i64> {
        let cols = Self::dimension(tri.size());
        let mut rows = Vec::new();
        for (a, b) in internal_triangles(tri) {
            for i in 0..3 {
                for towards in [true, false] {
                    let mut row = vec![0i64; cols];
                    for (emb, sign) in [(a, 1), (b, -1)] {
                        let (t, p) = (emb.tet, emb.perm);
                        let (v, f) = (p.at(i), p.at(3));
                        row[Self::triangle(t, v, towards)] += sign;
                        // The quad's "true" side is the one holding vertex 0.
                        let quad_true = (v == 0 || f == 0) == towards;
                        row[Self::quad(t, vertex_split(v, f), quad_true)] += sign;
                    }
                    rows.push(row);
                }
            }
        }
        matrix_from_rows(&rows, cols)
    }

    fn embedded_constraints(tri: &Triangulation) -> Vec<Vec<usize>> {
        let mut groups = Vec::with_capacity(12 * tri.size());
        for t in 0..tri.size() {
            for q1 in 0..3 {
                for q2 in (q1 + 1)..3 {
                    for o1 in [true, false] {
                        for o2 in [true, false] {
                            groups.push(vec![Self::quad(t, q1, o1), Self::quad(t, q2, o2)]);
                        }
                    }
                }
            }
        }
        groups
    }

    fn column_kind(_size: usize, column: usize) -> ColumnKind {
        let (tet, k) = (column / 14, column % 14);
        if k < 8 {
            ColumnKind::Triangle {
                tet,
                vertex: k / 2,
                orient: Some(k % 2 == 0),
            }
        } else {
            ColumnKind::Quad {
                tet,
                kind: (k - 8) / 2,
                orient: Some(k % 2 == 0),
            }
        }
    }
}
