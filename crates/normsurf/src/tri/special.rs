//! Small named triangulations used in tests, benchmarks and the CLI.
//!
//! Purpose
//! - Canonical gluing tables with well-known normal surface and angle
//!   structure counts, so tests can pin exact results.
//!
//! References
//! - Vertex normal surface counts (embedded, standard / quad / almost normal):
//!   lone tetrahedron 7 / 3 / 10, Gieseking 1 / 0 / 1, figure eight 1 / 4 / 1,
//!   one-tetrahedron S³ 3 / 1 / 4, untwisted layered loop C(2) 5 / 3 / 5,
//!   twisted KxI 8 / 6 / 13.

use super::{Perm4, TriError, Triangulation, TriangulationBuilder};

/// A single tetrahedron with all four faces on the boundary.
pub fn lone_tetrahedron() -> Triangulation {
    Triangulation::from_gluings(vec![[None; 4]]).unwrap_or_else(|_| Triangulation::empty())
}

/// Build from a list of `(tet, face, adj, images)` gluings.
pub fn from_joins(
    size: usize,
    joins: &[(usize, usize, usize, [u8; 4])],
) -> Result<Triangulation, TriError> {
    let mut b = TriangulationBuilder::new(size);
    for &(tet, face, adj, images) in joins {
        let perm = Perm4::new(images).ok_or(TriError::BadPermutation(images))?;
        b.join(tet, face, adj, perm)?;
    }
    b.build()
}

fn known(size: usize, joins: &[(usize, usize, usize, [u8; 4])]) -> Triangulation {
    // The tables below are fixed and valid; fall back to empty only to stay total.
    from_joins(size, joins).unwrap_or_else(|_| Triangulation::empty())
}

/// Untwisted layered loop of the given length (length 1 is a two-vertex S³).
pub fn layered_loop(length: usize) -> Triangulation {
    if length == 0 {
        return Triangulation::empty();
    }
    let mut joins = Vec::with_capacity(2 * length);
    for i in 0..length {
        let next = (i + 1) % length;
        joins.push((i, 0, next, [1, 0, 2, 3]));
        joins.push((i, 3, next, [0, 1, 3, 2]));
    }
    known(length, &joins)
}

/// One-tetrahedron, two-vertex triangulation of the 3-sphere.
pub fn one_tet_sphere() -> Triangulation {
    layered_loop(1)
}

/// Two tetrahedra glued along all four faces by the identity.
pub fn two_tet_sphere() -> Triangulation {
    known(
        2,
        &[
            (0, 0, 1, [0, 1, 2, 3]),
            (0, 1, 1, [0, 1, 2, 3]),
            (0, 2, 1, [0, 1, 2, 3]),
            (0, 3, 1, [0, 1, 2, 3]),
        ],
    )
}

/// Ideal two-tetrahedron figure eight knot complement (one torus cusp).
pub fn figure_eight() -> Triangulation {
    known(
        2,
        &[
            (0, 0, 1, [1, 3, 0, 2]),
            (0, 1, 1, [2, 0, 3, 1]),
            (0, 2, 1, [0, 3, 2, 1]),
            (0, 3, 1, [2, 1, 0, 3]),
        ],
    )
}

/// Ideal one-tetrahedron Gieseking manifold (one Klein bottle cusp).
pub fn gieseking() -> Triangulation {
    known(1, &[(0, 0, 0, [1, 2, 0, 3]), (0, 2, 0, [0, 2, 3, 1])])
}

/// One-tetrahedron layered solid torus LST(1,2,3); faces 0 and 3 form a
/// torus boundary.
pub fn lst_123() -> Triangulation {
    known(1, &[(0, 2, 0, [2, 3, 1, 0])])
}

/// Three-tetrahedron non-orientable twisted I-bundle over the Klein bottle.
pub fn twisted_kxi() -> Triangulation {
    known(
        3,
        &[
            (0, 0, 1, [0, 1, 2, 3]),
            (0, 1, 2, [2, 1, 0, 3]),
            (0, 2, 2, [1, 3, 2, 0]),
            (1, 1, 2, [0, 3, 2, 1]),
            (1, 2, 2, [3, 1, 0, 2]),
        ],
    )
}

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 8] = [
    "lone-tet",
    "s3",
    "s3-2",
    "figure-eight",
    "gieseking",
    "lst-123",
    "loop-c2",
    "twisted-kxi",
];

/// Look up a named triangulation.
pub fn by_name(name: &str) -> Option<Triangulation> {
    Some(match name {
        "lone-tet" => lone_tetrahedron(),
        "s3" => one_tet_sphere(),
        "s3-2" => two_tet_sphere(),
        "figure-eight" => figure_eight(),
        "gieseking" => gieseking(),
        "lst-123" => lst_123(),
        "loop-c2" => layered_loop(2),
        "twisted-kxi" => twisted_kxi(),
        "empty" => Triangulation::empty(),
        _ => return None,
    })
}
