use super::*;
use crate::tri::rand::{random_triangulation, RandomGluingCfg};
use crate::tri::special;
use proptest::prelude::*;

const NORMAL: [Coords; 5] = [
    Coords::Standard,
    Coords::Quad,
    Coords::AnStandard,
    Coords::AnQuadOct,
    Coords::Oriented,
];

fn satisfies(m: &DMatrix<i64>, v: &CoordVector) -> bool {
    (0..m.nrows()).all(|r| v.dot_i64(m.row(r).iter()) == 0.into())
}

/// Standard-coordinate vertex link of vertex `v`: one triangle per corner.
fn vertex_link(tri: &Triangulation, v: usize, per_tet: usize, oriented: bool) -> CoordVector {
    let mut x = vec![0i64; per_tet * tri.size()];
    for &(t, c) in &tri.vertices()[v].corners {
        let col = if oriented { per_tet * t + 2 * c } else { per_tet * t + c };
        x[col] += 1;
    }
    CoordVector::from_i64(&x)
}

#[test]
fn tables_are_consistent() {
    for i in 0..4 {
        for j in 0..4 {
            assert_eq!(VERTEX_SPLIT[i][j], VERTEX_SPLIT[j][i]);
            if i == j {
                continue;
            }
            let split = vertex_split(i, j);
            let meet = vertex_split_meeting(i, j);
            assert!(!meet.contains(&split));
            assert_ne!(meet[0], meet[1]);
        }
    }
    for (k, d) in VERTEX_SPLIT_DEFN.iter().enumerate() {
        assert_eq!(vertex_split(d[0], d[1]), k);
        assert_eq!(vertex_split(d[2], d[3]), k);
    }
}

#[test]
fn tags_parse_and_dispatch() {
    for c in Coords::ALL {
        assert_eq!(c.key().parse::<Coords>().unwrap(), c);
    }
    assert!("bogus".parse::<Coords>().is_err());
    let tri = special::figure_eight();
    for c in [Coords::EdgeWeight, Coords::TriangleArcs, Coords::AnLegacy] {
        assert!(!c.is_supported());
        assert!(make_zero_vector(&tri, c).is_none());
        assert!(make_matching_equations(&tri, c).is_none());
        assert!(make_embedded_constraints(&tri, c).is_none());
    }
    assert_eq!(Coords::Standard.dimension(2), Some(14));
    assert_eq!(Coords::Angle.dimension(2), Some(7));
    assert_eq!(Coords::Oriented.name(), Oriented::NAME);
    assert!(Coords::AnQuadOct.is_almost_normal() && AnQuadOct::ALMOST_NORMAL);
}

#[test]
fn empty_triangulation_vectors() {
    let tri = Triangulation::empty();
    for c in NORMAL {
        assert!(make_zero_vector(&tri, c).unwrap().is_empty());
        assert_eq!(make_matching_equations(&tri, c).unwrap().nrows(), 0);
    }
    let angle = make_zero_vector(&tri, Coords::Angle).unwrap();
    assert_eq!(angle.len(), 1);
    assert!(angle.is_zero());
}

#[test]
fn one_tet_sphere_standard_equations() {
    let tri = special::one_tet_sphere();
    let m = Standard::matching_equations(&tri);
    assert_eq!(m.shape(), (6, 7));
    for v in [
        [1, 1, 0, 0, 0, 0, 0],
        [0, 0, 1, 1, 0, 0, 0],
        [0, 0, 0, 0, 1, 0, 0],
    ] {
        assert!(satisfies(&m, &CoordVector::from_i64(&v)), "{v:?}");
    }
    assert!(!satisfies(&m, &CoordVector::from_i64(&[1, 0, 0, 0, 0, 0, 0])));
    assert!(!satisfies(&m, &CoordVector::from_i64(&[0, 0, 0, 0, 0, 1, 0])));
    let q = Quad::matching_equations(&tri);
    assert!(satisfies(&q, &CoordVector::from_i64(&[1, 0, 0])));
    assert!(!satisfies(&q, &CoordVector::from_i64(&[0, 1, 0])));
}

#[test]
fn angle_equations_on_gieseking() {
    let tri = special::gieseking();
    let m = Angle::matching_equations(&tri);
    // One tetrahedron row and one edge row.
    assert_eq!(m.shape(), (2, 4));
    for taut in [[1, 0, 0, 1], [0, 1, 0, 1], [0, 0, 1, 1]] {
        assert!(satisfies(&m, &CoordVector::from_i64(&taut)));
    }
    assert!(!satisfies(&m, &CoordVector::from_i64(&[1, 1, 0, 1])));
    assert_eq!(Angle::forced_positive(1), vec![3]);
    assert_eq!(Angle::column_kind(1, 3), ColumnKind::Scaling);
}

#[test]
fn embedded_constraint_shapes() {
    let tri = special::figure_eight();
    assert_eq!(Standard::embedded_constraints(&tri), vec![vec![4, 5, 6], vec![11, 12, 13]]);
    assert_eq!(AnStandard::embedded_constraints(&tri)[1], vec![14, 15, 16, 17, 18, 19]);
    let oriented = Oriented::embedded_constraints(&tri);
    assert_eq!(oriented.len(), 24);
    assert!(oriented.iter().all(|g| g.len() == 2));
    assert!(Angle::embedded_constraints(&tri).is_empty());
}

#[test]
fn column_kinds_cover_each_tetrahedron() {
    let n = 2;
    for (c, quad_like) in [
        (Coords::Standard, 3),
        (Coords::Quad, 3),
        (Coords::AnStandard, 6),
        (Coords::AnQuadOct, 6),
        (Coords::Oriented, 6),
        (Coords::Angle, 0),
    ] {
        let dim = c.dimension(n).unwrap();
        let kinds: Vec<ColumnKind> = (0..dim).map(|i| column_kind(c, n, i).unwrap()).collect();
        for t in 0..n {
            let count = kinds
                .iter()
                .filter(|k| k.tet() == Some(t) && k.is_quad_like())
                .count();
            assert_eq!(count, quad_like, "{c}");
        }
        assert!(column_kind(c, n, dim).is_none());
    }
    assert_eq!(
        Oriented::column_kind(1, 9),
        ColumnKind::Quad {
            tet: 0,
            kind: 0,
            orient: Some(false)
        }
    );
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]

    #[test]
    fn normal_rows_balance(size in 1usize..4, bdry in 0usize..3, seed in any::<u64>()) {
        let tri = random_triangulation(RandomGluingCfg { size, boundary_faces: bdry, connected: false }, seed);
        for c in NORMAL {
            let m = make_matching_equations(&tri, c).unwrap();
            prop_assert_eq!(m.ncols(), c.dimension(size).unwrap());
            for r in 0..m.nrows() {
                prop_assert_eq!(m.row(r).iter().sum::<i64>(), 0);
            }
        }
    }

    #[test]
    fn vertex_links_satisfy_standard_like_equations(size in 1usize..4, seed in any::<u64>()) {
        let tri = random_triangulation(RandomGluingCfg { size, boundary_faces: 0, connected: false }, seed);
        let std_m = Standard::matching_equations(&tri);
        let an_m = AnStandard::matching_equations(&tri);
        let or_m = Oriented::matching_equations(&tri);
        for v in 0..tri.vertices().len() {
            prop_assert!(satisfies(&std_m, &vertex_link(&tri, v, 7, false)));
            prop_assert!(satisfies(&an_m, &vertex_link(&tri, v, 10, false)));
            prop_assert!(satisfies(&or_m, &vertex_link(&tri, v, 14, true)));
        }
    }
}
