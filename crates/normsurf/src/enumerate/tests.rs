use super::*;
use crate::coords::{column_kind, make_matching_equations, CoordVector, Coords};
use crate::tri::rand::{random_triangulation, RandomGluingCfg};
use crate::tri::special::{self, from_joins};
use crate::tri::Triangulation;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;
use proptest::prelude::*;

fn vertices(tri: &Triangulation, coords: Coords) -> Vec<CoordVector> {
    let search = TreeEnumeration::new(tri, coords, true, &NoConstraint, &BanNone).unwrap();
    let (out, report) = search.collect(None);
    assert!(report.is_complete());
    out
}

fn vecs(rows: &[&[i64]]) -> Vec<CoordVector> {
    rows.iter().map(|r| CoordVector::from_i64(r)).collect()
}

fn sorted(mut v: Vec<CoordVector>) -> Vec<Vec<i64>> {
    let mut out: Vec<Vec<i64>> = v.drain(..).map(|x| x.to_i64().unwrap()).collect();
    out.sort();
    out
}

/// Lone tetrahedron with one LST(1,2,3) next to it: a torus and a sphere
/// boundary component.
fn lst_and_lone() -> Triangulation {
    from_joins(2, &[(0, 2, 0, [2, 3, 1, 0])]).unwrap()
}

fn fig8_slopes() -> StoredSlopes {
    StoredSlopes {
        triangulation: special::figure_eight(),
        meridian: vec![2, 0, 0, 0, -1, 0],
        longitude: vec![0, 0, 0, 0, 0, 1],
    }
}

#[test]
fn layout_permutation_puts_quads_first() {
    let kinds: Vec<_> = (0..7)
        .map(|c| crate::coords::column_kind(Coords::Standard, 1, c).unwrap())
        .collect();
    let p = ColumnPermutation::for_layout(&kinds, 1);
    assert_eq!(p.as_slice(), &[4, 5, 6, 0, 1, 2, 3, 7]);
    assert_eq!(p.tableau(0), 3);
    let v: Vec<usize> = (10..18).collect();
    assert_eq!(p.unapply(&p.apply(&v)), v);
    assert!(ColumnPermutation::from_order(vec![0, 0, 1]).is_none());
    assert!(ColumnPermutation::from_order(vec![2, 0, 1]).is_some());
    assert_eq!(ColumnPermutation::identity(3).as_slice(), &[0, 1, 2]);
}

#[test]
fn tableau_drops_dependent_rows() {
    let tri = special::one_tet_sphere();
    let tab = InitialTableau::new(&tri, Coords::Standard, &NoConstraint, &BanNone).unwrap();
    let m = make_matching_equations(&tri, Coords::Standard).unwrap();
    assert_eq!(tab.rank(), crate::lp::rank(&m));
    assert_eq!(tab.rows().len(), tab.rank());
    assert_eq!(tab.width(), 7);
    assert_eq!(tab.quad_like(), vec![0, 1, 2]);
    // One slot per quad triple, then one per triangle.
    let slots = tab.slots(SlotPolicy::Embedded);
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0].columns, vec![0, 1, 2]);
    assert_eq!(slots[0].patterns, vec![vec![], vec![0], vec![1], vec![2]]);
    assert_eq!(slots[1].patterns, vec![vec![], vec![3]]);
    let err = InitialTableau::new(&tri, Coords::EdgeWeight, &NoConstraint, &BanNone).unwrap_err();
    assert_eq!(err, EnumerateError::UnsupportedCoords(Coords::EdgeWeight));
}

#[test]
fn reference_vertex_counts() {
    let cases = [
        ("lone-tet", special::lone_tetrahedron(), [7, 3, 10, 6]),
        ("gieseking", special::gieseking(), [1, 0, 1, 0]),
        ("figure-eight", special::figure_eight(), [1, 4, 1, 14]),
        ("s3", special::one_tet_sphere(), [3, 1, 4, 2]),
        ("s3-2", special::two_tet_sphere(), [7, 3, 7, 3]),
        ("loop-c2", special::layered_loop(2), [5, 3, 5, 3]),
        ("lst-123", special::lst_123(), [4, 3, 7, 6]),
    ];
    for (name, tri, expected) in cases {
        let got: Vec<usize> = [
            Coords::Standard,
            Coords::Quad,
            Coords::AnStandard,
            Coords::AnQuadOct,
        ]
        .into_iter()
        .map(|c| vertices(&tri, c).len())
        .collect();
        assert_eq!(got, expected, "{name}");
    }
}

#[test]
fn twisted_kxi_counts() {
    let tri = special::twisted_kxi();
    assert_eq!(vertices(&tri, Coords::Standard).len(), 8);
    assert_eq!(vertices(&tri, Coords::Quad).len(), 6);
    assert_eq!(vertices(&tri, Coords::AnStandard).len(), 13);
}

#[test]
fn one_tet_sphere_vertex_surfaces() {
    let tri = special::one_tet_sphere();
    assert_eq!(
        vertices(&tri, Coords::Standard),
        vecs(&[
            &[0, 0, 1, 1, 0, 0, 0],
            &[1, 1, 0, 0, 0, 0, 0],
            &[0, 0, 0, 0, 1, 0, 0],
        ])
    );
    assert_eq!(vertices(&tri, Coords::Quad), vecs(&[&[1, 0, 0]]));
    // The extra almost normal vertex is a single octagon.
    let an = vertices(&tri, Coords::AnStandard);
    assert_eq!(an.len(), 4);
    assert_eq!(an[3], CoordVector::from_i64(&[0, 0, 0, 0, 0, 0, 0, 1, 0, 0]));
}

#[test]
fn figure_eight_quad_vertices() {
    let tri = special::figure_eight();
    assert_eq!(
        vertices(&tri, Coords::Quad),
        vecs(&[
            &[1, 0, 0, 0, 2, 0],
            &[1, 0, 0, 0, 0, 2],
            &[0, 2, 0, 1, 0, 0],
            &[0, 0, 2, 1, 0, 0],
        ])
    );
    assert_eq!(
        vertices(&special::gieseking(), Coords::Standard),
        vecs(&[&[1, 1, 1, 1, 0, 0, 0]])
    );
}

#[test]
fn oriented_and_immersed_counts() {
    assert_eq!(vertices(&special::one_tet_sphere(), Coords::Oriented).len(), 6);
    assert_eq!(vertices(&special::lone_tetrahedron(), Coords::Oriented).len(), 14);
    assert_eq!(vertices(&special::gieseking(), Coords::Oriented).len(), 2);

    let immersed = |tri: &Triangulation, coords| {
        TreeEnumeration::new(tri, coords, false, &NoConstraint, &BanNone)
            .unwrap()
            .collect(None)
            .0
            .len()
    };
    assert_eq!(immersed(&special::one_tet_sphere(), Coords::Standard), 4);
    assert_eq!(immersed(&special::figure_eight(), Coords::Quad), 8);
}

#[test]
fn angle_structure_vertices_and_taut() {
    let gieseking = special::gieseking();
    assert_eq!(
        sorted(vertices(&gieseking, Coords::Angle)),
        vec![vec![0, 0, 1, 1], vec![0, 1, 0, 1], vec![1, 0, 0, 1]]
    );
    assert_eq!(vertices(&special::figure_eight(), Coords::Angle).len(), 5);

    let taut = TautEnumeration::new(&gieseking).unwrap().collect(None).0;
    assert_eq!(taut, vecs(&[&[1, 0, 0, 1], &[0, 1, 0, 1], &[0, 0, 1, 1]]));

    let fig8 = special::figure_eight();
    let taut = TautEnumeration::new(&fig8).unwrap().collect(None).0;
    assert_eq!(
        taut,
        vecs(&[
            &[1, 0, 0, 1, 0, 0, 1],
            &[0, 1, 0, 0, 0, 1, 1],
            &[0, 0, 1, 0, 1, 0, 1],
        ])
    );
    // Every angle is 0 or π, one π per tetrahedron.
    for v in &taut {
        let s = &v[6];
        for t in 0..2 {
            let pis = (0..3).filter(|k| &v[3 * t + k] == s).count();
            let zeros = (0..3).filter(|k| v[3 * t + k].is_zero()).count();
            assert_eq!((pis, zeros), (1, 2));
        }
    }
    assert_eq!(TautEnumeration::new(&special::lone_tetrahedron()).unwrap().collect(None).0.len(), 3);
}

#[test]
fn empty_triangulation_finds_nothing() {
    let tri = Triangulation::empty();
    for c in [Coords::Standard, Coords::Quad, Coords::Angle] {
        let (out, report) = TreeEnumeration::new(&tri, c, true, &NoConstraint, &BanNone)
            .unwrap()
            .collect(None);
        assert!(out.is_empty());
        assert_eq!(report.outcome, SearchOutcome::Completed);
    }
    assert!(TautEnumeration::new(&tri).unwrap().collect(None).0.is_empty());
}

#[test]
fn euler_functional_counts_vertex_links() {
    let tri = special::lone_tetrahedron();
    let obj = euler_functional(&tri, Coords::Standard).unwrap();
    for v in vertices(&tri, Coords::Standard) {
        assert_eq!(v.dot_i64(&obj), BigInt::from(1));
    }
    let s3 = special::one_tet_sphere();
    let obj = euler_functional(&s3, Coords::Standard).unwrap();
    let chis: Vec<BigInt> = vertices(&s3, Coords::Standard).iter().map(|v| v.dot_i64(&obj)).collect();
    assert_eq!(chis, vec![2.into(), 2.into(), 0.into()]);
    let obj = euler_functional(&s3, Coords::AnStandard).unwrap();
    let chis: Vec<BigInt> = vertices(&s3, Coords::AnStandard).iter().map(|v| v.dot_i64(&obj)).collect();
    assert_eq!(chis, vec![2.into(), 2.into(), 0.into(), 2.into()]);
    assert!(euler_functional(&s3, Coords::Quad).is_none());
    assert_eq!(euler_functional(&s3, Coords::Oriented).unwrap().len(), 14);
}

#[test]
fn single_solution_with_positive_euler() {
    let find = |tri: &Triangulation, coords| {
        let (found, report) = TreeSingleSolution::new(tri, coords, &EulerPositive, &BanNone)
            .unwrap()
            .find(None);
        assert!(report.is_complete());
        found
    };
    assert_eq!(
        find(&special::one_tet_sphere(), Coords::Standard),
        Some(CoordVector::from_i64(&[0, 0, 1, 1, 1, 0, 0]))
    );
    assert_eq!(
        find(&special::lst_123(), Coords::Standard),
        Some(CoordVector::from_i64(&[1, 1, 1, 1, 1, 0, 0]))
    );
    assert_eq!(
        find(&special::lone_tetrahedron(), Coords::AnStandard),
        Some(CoordVector::from_i64(&[0, 0, 0, 0, 1, 0, 0, 0, 0, 0]))
    );
    assert_eq!(find(&special::figure_eight(), Coords::Standard), None);
    assert_eq!(find(&special::gieseking(), Coords::AnStandard), None);

    let err = TreeSingleSolution::new(&special::one_tet_sphere(), Coords::Quad, &EulerPositive, &BanNone)
        .unwrap_err();
    assert_eq!(
        err,
        EnumerateError::Inapplicable {
            constraint: "euler-positive",
            coords: Coords::Quad
        }
    );

    // Without a constraint the first non-vertex-linking solution is a quad.
    let (plain, _) = TreeSingleSolution::new(&special::one_tet_sphere(), Coords::Standard, &NoConstraint, &BanNone)
        .unwrap()
        .find(None);
    assert_eq!(plain, Some(CoordVector::from_i64(&[0, 0, 0, 0, 1, 0, 0])));
}

#[test]
fn euler_constraint_fills_the_extra_column() {
    let tri = special::one_tet_sphere();
    let tab = InitialTableau::new(&tri, Coords::Standard, &EulerPositive, &BanNone).unwrap();
    assert_eq!(tab.width(), 8);
    assert_eq!(tab.relations(), &[Relation::Positive]);
    assert_eq!(tab.forced(), &[7]);
    assert_eq!(tab.columns()[7].extra, vec![-1]);
    let obj = euler_functional(&tri, Coords::Standard).unwrap();
    for (i, col) in tab.columns().iter().take(7).enumerate() {
        assert_eq!(col.extra[0], obj[tab.perm().original(i)]);
    }
}

#[test]
fn fundamental_solutions() {
    let fundamental = |tri: &Triangulation, coords, embedded| {
        let (out, report) = FundamentalEnumeration::new(tri, coords, embedded, &NoConstraint, &BanNone)
            .unwrap()
            .collect(None);
        assert!(report.is_complete());
        out
    };
    let s3 = special::one_tet_sphere();
    assert_eq!(
        sorted(fundamental(&s3, Coords::AnStandard, true)),
        sorted(vertices(&s3, Coords::AnStandard))
    );
    let lst = special::lst_123();
    assert_eq!(
        sorted(fundamental(&lst, Coords::Standard, true)),
        vec![
            vec![0, 0, 0, 0, 1, 0, 0],
            vec![0, 1, 1, 0, 0, 1, 0],
            vec![1, 0, 0, 1, 0, 0, 1],
            vec![1, 1, 1, 1, 0, 0, 0],
        ]
    );
    let fig8 = special::figure_eight();
    assert_eq!(fundamental(&fig8, Coords::Quad, true).len(), 4);
    // Immersed: twelve sums of three quads join the eight vertices.
    let immersed = fundamental(&fig8, Coords::Quad, false);
    assert_eq!(immersed.len(), 20);
    assert!(immersed.contains(&CoordVector::from_i64(&[1, 1, 1, 0, 0, 0])));

    let err = FundamentalEnumeration::new(&fig8, Coords::Angle, true, &NoConstraint, &BanNone).unwrap_err();
    assert!(matches!(err, EnumerateError::UnsupportedMode { .. }));
}

#[test]
fn boundary_bans() {
    let lone = special::lone_tetrahedron();
    let search = TreeEnumeration::new(&lone, Coords::Standard, true, &NoConstraint, &BanBoundary).unwrap();
    assert_eq!(search.tableau().ban().banned_count(), 7);
    assert!(search.collect(None).0.is_empty());

    let mixed = lst_and_lone();
    assert_eq!(vertices(&mixed, Coords::Standard).len(), 11);
    let banned = TreeEnumeration::new(&mixed, Coords::Standard, true, &NoConstraint, &BanBoundary)
        .unwrap()
        .collect(None)
        .0;
    assert!(banned.is_empty());

    // Only the torus side is banned; its triangles are marked.
    let search = TreeEnumeration::new(&mixed, Coords::Standard, true, &NoConstraint, &BanTorusBoundary).unwrap();
    let tab = search.tableau();
    assert_eq!(tab.ban().banned_count(), 7);
    assert_eq!(tab.ban().marked_count(), 4);
    for c in 0..14 {
        let tet = tab.kind(c).and_then(|k| k.tet()).unwrap();
        assert_eq!(tab.ban().is_banned(c), tet == 0, "column {c}");
    }
    let (out, _) = search.collect(None);
    assert_eq!(out.len(), 7);
    assert!(out.iter().all(|v| v.iter().take(7).all(Zero::is_zero)));

    // Angle columns are never banned.
    let angle = TreeEnumeration::new(&lone, Coords::Angle, true, &NoConstraint, &BanBoundary).unwrap();
    assert_eq!(angle.tableau().ban().banned_count(), 0);
}

#[test]
fn non_spun_preconditions() {
    let closed = special::one_tet_sphere();
    let stored = StoredSlopes {
        triangulation: closed.clone(),
        meridian: vec![0; 3],
        longitude: vec![0; 3],
    };
    let err = TreeEnumeration::new(&closed, Coords::Quad, true, &NonSpun::new(&stored), &BanNone).unwrap_err();
    assert_eq!(
        err,
        EnumerateError::Inapplicable {
            constraint: "non-spun",
            coords: Coords::Quad
        }
    );
    // Non-orientable cusp.
    let gieseking = special::gieseking();
    let stored = StoredSlopes {
        triangulation: gieseking.clone(),
        meridian: vec![0; 3],
        longitude: vec![0; 3],
    };
    assert!(TreeEnumeration::new(&gieseking, Coords::Quad, true, &NonSpun::new(stored), &BanNone).is_err());

    let fig8 = special::figure_eight();
    // Equations recorded for another gluing table.
    let mut foreign = fig8_slopes();
    foreign.triangulation = special::layered_loop(2);
    assert!(TreeEnumeration::new(&fig8, Coords::Quad, true, &NonSpun::new(foreign), &BanNone).is_err());
    // Wrong width.
    let mut short = fig8_slopes();
    short.meridian.pop();
    let cfg = ConverterCfg { kernel_messages: true };
    let constraint = NonSpun::new(short).with_cfg(cfg);
    assert!(TreeEnumeration::new(&fig8, Coords::Quad, true, &constraint, &BanNone).is_err());
    // Quad coordinates only.
    assert!(TreeEnumeration::new(&fig8, Coords::Standard, true, &NonSpun::new(fig8_slopes()), &BanNone).is_err());
}

#[test]
fn non_spun_restricts_to_zero_slopes() {
    let fig8 = special::figure_eight();
    let constraint = NonSpun::new(fig8_slopes());
    let search = TreeEnumeration::new(&fig8, Coords::Quad, true, &constraint, &BanNone).unwrap();
    let tab = search.tableau();
    assert_eq!(tab.width(), 8);
    assert_eq!(tab.columns()[6].extra, vec![-1, 0]);
    assert_eq!(tab.columns()[7].extra, vec![0, -1]);
    let (out, _) = search.collect(None);
    assert_eq!(
        out,
        vecs(&[&[1, 0, 0, 0, 2, 0], &[0, 2, 0, 1, 0, 0], &[0, 0, 2, 1, 0, 0]])
    );
    let slopes = fig8_slopes();
    for v in &out {
        assert!(v.dot_i64(&slopes.meridian).is_zero());
        assert!(v.dot_i64(&slopes.longitude).is_zero());
    }
    let fundamental = FundamentalEnumeration::new(&fig8, Coords::Quad, true, &constraint, &BanNone)
        .unwrap()
        .collect(None)
        .0;
    assert_eq!(sorted(fundamental), sorted(out));
}

#[test]
fn cancellation_returns_a_prefix() {
    let tri = special::layered_loop(2);
    let full = vertices(&tri, Coords::Standard);
    assert_eq!(full.len(), 5);
    let cfg = EnumCfg { poll_interval: 1 };
    let search = TreeEnumeration::new(&tri, Coords::Standard, true, &NoConstraint, &BanNone)
        .unwrap()
        .with_cfg(cfg);

    let tracker = ProgressTracker::new();
    let mut seen = Vec::new();
    let report = search.run(Some(&tracker), |v| {
        seen.push(v.clone());
        if seen.len() == 2 {
            tracker.cancel();
        }
        true
    });
    assert_eq!(report.outcome, SearchOutcome::Cancelled);
    assert_eq!(seen, full[..2].to_vec());
    assert!(tracker.is_finished());
    assert_eq!(tracker.solutions(), 2);

    // Cancelled before starting: nothing at all.
    let tracker = ProgressTracker::new();
    tracker.cancel();
    let (out, report) = search.collect(Some(&tracker));
    assert!(out.is_empty());
    assert_eq!(report.outcome, SearchOutcome::Cancelled);

    // The callback can stop the search too.
    let mut count = 0;
    let report = search.run(None, |_| {
        count += 1;
        false
    });
    assert_eq!((count, report.outcome), (1, SearchOutcome::Stopped));

    // A finished tracker reads 100%.
    let tracker = ProgressTracker::new();
    tracker.set_description("vertices");
    let (_, report) = search.collect(Some(&tracker));
    assert!(report.is_complete());
    assert_eq!(tracker.percent(), 100.0);
    assert_eq!(tracker.description(), "vertices");
}

#[test]
fn cancelled_fundamental_reports_nothing() {
    let tracker = ProgressTracker::new();
    tracker.cancel();
    let search = FundamentalEnumeration::new(&special::figure_eight(), Coords::Quad, true, &NoConstraint, &BanNone)
        .unwrap();
    let (out, report) = search.collect(Some(&tracker));
    assert!(out.is_empty());
    assert_eq!(report.outcome, SearchOutcome::Cancelled);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]

    // Vertex rays are nonzero, nonnegative, primitive, distinct, admissible
    // and solve the matching equations.
    #[test]
    fn quad_vertices_are_admissible(size in 1usize..4, bdry in 0usize..3, seed in any::<u64>()) {
        let tri = random_triangulation(RandomGluingCfg { size, boundary_faces: bdry, connected: true }, seed);
        let m = make_matching_equations(&tri, Coords::Quad).unwrap();
        let out = vertices(&tri, Coords::Quad);
        for (i, v) in out.iter().enumerate() {
            prop_assert!(!v.is_zero() && v.is_nonnegative());
            let g = v.iter().fold(BigInt::zero(), |acc, x| acc.gcd(x));
            prop_assert_eq!(g, BigInt::from(1));
            for r in 0..m.nrows() {
                prop_assert!(v.dot_i64(m.row(r).iter()).is_zero());
            }
            for t in 0..size {
                let quads = (0..3).filter(|k| !v[3 * t + k].is_zero()).count();
                prop_assert!(quads <= 1);
            }
            prop_assert!(!out[..i].contains(v));
        }
    }

    // Tableau order and back is the identity for every enumerable layout.
    #[test]
    fn permutation_round_trip(size in 0usize..5, extra in 0usize..3) {
        for coords in Coords::ALL {
            let Some(dim) = coords.dimension(size) else { continue };
            let kinds: Vec<_> = (0..dim)
                .map(|c| column_kind(coords, size, c).unwrap())
                .collect();
            let perm = ColumnPermutation::for_layout(&kinds, extra);
            prop_assert_eq!(perm.len(), dim + extra);
            let x: Vec<usize> = (0..perm.len()).map(|i| 3 * i + 1).collect();
            prop_assert_eq!(perm.unapply(&perm.apply(&x)), x.clone());
            prop_assert_eq!(perm.apply(&perm.unapply(&x)), x);
        }
    }

    #[test]
    fn banned_columns_stay_zero(size in 1usize..3, bdry in 1usize..4, seed in any::<u64>()) {
        let tri = random_triangulation(RandomGluingCfg { size, boundary_faces: bdry, connected: true }, seed);
        let search = TreeEnumeration::new(&tri, Coords::Standard, true, &NoConstraint, &BanBoundary).unwrap();
        let tab = search.tableau();
        let (out, _) = search.collect(None);
        for v in &out {
            for o in v.support() {
                prop_assert!(!tab.ban().is_banned(tab.perm().tableau(o)));
            }
        }
    }

    #[test]
    fn euler_of_vertex_links_is_link_euler(size in 1usize..4, seed in any::<u64>()) {
        let tri = random_triangulation(RandomGluingCfg { size, boundary_faces: 0, connected: false }, seed);
        let obj = euler_functional(&tri, Coords::Standard).unwrap();
        for vertex in tri.vertices() {
            let mut x = vec![0i64; 7 * size];
            for &(t, c) in &vertex.corners {
                x[7 * t + c] += 1;
            }
            let chi = CoordVector::from_i64(&x).dot_i64(&obj);
            prop_assert_eq!(chi, BigInt::from(vertex.link_euler));
        }
    }
}
