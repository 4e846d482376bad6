use super::rand::{random_triangulation, RandomGluingCfg};
use super::special::*;
use super::*;
use proptest::prelude::*;

fn degrees(tri: &Triangulation) -> Vec<usize> {
    let mut d: Vec<usize> = tri.edges().iter().map(Edge::degree).collect();
    d.sort_unstable();
    d
}

#[test]
fn perm_compose_inverse_sign() {
    let p = Perm4::new([1, 3, 0, 2]).unwrap();
    assert_eq!(p.compose(&p.inverse()), Perm4::IDENTITY);
    assert_eq!(p.inverse().compose(&p), Perm4::IDENTITY);
    assert_eq!(Perm4::transposition(1, 2).sign(), -1);
    assert_eq!(p.sign(), p.inverse().sign());
    assert!(Perm4::new([0, 0, 1, 2]).is_none());
    for e in 0..6 {
        let o = edge_ordering(e);
        assert_eq!(o.sign(), 1);
        assert_eq!(edge_number(o.at(0), o.at(1)), e);
    }
    for f in 0..4 {
        assert_eq!(face_ordering(f).at(3), f);
    }
}

#[test]
fn builder_rejects_bad_gluings() {
    let mut b = TriangulationBuilder::new(1);
    assert_eq!(
        b.join(0, 0, 0, Perm4::IDENTITY).unwrap_err(),
        TriError::SelfGluedFace { tet: 0, face: 0 }
    );
    assert_eq!(
        b.join(0, 0, 3, Perm4::IDENTITY).unwrap_err(),
        TriError::TetOutOfRange { tet: 3, size: 1 }
    );
    b.join(0, 0, 0, Perm4::transposition(0, 1)).unwrap();
    assert_eq!(
        b.join(0, 1, 0, Perm4::transposition(1, 2)).unwrap_err(),
        TriError::FaceAlreadyGlued { tet: 0, face: 1 }
    );
    assert!(matches!(
        from_joins(1, &[(0, 0, 0, [1, 1, 2, 3])]),
        Err(TriError::BadPermutation(_))
    ));
}

#[test]
fn unreciprocated_table_is_rejected() {
    let mut table: Vec<TetGluings> = vec![[None; 4]; 2];
    table[0][0] = Some(Gluing {
        adj: 1,
        perm: Perm4::IDENTITY,
    });
    assert_eq!(
        Triangulation::from_gluings(table).unwrap_err(),
        TriError::Unreciprocated { tet: 0, face: 0 }
    );
}

#[test]
fn empty_triangulation_has_empty_skeleton() {
    let tri = Triangulation::empty();
    assert!(tri.is_empty());
    assert!(tri.triangles().is_empty());
    assert!(tri.vertices().is_empty());
    assert!(tri.is_connected());
}

#[test]
fn lone_tetrahedron_is_a_ball() {
    let tri = lone_tetrahedron();
    assert_eq!(tri.triangles().len(), 4);
    assert!(tri.triangles().iter().all(Triangle::is_boundary));
    assert_eq!(degrees(&tri), vec![1; 6]);
    assert!(tri.edges().iter().all(|e| e.boundary));
    assert_eq!(tri.vertices().len(), 4);
    assert!(tri.vertices().iter().all(|v| v.link_euler == 1 && !v.link_closed));
    let bc = tri.boundary_components();
    assert_eq!(bc.len(), 1);
    assert!(!bc[0].ideal && bc[0].orientable);
    assert_eq!(bc[0].euler, 2);
    assert!(tri.is_valid() && tri.is_orientable());
}

#[test]
fn one_tet_sphere_skeleton() {
    let tri = one_tet_sphere();
    assert_eq!(tri.triangles().len(), 2);
    assert_eq!(degrees(&tri), vec![1, 1, 4]);
    assert_eq!(tri.vertices().len(), 2);
    assert!(tri.vertices().iter().all(|v| v.link_euler == 2 && v.link_closed));
    assert!(tri.is_closed() && tri.is_valid() && tri.is_orientable());
    assert!(tri.boundary_components().is_empty());
    // Faces 3 and 2 form one triangle, faces 1 and 0 the other.
    assert_eq!(tri.triangle_of(0, 3), tri.triangle_of(0, 2));
    assert_eq!(tri.triangle_of(0, 1), tri.triangle_of(0, 0));
    assert_ne!(tri.triangle_of(0, 0), tri.triangle_of(0, 3));
}

#[test]
fn two_tet_sphere_skeleton() {
    let tri = two_tet_sphere();
    assert_eq!(tri.triangles().len(), 4);
    assert_eq!(degrees(&tri), vec![2; 6]);
    assert_eq!(tri.vertices().len(), 4);
    assert!(tri.is_closed() && tri.is_orientable());
}

#[test]
fn figure_eight_has_one_torus_cusp() {
    let tri = figure_eight();
    assert_eq!(degrees(&tri), vec![6, 6]);
    assert_eq!(tri.vertices().len(), 1);
    let v = &tri.vertices()[0];
    assert_eq!(v.corners.len(), 8);
    assert!(v.is_ideal() && v.link_orientable);
    assert_eq!(v.link_euler, 0);
    assert!(tri.is_ideal() && !tri.is_closed() && tri.is_orientable() && tri.is_valid());
    let bc = tri.boundary_components();
    assert_eq!(bc.len(), 1);
    assert!(bc[0].ideal && bc[0].orientable);
    assert_eq!(bc[0].euler, 0);
}

#[test]
fn gieseking_has_one_klein_bottle_cusp() {
    let tri = gieseking();
    assert_eq!(degrees(&tri), vec![6]);
    assert_eq!(tri.vertices().len(), 1);
    let v = &tri.vertices()[0];
    assert!(v.is_ideal() && !v.link_orientable);
    assert_eq!(v.link_euler, 0);
    assert!(!tri.is_orientable() && tri.is_valid());
}

#[test]
fn layered_solid_torus_boundary() {
    let tri = lst_123();
    assert_eq!(tri.triangles().len(), 3);
    assert_eq!(degrees(&tri), vec![1, 2, 3]);
    assert_eq!(tri.vertices().len(), 1);
    assert!(tri.vertices()[0].is_boundary());
    let bc = tri.boundary_components();
    assert_eq!(bc.len(), 1);
    assert!(!bc[0].ideal && bc[0].orientable);
    assert_eq!(bc[0].euler, 0);
    assert_eq!(bc[0].triangles.len(), 2);
    assert_eq!(bc[0].edges.len(), 3);
}

#[test]
fn twisted_kxi_has_klein_bottle_boundary() {
    let tri = twisted_kxi();
    assert_eq!(degrees(&tri), vec![2, 3, 3, 4, 6]);
    assert_eq!(tri.vertices().len(), 1);
    let bc = tri.boundary_components();
    assert_eq!(bc.len(), 1);
    assert!(!bc[0].orientable);
    assert_eq!(bc[0].euler, 0);
    assert!(!tri.is_orientable());
}

#[test]
fn layered_loop_lengths() {
    assert!(layered_loop(0).is_empty());
    let c2 = layered_loop(2);
    assert_eq!(c2.size(), 2);
    assert!(c2.is_closed());
    for name in NAMES {
        assert!(by_name(name).is_some(), "{name}");
    }
    assert!(by_name("no-such-thing").is_none());
}

#[test]
fn gluing_table_serde_round_trip() {
    let tri = figure_eight();
    let json = serde_json::to_string(&tri).unwrap();
    let back: Triangulation = serde_json::from_str(&json).unwrap();
    assert_eq!(back.gluings(), tri.gluings());
    assert_eq!(back.edges().len(), 2);
    let bad = r#"{"tetrahedra":[[{"adj":0,"perm":[0,0,1,2]},null,null,null]]}"#;
    assert!(serde_json::from_str::<Triangulation>(bad).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]

    #[test]
    fn random_skeleton_counts(size in 1usize..5, bdry in 0usize..3, seed in any::<u64>()) {
        let cfg = RandomGluingCfg { size, boundary_faces: bdry, connected: false };
        let tri = random_triangulation(cfg, seed);
        prop_assert_eq!(tri.size(), size);
        // Every tetrahedron face lies in exactly one triangle.
        let faces: usize = tri.triangles().iter().map(|t| t.embeddings.len()).sum();
        prop_assert_eq!(faces, 4 * size);
        // Valid edges account for all six edges of every tetrahedron.
        if tri.edges().iter().all(|e| e.valid) {
            let ends: usize = tri.edges().iter().map(Edge::degree).sum();
            prop_assert_eq!(ends, 6 * size);
        }
        let corners: usize = tri.vertices().iter().map(|v| v.corners.len()).sum();
        prop_assert_eq!(corners, 4 * size);
        for t in 0..size {
            for f in 0..4 {
                let tri_idx = tri.triangle_of(t, f);
                prop_assert!(tri.triangles()[tri_idx]
                    .embeddings
                    .iter()
                    .any(|e| e.tet == t && e.perm.at(3) == f));
            }
        }
    }

    #[test]
    fn random_seed_is_deterministic(seed in any::<u64>()) {
        let cfg = RandomGluingCfg { size: 3, ..RandomGluingCfg::default() };
        let a = random_triangulation(cfg, seed);
        let b = random_triangulation(cfg, seed);
        prop_assert_eq!(a.gluings(), b.gluings());
    }
}
