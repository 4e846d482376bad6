//! Seeded random gluing tables.
//!
//! Model
//! - Shuffle the `4n` faces, pair them off in order and glue each pair by a
//!   uniformly random permutation. `boundary_faces` faces are left unglued.
//! - The result is a valid gluing table but not necessarily a manifold; the
//!   enumeration invariants hold regardless, which is what property tests need.
//! - Determinism: the same `(size, seed)` always yields the same table.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{Gluing, Perm4, TetGluings, Triangulation};

/// Random gluing configuration.
#[derive(Clone, Copy, Debug)]
pub struct RandomGluingCfg {
    pub size: usize,
    /// Number of faces left on the boundary; rounded up to keep the rest even.
    pub boundary_faces: usize,
    /// Reroll until the result is connected (bounded number of attempts).
    pub connected: bool,
}

impl Default for RandomGluingCfg {
    fn default() -> Self {
        Self {
            size: 2,
            boundary_faces: 0,
            connected: true,
        }
    }
}

const MAX_ATTEMPTS: usize = 64;

fn random_perm<R: Rng>(rng: &mut R) -> Perm4 {
    let mut img = [0u8, 1, 2, 3];
    img.shuffle(rng);
    Perm4::new(img).unwrap_or(Perm4::IDENTITY)
}

fn draw_table<R: Rng>(cfg: &RandomGluingCfg, rng: &mut R) -> Vec<TetGluings> {
    let n = cfg.size;
    let mut faces: Vec<(usize, usize)> = (0..n).flat_map(|t| (0..4).map(move |f| (t, f))).collect();
    faces.shuffle(rng);
    let mut bdry = cfg.boundary_faces.min(faces.len());
    if (faces.len() - bdry) % 2 == 1 {
        bdry += 1;
    }
    let glued = &faces[bdry..];
    let mut tets: Vec<TetGluings> = vec![[None; 4]; n];
    for pair in glued.chunks_exact(2) {
        let ((t0, f0), (t1, f1)) = (pair[0], pair[1]);
        // Any permutation with perm[f0] = f1 will do: fix that image, shuffle the rest.
        let drawn = random_perm(rng);
        let perm = Perm4::transposition(drawn.at(f0), f1).compose(&drawn);
        tets[t0][f0] = Some(Gluing { adj: t1, perm });
        tets[t1][f1] = Some(Gluing {
            adj: t0,
            perm: perm.inverse(),
        });
    }
    tets
}

/// Draw a random triangulation; `seed` fully determines the result.
pub fn random_triangulation(cfg: RandomGluingCfg, seed: u64) -> Triangulation {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut last = Triangulation::empty();
    for _ in 0..MAX_ATTEMPTS {
        let table = draw_table(&cfg, &mut rng);
        let Ok(tri) = Triangulation::from_gluings(table) else {
            continue;
        };
        if !cfg.connected || tri.is_connected() {
            return tri;
        }
        last = tri;
    }
    last
}
