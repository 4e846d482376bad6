//! Permutations of {0,1,2,3}, used to describe gluings and face/edge embeddings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A permutation of {0,1,2,3}, stored by images: `p[i]` is the image of `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 4]", into = "[u8; 4]")]
pub struct Perm4([u8; 4]);

impl Perm4 {
    pub const IDENTITY: Perm4 = Perm4([0, 1, 2, 3]);

    /// Build from images; `None` unless the images form a permutation.
    pub fn new(images: [u8; 4]) -> Option<Self> {
        let mut seen = [false; 4];
        for &x in &images {
            if x > 3 || seen[x as usize] {
                return None;
            }
            seen[x as usize] = true;
        }
        Some(Self(images))
    }

    /// Transposition swapping `a` and `b` (identity if equal).
    pub fn transposition(a: usize, b: usize) -> Self {
        let mut img = [0u8, 1, 2, 3];
        img.swap(a, b);
        Self(img)
    }

    #[inline]
    pub fn images(&self) -> [u8; 4] {
        self.0
    }

    /// Image of `i` as a `usize`, the form every caller indexes with.
    #[inline]
    pub fn at(&self, i: usize) -> usize {
        self.0[i] as usize
    }

    /// `self ∘ other`: apply `other` first.
    #[inline]
    pub fn compose(&self, other: &Perm4) -> Perm4 {
        let mut img = [0u8; 4];
        for (i, slot) in img.iter_mut().enumerate() {
            *slot = self.0[other.0[i] as usize];
        }
        Perm4(img)
    }

    pub fn inverse(&self) -> Perm4 {
        let mut img = [0u8; 4];
        for i in 0..4 {
            img[self.0[i] as usize] = i as u8;
        }
        Perm4(img)
    }

    /// +1 for even, -1 for odd.
    pub fn sign(&self) -> i32 {
        let mut inversions = 0;
        for i in 0..4 {
            for j in (i + 1)..4 {
                if self.0[i] > self.0[j] {
                    inversions += 1;
                }
            }
        }
        if inversions % 2 == 0 {
            1
        } else {
            -1
        }
    }
}

impl std::ops::Index<usize> for Perm4 {
    type Output = u8;
    #[inline]
    fn index(&self, i: usize) -> &u8 {
        &self.0[i]
    }
}

impl TryFrom<[u8; 4]> for Perm4 {
    type Error = String;
    fn try_from(images: [u8; 4]) -> Result<Self, Self::Error> {
        Perm4::new(images).ok_or_else(|| format!("not a permutation of 0..4: {images:?}"))
    }
}

impl From<Perm4> for [u8; 4] {
    fn from(p: Perm4) -> Self {
        p.0
    }
}

impl fmt::Display for Perm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

/// Canonical embedding of face `f` of a tetrahedron: the three face vertices in
/// increasing order, followed by `f` itself.
pub fn face_ordering(f: usize) -> Perm4 {
    const ORD: [[u8; 4]; 4] = [[1, 2, 3, 0], [0, 2, 3, 1], [0, 1, 3, 2], [0, 1, 2, 3]];
    Perm4(ORD[f])
}

/// Tetrahedron edge numbering: 01, 02, 03, 12, 13, 23.
pub const EDGE_VERTICES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Edge number joining vertices `a != b`.
pub fn edge_number(a: usize, b: usize) -> usize {
    const NUM: [[usize; 4]; 4] = [
        [usize::MAX, 0, 1, 2],
        [0, usize::MAX, 3, 4],
        [1, 3, usize::MAX, 5],
        [2, 4, 5, usize::MAX],
    ];
    NUM[a][b]
}

/// Canonical embedding of edge `e`: its two endpoints first, then the remaining
/// two vertices ordered so the permutation is even.
pub fn edge_ordering(e: usize) -> Perm4 {
    let [a, b] = EDGE_VERTICES[e];
    let rest: Vec<u8> = (0..4u8).filter(|&v| v as usize != a && v as usize != b).collect();
    let p = Perm4([a as u8, b as u8, rest[0], rest[1]]);
    if p.sign() == 1 {
        p
    } else {
        Perm4([a as u8, b as u8, rest[1], rest[0]])
    }
}
