//! 3-manifold triangulations: gluing tables and their combinatorial skeleton.
//!
//! Purpose
//! - Provide exactly what the enumeration engine consumes from a triangulation:
//!   tetrahedron count, triangle / edge / vertex incidence with embedding
//!   permutations, vertex-link data and boundary components.
//! - Keep the object immutable once built: the skeleton is computed eagerly by
//!   `TriangulationBuilder::build`, so every accessor is a plain read.
//!
//! Conventions
//! - A gluing of face `f` of tetrahedron `t` is a pair `(adj, perm)` where
//!   `perm` maps the vertices of `t` to the vertices of `adj`, so `perm[f]` is
//!   the face of `adj` on the other side. Gluings are always reciprocated.
//! - Triangle embeddings use `Perm4` with `perm[3]` the face number and
//!   `perm[0..3]` the face vertices; edge embeddings put the endpoints in
//!   `perm[0]`, `perm[1]`.

pub mod perm;
pub mod rand;
mod skeleton;
pub mod special;

pub use perm::{edge_number, edge_ordering, face_ordering, Perm4, EDGE_VERTICES};
pub use skeleton::{
    BoundaryComponent, Edge, EdgeEmbedding, FaceEmbedding, Skeleton, Triangle, Vertex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a gluing table.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriError {
    #[error("tetrahedron {tet} out of range (triangulation has {size})")]
    TetOutOfRange { tet: usize, size: usize },
    #[error("face {0} out of range (faces are numbered 0..4)")]
    FaceOutOfRange(usize),
    #[error("face {face} of tetrahedron {tet} is already glued")]
    FaceAlreadyGlued { tet: usize, face: usize },
    #[error("face {face} of tetrahedron {tet} cannot be glued to itself")]
    SelfGluedFace { tet: usize, face: usize },
    #[error("images {0:?} do not form a permutation of 0..4")]
    BadPermutation([u8; 4]),
    #[error("gluing of face {face} of tetrahedron {tet} is not reciprocated")]
    Unreciprocated { tet: usize, face: usize },
}

/// One side of a face identification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gluing {
    pub adj: usize,
    pub perm: Perm4,
}

/// Gluing table row; `None` marks a boundary face.
pub type TetGluings = [Option<Gluing>; 4];

/// Incremental construction of a triangulation.
#[derive(Clone, Debug, Default)]
pub struct TriangulationBuilder {
    tets: Vec<TetGluings>,
}

impl TriangulationBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            tets: vec![[None; 4]; size],
        }
    }

    /// Glue face `face` of `tet` to `adj` via `perm`, together with the
    /// reciprocal gluing.
    pub fn join(
        &mut self,
        tet: usize,
        face: usize,
        adj: usize,
        perm: Perm4,
    ) -> Result<&mut Self, TriError> {
        let size = self.tets.len();
        for t in [tet, adj] {
            if t >= size {
                return Err(TriError::TetOutOfRange { tet: t, size });
            }
        }
        if face > 3 {
            return Err(TriError::FaceOutOfRange(face));
        }
        let adj_face = perm.at(face);
        if adj == tet && adj_face == face {
            return Err(TriError::SelfGluedFace { tet, face });
        }
        if self.tets[tet][face].is_some() {
            return Err(TriError::FaceAlreadyGlued { tet, face });
        }
        if self.tets[adj][adj_face].is_some() {
            return Err(TriError::FaceAlreadyGlued {
                tet: adj,
                face: adj_face,
            });
        }
        self.tets[tet][face] = Some(Gluing { adj, perm });
        self.tets[adj][adj_face] = Some(Gluing {
            adj: tet,
            perm: perm.inverse(),
        });
        Ok(self)
    }

    pub fn build(self) -> Result<Triangulation, TriError> {
        Triangulation::from_gluings(self.tets)
    }
}

/// An immutable triangulation together with its skeleton.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "GluingTable", into = "GluingTable")]
pub struct Triangulation {
    tets: Vec<TetGluings>,
    skeleton: Skeleton,
}

/// Serialised form: just the gluing table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GluingTable {
    pub tetrahedra: Vec<TetGluings>,
}

/// Equal gluing tables; the skeleton follows.
impl PartialEq for Triangulation {
    fn eq(&self, other: &Self) -> bool {
        self.tets == other.tets
    }
}

impl Eq for Triangulation {}

impl TryFrom<GluingTable> for Triangulation {
    type Error = TriError;
    fn try_from(table: GluingTable) -> Result<Self, TriError> {
        Triangulation::from_gluings(table.tetrahedra)
    }
}

impl From<Triangulation> for GluingTable {
    fn from(tri: Triangulation) -> Self {
        GluingTable {
            tetrahedra: tri.tets,
        }
    }
}

impl Triangulation {
    /// Validate a full gluing table and compute the skeleton.
    pub fn from_gluings(tets: Vec<TetGluings>) -> Result<Self, TriError> {
        let size = tets.len();
        for (t, row) in tets.iter().enumerate() {
            for (f, g) in row.iter().enumerate() {
                let Some(g) = g else { continue };
                if g.adj >= size {
                    return Err(TriError::TetOutOfRange { tet: g.adj, size });
                }
                let back_face = g.perm.at(f);
                if g.adj == t && back_face == f {
                    return Err(TriError::SelfGluedFace { tet: t, face: f });
                }
                match tets[g.adj][back_face] {
                    Some(back) if back.adj == t && back.perm == g.perm.inverse() => {}
                    _ => return Err(TriError::Unreciprocated { tet: t, face: f }),
                }
            }
        }
        let skeleton = Skeleton::compute(&tets);
        Ok(Self { tets, skeleton })
    }

    /// The empty triangulation.
    pub fn empty() -> Self {
        Self {
            tets: Vec::new(),
            skeleton: Skeleton::compute(&[]),
        }
    }

    /// Number of tetrahedra.
    #[inline]
    pub fn size(&self) -> usize {
        self.tets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tets.is_empty()
    }

    #[inline]
    pub fn adjacent(&self, tet: usize, face: usize) -> Option<&Gluing> {
        self.tets[tet][face].as_ref()
    }

    pub fn gluings(&self) -> &[TetGluings] {
        &self.tets
    }

    #[inline]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.skeleton.triangles
    }

    pub fn edges(&self) -> &[Edge] {
        &self.skeleton.edges
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.skeleton.vertices
    }

    pub fn boundary_components(&self) -> &[BoundaryComponent] {
        &self.skeleton.boundary_components
    }

    /// Triangle class of face `face` of `tet`.
    #[inline]
    pub fn triangle_of(&self, tet: usize, face: usize) -> usize {
        self.skeleton.tet_triangles[tet][face]
    }

    /// Edge class of tetrahedron edge `edge` (see `EDGE_VERTICES`).
    #[inline]
    pub fn edge_of(&self, tet: usize, edge: usize) -> usize {
        self.skeleton.tet_edges[tet][edge]
    }

    /// Vertex class of corner `vertex` of `tet`.
    #[inline]
    pub fn vertex_of(&self, tet: usize, vertex: usize) -> usize {
        self.skeleton.tet_vertices[tet][vertex]
    }

    pub fn has_boundary_triangles(&self) -> bool {
        self.skeleton.triangles.iter().any(Triangle::is_boundary)
    }

    pub fn is_ideal(&self) -> bool {
        self.skeleton.vertices.iter().any(Vertex::is_ideal)
    }

    /// No boundary triangles and every vertex link a sphere.
    pub fn is_closed(&self) -> bool {
        !self.has_boundary_triangles() && !self.is_ideal()
    }

    pub fn is_valid(&self) -> bool {
        self.skeleton.edges.iter().all(|e| e.valid)
            && self
                .skeleton
                .vertices
                .iter()
                .all(|v| v.is_ideal() || v.link_euler == if v.link_closed { 2 } else { 1 })
    }

    #[inline]
    pub fn is_orientable(&self) -> bool {
        self.skeleton.orientable
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.skeleton.components <= 1
    }
}

#[cfg(test)]
mod tests;
