//! Linear constraints layered on top of the matching equations.
//!
//! A constraint contributes `ROWS` extra rows and `ROWS` extra columns. Row
//! `k` reads `f_k(x) - y_k = 0` where `y_k` is extra column `k`; the search
//! then pins `y_k` by its `Relation` (zero or strictly positive). Coefficients
//! are written straight into the column descriptors in tableau order.

use serde::{Deserialize, Serialize};

use crate::coords::{vertex_split, vertex_split_meeting, Coords};
use crate::tri::Triangulation;

use super::types::{ColumnDescriptor, ColumnPermutation, Relation};

/// A family of extra linear rows.
pub trait LpConstraint {
    /// Extra rows, and extra columns (one per row).
    const ROWS: usize;
    const NAME: &'static str;

    /// Fill `extra` coefficients of every column. `cols` holds the coordinate
    /// columns followed by the `ROWS` constraint columns, all in tableau
    /// order. Returns false if the constraint cannot be expressed for this
    /// triangulation and coordinate system.
    fn add_rows(
        &self,
        cols: &mut [ColumnDescriptor],
        perm: &ColumnPermutation,
        tri: &Triangulation,
        coords: Coords,
    ) -> bool;

    /// Required sign of extra column `k`.
    fn relation(&self, k: usize) -> Relation;
}

/// Constraints that cut out a linear subspace (every extra column is zero),
/// so the solution set stays a cone closed under addition.
pub trait LpSubspace: LpConstraint {}

/// No extra rows.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoConstraint;

impl LpConstraint for NoConstraint {
    const ROWS: usize = 0;
    const NAME: &'static str = "none";

    fn add_rows(
        &self,
        _cols: &mut [ColumnDescriptor],
        _perm: &ColumnPermutation,
        _tri: &Triangulation,
        _coords: Coords,
    ) -> bool {
        true
    }

    fn relation(&self, _k: usize) -> Relation {
        Relation::Zero
    }
}

impl LpSubspace for NoConstraint {}

/// Euler characteristic as a linear functional in coordinate order.
///
/// Supported for `Standard`, `AnStandard` and `Oriented` (where both
/// orientations of a disc share its coefficient). Each disc counts one face;
/// arcs are charged on the first embedding of each triangle and points on
/// the first embedding of each edge, so shared pieces are counted once.
pub fn euler_functional(tri: &Triangulation, coords: Coords) -> Option<Vec<i64>> {
    let (stride, octagons) = match coords {
        Coords::Standard | Coords::Oriented => (7, false),
        Coords::AnStandard => (10, true),
        _ => return None,
    };
    let n = tri.size();
    let mut obj = vec![1i64; stride * n];
    for triangle in tri.triangles() {
        let emb = triangle.embeddings[0];
        let base = stride * emb.tet;
        for i in 0..3 {
            obj[base + emb.perm.at(i)] -= 1;
        }
        for k in 4..7 {
            obj[base + k] -= 1;
        }
        if octagons {
            for k in 7..10 {
                obj[base + k] -= 2;
            }
        }
    }
    for edge in tri.edges() {
        let emb = edge.embeddings[0];
        let base = stride * emb.tet;
        let (a, b) = (emb.perm.at(0), emb.perm.at(1));
        obj[base + a] += 1;
        obj[base + b] += 1;
        for k in vertex_split_meeting(a, b) {
            obj[base + 4 + k] += 1;
            if octagons {
                obj[base + 7 + k] += 1;
            }
        }
        if octagons {
            obj[base + 7 + vertex_split(a, b)] += 2;
        }
    }
    if coords == Coords::Oriented {
        // Oriented columns: 2 per standard column, same coefficient.
        return Some(obj.iter().flat_map(|&c| [c, c]).collect());
    }
    Some(obj)
}

/// Euler characteristic strictly positive.
///
/// Not a subspace: the extra column is constrained positive, so this is only
/// usable with single-solution searches.
#[derive(Clone, Copy, Debug, Default)]
pub struct EulerPositive;

impl LpConstraint for EulerPositive {
    const ROWS: usize = 1;
    const NAME: &'static str = "euler-positive";

    fn add_rows(
        &self,
        cols: &mut [ColumnDescriptor],
        perm: &ColumnPermutation,
        tri: &Triangulation,
        coords: Coords,
    ) -> bool {
        if !matches!(coords, Coords::Standard | Coords::AnStandard) {
            tracing::debug!(%coords, "euler constraint needs standard-like coordinates");
            return false;
        }
        let Some(obj) = euler_functional(tri, coords) else {
            return false;
        };
        for (i, col) in cols.iter_mut().enumerate().take(obj.len()) {
            col.extra[0] = obj[perm.original(i)];
        }
        cols[obj.len()].extra[0] = -1;
        true
    }

    fn relation(&self, _k: usize) -> Relation {
        Relation::Positive
    }
}

/// Options handed to a cusp converter on every call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterCfg {
    /// Let the converter report its own diagnostics.
    pub kernel_messages: bool,
}

/// Supplies the two cusp slope equations of a one-cusped triangulation.
///
/// Implementations typically wrap an external hyperbolic-geometry kernel;
/// the search only needs the equations and a check that the kernel still
/// describes the same gluing table.
pub trait CuspConverter {
    /// Meridian and longitude rows in quad coordinates (`3 * size` entries
    /// each), or `None` if the cusp cannot be analysed.
    fn slope_equations(&self, tri: &Triangulation, cfg: &ConverterCfg) -> Option<[Vec<i64>; 2]>;

    /// Whether the equations were computed for exactly `tri`.
    fn verify(&self, tri: &Triangulation) -> bool;
}

impl<C: CuspConverter + ?Sized> CuspConverter for &C {
    fn slope_equations(&self, tri: &Triangulation, cfg: &ConverterCfg) -> Option<[Vec<i64>; 2]> {
        (**self).slope_equations(tri, cfg)
    }

    fn verify(&self, tri: &Triangulation) -> bool {
        (**self).verify(tri)
    }
}

/// Slope equations computed elsewhere and stored with the gluing table they
/// belong to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSlopes {
    pub triangulation: Triangulation,
    pub meridian: Vec<i64>,
    pub longitude: Vec<i64>,
}

impl CuspConverter for StoredSlopes {
    fn slope_equations(&self, tri: &Triangulation, cfg: &ConverterCfg) -> Option<[Vec<i64>; 2]> {
        let width = 3 * tri.size();
        if self.meridian.len() != width || self.longitude.len() != width {
            if cfg.kernel_messages {
                tracing::info!(
                    expected = width,
                    meridian = self.meridian.len(),
                    longitude = self.longitude.len(),
                    "stored slope equations have the wrong width"
                );
            }
            return None;
        }
        Some([self.meridian.clone(), self.longitude.clone()])
    }

    fn verify(&self, tri: &Triangulation) -> bool {
        self.triangulation.gluings() == tri.gluings()
    }
}

/// Zero boundary slope on the single torus cusp (non-spun surfaces).
#[derive(Clone, Debug)]
pub struct NonSpun<C> {
    pub converter: C,
    pub cfg: ConverterCfg,
}

impl<C: CuspConverter> NonSpun<C> {
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            cfg: ConverterCfg::default(),
        }
    }

    pub fn with_cfg(mut self, cfg: ConverterCfg) -> Self {
        self.cfg = cfg;
        self
    }
}

impl<C: CuspConverter> LpConstraint for NonSpun<C> {
    const ROWS: usize = 2;
    const NAME: &'static str = "non-spun";

    fn add_rows(
        &self,
        cols: &mut [ColumnDescriptor],
        perm: &ColumnPermutation,
        tri: &Triangulation,
        coords: Coords,
    ) -> bool {
        let n = tri.size();
        if coords != Coords::Quad || cols.len() != 3 * n + 2 {
            return false;
        }
        // Extra columns first: the rows stay independent even when the
        // constraint turns out to be inapplicable.
        cols[3 * n].extra[0] = -1;
        cols[3 * n + 1].extra[1] = -1;

        let one_torus_cusp = match tri.vertices() {
            [v] => v.is_ideal() && v.link_orientable && v.link_euler == 0,
            _ => false,
        };
        if !one_torus_cusp {
            tracing::debug!("non-spun constraint needs exactly one torus cusp");
            return false;
        }
        let Some([meridian, longitude]) = self.converter.slope_equations(tri, &self.cfg) else {
            tracing::debug!("no slope equations for this cusp");
            return false;
        };
        if !self.converter.verify(tri) {
            tracing::debug!("slope equations belong to a different triangulation");
            return false;
        }
        for (i, col) in cols.iter_mut().enumerate().take(3 * n) {
            let o = perm.original(i);
            col.extra[0] = meridian[o];
            col.extra[1] = longitude[o];
        }
        true
    }

    fn relation(&self, _k: usize) -> Relation {
        Relation::Zero
    }
}

impl<C: CuspConverter> LpSubspace for NonSpun<C> {}
