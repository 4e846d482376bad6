//! Normal surface lists: the public face of the enumeration engine.
//!
//! A list records how it was produced (coordinates, `Which`, optional slope
//! equations) and whether the search ran to completion. Surfaces are stored
//! in the order the search reported them.

use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::coords::{column_kind, ColumnKind, CoordVector, Coords};
use crate::enumerate::{
    euler_functional, BanConstraint, BanNone, ConverterCfg, CuspConverter, EnumCfg,
    EnumerateError, FundamentalEnumeration, InitialTableau, LpSubspace, NoConstraint, NonSpun,
    ProgressTracker, SearchOutcome, TreeEnumeration,
};
use crate::tri::Triangulation;

/// Vertex or fundamental solutions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumMode {
    #[default]
    Vertex,
    Fundamental,
}

/// Which surfaces to enumerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Which {
    pub mode: EnumMode,
    /// Enforce the embedded (quad / octagon exclusivity) constraints.
    pub embedded: bool,
}

impl Default for Which {
    fn default() -> Self {
        Self {
            mode: EnumMode::Vertex,
            embedded: true,
        }
    }
}

/// One surface: its coordinate vector and where it lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalSurface {
    vector: CoordVector,
    coords: Coords,
    size: usize,
    marked: bool,
}

impl NormalSurface {
    pub fn new(vector: CoordVector, coords: Coords, size: usize, marked: bool) -> Self {
        Self {
            vector,
            coords,
            size,
            marked,
        }
    }

    pub fn vector(&self) -> &CoordVector {
        &self.vector
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// Whether the surface uses a marked column (see `BanTorusBoundary`).
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Sum of the columns whose kind matches `pred`; `None` if no column of
    /// the layout could ever match.
    fn total(&self, pred: impl Fn(&ColumnKind) -> bool) -> Option<BigInt> {
        let mut any = false;
        let mut sum = BigInt::zero();
        for (c, v) in self.vector.iter().enumerate() {
            let Some(kind) = column_kind(self.coords, self.size, c) else {
                continue;
            };
            if pred(&kind) {
                any = true;
                sum += v;
            }
        }
        any.then_some(sum)
    }

    /// Triangles about `vertex` in `tet` (both orientations summed);
    /// `None` in quad-only systems.
    pub fn triangles(&self, tet: usize, vertex: usize) -> Option<BigInt> {
        self.total(|k| matches!(*k, ColumnKind::Triangle { tet: t, vertex: v, .. } if t == tet && v == vertex))
    }

    /// Quads of type `kind` in `tet` (both orientations summed).
    pub fn quads(&self, tet: usize, kind: usize) -> Option<BigInt> {
        self.total(|k| matches!(*k, ColumnKind::Quad { tet: t, kind: q, .. } if t == tet && q == kind))
    }

    /// Octagons of type `kind` in `tet`; zero in normal (not almost normal)
    /// systems.
    pub fn octagons(&self, tet: usize, kind: usize) -> Option<BigInt> {
        if !self.coords.is_almost_normal() {
            return (!self.coords.is_angle() && tet < self.size && kind < 3).then(BigInt::zero);
        }
        self.total(|k| matches!(*k, ColumnKind::Octagon { tet: t, kind: o } if t == tet && o == kind))
    }

    pub fn has_octagon(&self) -> bool {
        self.vector
            .support()
            .into_iter()
            .any(|c| matches!(column_kind(self.coords, self.size, c), Some(ColumnKind::Octagon { .. })))
    }

    /// Only triangles: a union of vertex links (or, in quad-only systems,
    /// the empty surface).
    pub fn is_vertex_linking(&self) -> bool {
        self.vector.support().into_iter().all(|c| {
            !column_kind(self.coords, self.size, c).is_some_and(|k| k.is_quad_like())
        })
    }

    /// Euler characteristic in standard-like systems (`None` in quad-only
    /// coordinates, where it is not determined by the vector).
    pub fn euler_characteristic(&self, tri: &Triangulation) -> Option<BigInt> {
        if tri.size() != self.size {
            return None;
        }
        let obj = euler_functional(tri, self.coords)?;
        Some(self.vector.dot_i64(&obj))
    }
}

/// The result of one normal surface enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalSurfaceList {
    coords: Coords,
    which: Which,
    surfaces: Vec<NormalSurface>,
    outcome: SearchOutcome,
    slopes: Option<[Vec<i64>; 2]>,
}

impl NormalSurfaceList {
    /// Enumerate without extra constraints or bans.
    pub fn enumerate(
        tri: &Triangulation,
        coords: Coords,
        which: Which,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Self, EnumerateError> {
        Self::enumerate_with(tri, coords, which, &NoConstraint, &BanNone, tracker, EnumCfg::default())
    }

    /// Enumerate under a subspace constraint and a ban rule.
    pub fn enumerate_with<C: LpSubspace, B: BanConstraint>(
        tri: &Triangulation,
        coords: Coords,
        which: Which,
        constraint: &C,
        ban: &B,
        tracker: Option<&ProgressTracker>,
        cfg: EnumCfg,
    ) -> Result<Self, EnumerateError> {
        if coords.is_angle() {
            return Err(EnumerateError::UnsupportedMode {
                mode: "normal surface",
                coords,
            });
        }
        let size = tri.size();
        let mut surfaces = Vec::new();
        let mut collect = |tab: &InitialTableau, v: &CoordVector| {
            surfaces.push(NormalSurface::new(v.clone(), coords, size, tab.touches_marked(v)));
            true
        };
        let report = match which.mode {
            EnumMode::Vertex => {
                let search = TreeEnumeration::new(tri, coords, which.embedded, constraint, ban)?
                    .with_cfg(cfg);
                let tab = search.tableau();
                search.run(tracker, |v| collect(tab, v))
            }
            EnumMode::Fundamental => {
                let search =
                    FundamentalEnumeration::new(tri, coords, which.embedded, constraint, ban)?
                        .with_cfg(cfg);
                let tab = search.tableau();
                search.run(tracker, |v| collect(tab, v))
            }
        };
        tracing::info!(
            %coords,
            mode = ?which.mode,
            embedded = which.embedded,
            surfaces = surfaces.len(),
            outcome = ?report.outcome,
            nodes = report.nodes,
            "normal surface enumeration"
        );
        Ok(Self {
            coords,
            which,
            surfaces,
            outcome: report.outcome,
            slopes: None,
        })
    }

    /// Quad-coordinate surfaces with zero boundary slope on the single torus
    /// cusp.
    pub fn non_spun<K: CuspConverter>(
        tri: &Triangulation,
        converter: K,
        cfg: ConverterCfg,
        which: Which,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Self, EnumerateError> {
        let constraint = NonSpun::new(converter).with_cfg(cfg);
        let mut list = Self::enumerate_with(
            tri,
            Coords::Quad,
            which,
            &constraint,
            &BanNone,
            tracker,
            EnumCfg::default(),
        )?;
        list.slopes = constraint.converter.slope_equations(tri, &cfg);
        Ok(list)
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn which(&self) -> Which {
        self.which
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surfaces(&self) -> &[NormalSurface] {
        &self.surfaces
    }

    pub fn get(&self, i: usize) -> Option<&NormalSurface> {
        self.surfaces.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalSurface> {
        self.surfaces.iter()
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    /// False if the search was cancelled or stopped early; the list is then a
    /// prefix of the full result.
    pub fn is_complete(&self) -> bool {
        self.outcome == SearchOutcome::Completed
    }

    /// Meridian and longitude rows used by a non-spun enumeration.
    pub fn slope_equations(&self) -> Option<&[Vec<i64>; 2]> {
        self.slopes.as_ref()
    }
}

impl<'a> IntoIterator for &'a NormalSurfaceList {
    type Item = &'a NormalSurface;
    type IntoIter = std::slice::Iter<'a, NormalSurface>;
    fn into_iter(self) -> Self::IntoIter {
        self.surfaces.iter()
    }
}
