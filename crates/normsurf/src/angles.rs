//! Angle structure lists.
//!
//! Vectors live in `Coords::Angle`: three angle columns per tetrahedron and
//! a final scaling column standing for π. Strict / taut classification is
//! computed once, when a structure is built.

use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::coords::{CoordVector, Coords};
use crate::enumerate::{
    BanNone, EnumCfg, EnumerateError, NoConstraint, ProgressTracker, SearchOutcome,
    TautEnumeration, TreeEnumeration,
};
use crate::tri::Triangulation;

/// One angle structure (possibly a vertex of the angle structure polytope).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleStructure {
    vector: CoordVector,
    strict: bool,
    taut: bool,
}

impl AngleStructure {
    /// Classify `vector` (length `3n + 1`, positive scaling column).
    pub fn new(vector: CoordVector) -> Self {
        let (strict, taut) = match vector.entries().split_last() {
            Some((scale, angles)) if scale.is_positive() => (
                angles.iter().all(Signed::is_positive),
                angles.iter().all(|a| a.is_zero() || a == scale),
            ),
            _ => (false, false),
        };
        Self {
            vector,
            strict,
            taut,
        }
    }

    pub fn vector(&self) -> &CoordVector {
        &self.vector
    }

    /// Number of tetrahedra.
    pub fn size(&self) -> usize {
        self.vector.len().saturating_sub(1) / 3
    }

    /// Angle `kind` of `tet` as a multiple of π.
    pub fn angle(&self, tet: usize, kind: usize) -> Option<BigRational> {
        let scale = self.vector.entries().last()?;
        if scale.is_zero() || tet >= self.size() || kind >= 3 {
            return None;
        }
        Some(BigRational::new(self.vector[3 * tet + kind].clone(), scale.clone()))
    }

    /// Every angle strictly between 0 and π.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Every angle exactly 0 or π.
    pub fn is_taut(&self) -> bool {
        self.taut
    }
}

/// The result of one angle structure enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleStructureList {
    taut_only: bool,
    structures: Vec<AngleStructure>,
    outcome: SearchOutcome,
}

impl AngleStructureList {
    /// Vertex angle structures, or with `taut_only` the taut structures.
    pub fn enumerate(
        tri: &Triangulation,
        taut_only: bool,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Self, EnumerateError> {
        Self::enumerate_with_cfg(tri, taut_only, tracker, EnumCfg::default())
    }

    pub fn enumerate_with_cfg(
        tri: &Triangulation,
        taut_only: bool,
        tracker: Option<&ProgressTracker>,
        cfg: EnumCfg,
    ) -> Result<Self, EnumerateError> {
        let mut structures = Vec::new();
        let push = |v: &CoordVector| {
            structures.push(AngleStructure::new(v.clone()));
            true
        };
        let report = if taut_only {
            TautEnumeration::new(tri)?.with_cfg(cfg).run(tracker, push)
        } else {
            TreeEnumeration::new(tri, Coords::Angle, true, &NoConstraint, &BanNone)?
                .with_cfg(cfg)
                .run(tracker, push)
        };
        tracing::info!(
            taut_only,
            structures = structures.len(),
            outcome = ?report.outcome,
            "angle structure enumeration"
        );
        Ok(Self {
            taut_only,
            structures,
            outcome: report.outcome,
        })
    }

    pub fn is_taut_only(&self) -> bool {
        self.taut_only
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn structures(&self) -> &[AngleStructure] {
        &self.structures
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AngleStructure> {
        self.structures.iter()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == SearchOutcome::Completed
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    /// Whether some convex combination of the listed vertices is strict:
    /// every angle column is positive in at least one of them.
    pub fn spans_strict(&self) -> bool {
        let Some(first) = self.structures.first() else {
            return false;
        };
        let angles = first.vector.len().saturating_sub(1);
        (0..angles).all(|c| self.structures.iter().any(|s| s.vector[c].is_positive()))
    }

    /// Whether any listed structure is taut.
    pub fn spans_taut(&self) -> bool {
        self.structures.iter().any(AngleStructure::is_taut)
    }
}

impl<'a> IntoIterator for &'a AngleStructureList {
    type Item = &'a AngleStructure;
    type IntoIter = std::slice::Iter<'a, AngleStructure>;
    fn into_iter(self) -> Self::IntoIter {
        self.structures.iter()
    }
}
