//! Data types shared by the tableau and the search engines.

use crate::coords::ColumnKind;

/// Bijection between tableau columns and coordinate positions.
///
/// Tableau column `i` holds coordinate `to_original[i]`. Columns at or past
/// the coordinate dimension belong to constraints and map to themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnPermutation {
    to_original: Vec<usize>,
    to_tableau: Vec<usize>,
}

impl ColumnPermutation {
    pub fn identity(len: usize) -> Self {
        Self {
            to_original: (0..len).collect(),
            to_tableau: (0..len).collect(),
        }
    }

    /// `None` unless `order` is a permutation of `0..order.len()`.
    pub fn from_order(order: Vec<usize>) -> Option<Self> {
        let mut to_tableau = vec![usize::MAX; order.len()];
        for (i, &o) in order.iter().enumerate() {
            if o >= order.len() || to_tableau[o] != usize::MAX {
                return None;
            }
            to_tableau[o] = i;
        }
        Some(Self {
            to_original: order,
            to_tableau,
        })
    }

    /// Tableau order for a coordinate layout: quads, then octagons, then
    /// triangles, then anything else; each group keeps coordinate order
    /// (tetrahedron-major). `extra` constraint columns follow unchanged.
    pub fn for_layout(kinds: &[ColumnKind], extra: usize) -> Self {
        let rank = |k: &ColumnKind| match k {
            ColumnKind::Quad { .. } => 0,
            ColumnKind::Octagon { .. } => 1,
            ColumnKind::Triangle { .. } => 2,
            ColumnKind::Angle { .. } | ColumnKind::Scaling => 3,
        };
        let mut order: Vec<usize> = (0..kinds.len()).collect();
        // Stable: ties keep coordinate order.
        order.sort_by_key(|&i| rank(&kinds[i]));
        order.extend(kinds.len()..kinds.len() + extra);
        let mut to_tableau = vec![0; order.len()];
        for (i, &o) in order.iter().enumerate() {
            to_tableau[o] = i;
        }
        Self {
            to_original: order,
            to_tableau,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.to_original.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.to_original.is_empty()
    }

    /// Coordinate position of tableau column `col`.
    #[inline]
    pub fn original(&self, col: usize) -> usize {
        self.to_original[col]
    }

    /// Tableau column of coordinate position `pos`.
    #[inline]
    pub fn tableau(&self, pos: usize) -> usize {
        self.to_tableau[pos]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.to_original
    }

    /// Reorder a vector from coordinate order into tableau order.
    pub fn apply<T: Clone>(&self, coords: &[T]) -> Vec<T> {
        debug_assert_eq!(coords.len(), self.len());
        self.to_original.iter().map(|&o| coords[o].clone()).collect()
    }

    /// Reorder a vector from tableau order back into coordinate order.
    pub fn unapply<T: Clone>(&self, tableau: &[T]) -> Vec<T> {
        debug_assert_eq!(tableau.len(), self.len());
        self.to_tableau.iter().map(|&t| tableau[t].clone()).collect()
    }
}

/// One tableau column: where it came from and its coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Coordinate position (or `dimension + k` for constraint column `k`).
    pub original: usize,
    /// `None` for constraint columns.
    pub kind: Option<ColumnKind>,
    /// Nonzero entries `(row, coefficient)` of the reduced matching rows.
    pub matching: Vec<(usize, i64)>,
    /// Coefficient in each constraint row.
    pub extra: Vec<i64>,
}

impl ColumnDescriptor {
    pub fn new(original: usize, kind: Option<ColumnKind>, constraint_rows: usize) -> Self {
        Self {
            original,
            kind,
            matching: Vec::new(),
            extra: vec![0; constraint_rows],
        }
    }
}

/// Required sign of a constraint column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Zero,
    Positive,
}

/// Per-column ban and mark flags, in tableau order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BanSet {
    pub banned: Vec<bool>,
    pub marked: Vec<bool>,
}

impl BanSet {
    pub fn none(len: usize) -> Self {
        Self {
            banned: vec![false; len],
            marked: vec![false; len],
        }
    }

    #[inline]
    pub fn is_banned(&self, col: usize) -> bool {
        self.banned.get(col).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_marked(&self, col: usize) -> bool {
        self.marked.get(col).copied().unwrap_or(false)
    }

    pub fn banned_count(&self) -> usize {
        self.banned.iter().filter(|&&b| b).count()
    }

    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|&&b| b).count()
    }
}

/// How the search groups columns into branching slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Embedded-constraint groups become one slot each; at most one member
    /// of a group is positive.
    Embedded,
    /// Every column branches on its own (immersed / singular surfaces).
    Unconstrained,
    /// Angle coordinates: exactly one angle per tetrahedron is positive.
    Taut,
}

/// A branching slot: a set of tableau columns and the admissible choices of
/// which of them are positive (all others in the slot are zero).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub columns: Vec<usize>,
    pub patterns: Vec<Vec<usize>>,
}

/// Sign state of a column during search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ColState {
    Free,
    Zero,
    Positive,
}
