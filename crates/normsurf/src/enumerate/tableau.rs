//! The initial tableau: matching equations, constraint rows and bans, all
//! expressed over permuted columns.
//!
//! Purpose
//! - Build once per enumeration the exact rows every search node works
//!   against, plus the branching slots derived from the embedded
//!   constraints.
//!
//! Why this design
//! - Dependent matching rows are dropped up front (greedy, in row order), so
//!   the row count equals the rank and kernel computations at the leaves stay
//!   small.
//! - Columns are permuted so quad-like columns come first: the search decides
//!   them first, and they carry most of the pruning power.

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::coords::{for_coords, ColumnKind, CoordSystem, CoordVector, CoordVisitor, Coords};
use crate::lp::{independent_rows, kernel_basis, q, LpProblem};
use crate::tri::Triangulation;

use super::ban::BanConstraint;
use super::constraint::LpConstraint;
use super::types::{
    BanSet, ColState, ColumnDescriptor, ColumnPermutation, Relation, Slot, SlotPolicy,
};
use super::EnumerateError;

/// Everything the registry knows about one system, in coordinate order.
struct SystemData {
    matching: DMatrix<i64>,
    groups: Vec<Vec<usize>>,
    kinds: Vec<ColumnKind>,
    forced: Vec<usize>,
}

struct Gather<'a>(&'a Triangulation);

impl CoordVisitor for Gather<'_> {
    type Output = Option<SystemData>;
    fn visit<S: CoordSystem>(self) -> Self::Output {
        let n = self.0.size();
        Some(SystemData {
            matching: S::matching_equations(self.0),
            groups: S::embedded_constraints(self.0),
            kinds: (0..S::dimension(n)).map(|c| S::column_kind(n, c)).collect(),
            forced: S::forced_positive(n),
        })
    }
}

/// Rows, columns and bans for one enumeration.
#[derive(Clone, Debug)]
pub struct InitialTableau {
    coords: Coords,
    size: usize,
    dim: usize,
    perm: ColumnPermutation,
    cols: Vec<ColumnDescriptor>,
    rank: usize,
    rows: Vec<Vec<BigRational>>,
    ban: BanSet,
    relations: Vec<Relation>,
    forced: Vec<usize>,
    groups: Vec<Vec<usize>>,
}

impl InitialTableau {
    /// Build the tableau for `tri` in `coords` with an extra constraint and
    /// a ban rule.
    pub fn new<C: LpConstraint, B: BanConstraint>(
        tri: &Triangulation,
        coords: Coords,
        constraint: &C,
        ban: &B,
    ) -> Result<Self, EnumerateError> {
        let data = for_coords(coords, Gather(tri), None)
            .ok_or(EnumerateError::UnsupportedCoords(coords))?;
        let dim = data.kinds.len();
        let extra = C::ROWS;
        let perm = ColumnPermutation::for_layout(&data.kinds, extra);

        let keep = independent_rows(&data.matching);
        let rank = keep.len();
        let mut cols: Vec<ColumnDescriptor> = (0..dim + extra)
            .map(|i| {
                let o = perm.original(i);
                let mut col = ColumnDescriptor::new(o, data.kinds.get(o).copied(), extra);
                if o < dim {
                    col.matching = keep
                        .iter()
                        .enumerate()
                        .filter_map(|(r, &row)| {
                            let a = data.matching[(row, o)];
                            (a != 0).then_some((r, a))
                        })
                        .collect();
                }
                col
            })
            .collect();

        if !constraint.add_rows(&mut cols, &perm, tri, coords) {
            return Err(EnumerateError::Inapplicable {
                constraint: C::NAME,
                coords,
            });
        }
        let ban = ban.init(tri, coords, &perm);
        let relations: Vec<Relation> = (0..extra).map(|k| constraint.relation(k)).collect();

        let width = dim + extra;
        let mut rows = vec![vec![BigRational::zero(); width]; rank + extra];
        for (i, col) in cols.iter().enumerate() {
            for &(r, a) in &col.matching {
                rows[r][i] = q(a);
            }
            for (k, &a) in col.extra.iter().enumerate() {
                if a != 0 {
                    rows[rank + k][i] = q(a);
                }
            }
        }

        let mut forced: Vec<usize> = data.forced.iter().map(|&o| perm.tableau(o)).collect();
        forced.extend(
            relations
                .iter()
                .enumerate()
                .filter(|(_, r)| **r == Relation::Positive)
                .map(|(k, _)| dim + k),
        );
        forced.sort_unstable();

        let groups = data
            .groups
            .iter()
            .map(|g| {
                let mut t: Vec<usize> = g.iter().map(|&o| perm.tableau(o)).collect();
                t.sort_unstable();
                t
            })
            .collect();

        tracing::debug!(
            %coords,
            tets = tri.size(),
            columns = width,
            rank,
            constraint = C::NAME,
            ban = B::NAME,
            banned = ban.banned_count(),
            "initial tableau"
        );
        Ok(Self {
            coords,
            size: tri.size(),
            dim,
            perm,
            cols,
            rank,
            rows,
            ban,
            relations,
            forced,
            groups,
        })
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// Number of tetrahedra.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Coordinate columns (excluding constraint columns).
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// All columns, coordinate and constraint.
    pub fn width(&self) -> usize {
        self.cols.len()
    }

    /// Independent matching rows kept.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn extra_columns(&self) -> usize {
        self.relations.len()
    }

    pub fn perm(&self) -> &ColumnPermutation {
        &self.perm
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.cols
    }

    /// Matching rows followed by constraint rows, tableau order.
    pub fn rows(&self) -> &[Vec<BigRational>] {
        &self.rows
    }

    pub fn ban(&self) -> &BanSet {
        &self.ban
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Tableau columns that every solution has strictly positive.
    pub fn forced(&self) -> &[usize] {
        &self.forced
    }

    /// Embedded-constraint groups in tableau columns.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn kind(&self, col: usize) -> Option<ColumnKind> {
        self.cols.get(col).and_then(|c| c.kind)
    }

    pub fn is_octagon(&self, col: usize) -> bool {
        matches!(self.kind(col), Some(ColumnKind::Octagon { .. }))
    }

    /// Tableau columns holding quads or octagons.
    pub fn quad_like(&self) -> Vec<usize> {
        (0..self.dim)
            .filter(|&c| self.kind(c).is_some_and(|k| k.is_quad_like()))
            .collect()
    }

    /// Initial sign state of every column: bans, forced columns and the
    /// constraint relations are decided up front.
    pub(crate) fn initial_state(&self) -> Vec<ColState> {
        let mut state = vec![ColState::Free; self.width()];
        for (c, s) in state.iter_mut().enumerate().take(self.dim) {
            if self.ban.is_banned(c) {
                *s = ColState::Zero;
            }
        }
        for (k, r) in self.relations.iter().enumerate() {
            state[self.dim + k] = match r {
                Relation::Zero => ColState::Zero,
                Relation::Positive => ColState::Positive,
            };
        }
        for &c in &self.forced {
            state[c] = ColState::Positive;
        }
        state
    }

    /// Branching slots over the coordinate columns, ordered by their first
    /// column. Patterns never switch on a banned column and always include
    /// forced columns; within a slot they are ordered by size, then
    /// lexicographically (so the empty pattern comes first).
    pub fn slots(&self, policy: SlotPolicy) -> Vec<Slot> {
        let components: Vec<Vec<usize>> = match policy {
            SlotPolicy::Embedded => self.group_components(),
            SlotPolicy::Unconstrained => (0..self.dim).map(|c| vec![c]).collect(),
            SlotPolicy::Taut => self.taut_components(),
        };
        let mut slots: Vec<Slot> = components
            .into_iter()
            .map(|columns| self.slot(columns, |p| self.admissible(policy, p)))
            .collect();
        slots.sort_by_key(|s| s.columns.first().copied());
        slots
    }

    fn admissible(&self, policy: SlotPolicy, pattern: &[usize]) -> bool {
        match policy {
            SlotPolicy::Embedded => self
                .groups
                .iter()
                .all(|g| g.iter().filter(|c| pattern.contains(c)).count() <= 1),
            SlotPolicy::Unconstrained => true,
            // One positive angle per tetrahedron.
            SlotPolicy::Taut => {
                pattern.len() == 1
                    || pattern
                        .iter()
                        .all(|&c| self.kind(c).and_then(|k| k.tet()).is_none())
            }
        }
    }

    fn slot(&self, columns: Vec<usize>, admissible: impl Fn(&[usize]) -> bool) -> Slot {
        let forced: Vec<usize> = columns
            .iter()
            .copied()
            .filter(|c| self.forced.contains(c))
            .collect();
        let mut patterns: Vec<Vec<usize>> = (0u64..1 << columns.len())
            .map(|mask| {
                columns
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| (mask >> i) & 1 == 1)
                    .map(|(_, &c)| c)
                    .collect::<Vec<usize>>()
            })
            .filter(|p| p.iter().all(|&c| !self.ban.is_banned(c)))
            .filter(|p| forced.iter().all(|c| p.contains(c)))
            .filter(|p| admissible(p.as_slice()))
            .collect();
        patterns.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        Slot { columns, patterns }
    }

    /// Connected components of the overlap graph of the embedded groups;
    /// columns in no group stand alone.
    fn group_components(&self) -> Vec<Vec<usize>> {
        let mut comp: Vec<usize> = (0..self.dim).collect();
        fn find(comp: &mut [usize], mut x: usize) -> usize {
            while comp[x] != x {
                comp[x] = comp[comp[x]];
                x = comp[x];
            }
            x
        }
        for g in &self.groups {
            for w in g.windows(2) {
                let (a, b) = (find(&mut comp, w[0]), find(&mut comp, w[1]));
                if a != b {
                    comp[a.max(b)] = a.min(b);
                }
            }
        }
        let mut out: Vec<Vec<usize>> = Vec::new();
        let mut index = vec![usize::MAX; self.dim];
        for c in 0..self.dim {
            let r = find(&mut comp, c);
            if index[r] == usize::MAX {
                index[r] = out.len();
                out.push(Vec::new());
            }
            out[index[r]].push(c);
        }
        out
    }

    /// Angle columns grouped by tetrahedron; the scaling column alone.
    fn taut_components(&self) -> Vec<Vec<usize>> {
        let mut per_tet: Vec<Vec<usize>> = vec![Vec::new(); self.size];
        let mut rest = Vec::new();
        for c in 0..self.dim {
            match self.kind(c).and_then(|k| k.tet()) {
                Some(t) => per_tet[t].push(c),
                None => rest.push(vec![c]),
            }
        }
        per_tet.into_iter().filter(|v| !v.is_empty()).chain(rest).collect()
    }

    /// Rows plus the bounds implied by a partial sign assignment.
    pub(crate) fn bounded_problem(&self, state: &[ColState]) -> LpProblem {
        let mut lp = LpProblem::new(self.width());
        for row in &self.rows {
            lp.add_equality(row.clone(), BigRational::zero());
        }
        for (c, s) in state.iter().enumerate() {
            match s {
                ColState::Zero => {
                    lp.zero(c);
                }
                ColState::Positive => {
                    lp.at_least(c, q(1));
                }
                ColState::Free => {}
            }
        }
        lp
    }

    /// Feasibility problem for a partial sign assignment. With no column
    /// decided positive, `cover` (if given) or every column must sum to at
    /// least one, ruling out the trivial solution.
    pub(crate) fn problem(&self, state: &[ColState], cover: Option<&[usize]>) -> LpProblem {
        let mut lp = self.bounded_problem(state);
        if let Some(cols) = cover {
            lp.add_at_least(self.indicator(cols), q(1));
        } else if !state.contains(&ColState::Positive) {
            let all: Vec<usize> = (0..self.dim).collect();
            lp.add_at_least(self.indicator(&all), q(1));
        }
        lp
    }

    pub(crate) fn indicator(&self, cols: &[usize]) -> Vec<BigRational> {
        let mut row = vec![BigRational::zero(); self.width()];
        for &c in cols {
            row[c] = q(1);
        }
        row
    }

    /// Kernel of the rows restricted to `support` (tableau columns), as
    /// vectors over `support`.
    pub fn support_kernel(&self, support: &[usize]) -> Vec<Vec<BigRational>> {
        let restricted: Vec<Vec<BigRational>> = self
            .rows
            .iter()
            .map(|row| support.iter().map(|&c| row[c].clone()).collect())
            .collect();
        kernel_basis(&restricted, support.len())
    }

    /// Whether a full tableau-order integer vector satisfies every row.
    pub fn satisfies(&self, x: &[BigInt]) -> bool {
        self.rows.iter().all(|row| {
            row.iter()
                .zip(x)
                .filter(|(a, v)| !a.is_zero() && !v.is_zero())
                .map(|(a, v)| a * BigRational::from_integer(v.clone()))
                .sum::<BigRational>()
                .is_zero()
        })
    }

    /// Drop constraint columns and undo the permutation.
    pub fn to_coordinates(&self, tableau: &[BigInt]) -> CoordVector {
        let mut out = vec![BigInt::zero(); self.dim];
        for (i, v) in tableau.iter().enumerate().take(self.dim) {
            out[self.perm.original(i)] = v.clone();
        }
        CoordVector::from_entries(out)
    }

    /// Whether a coordinate-order vector uses any marked column.
    pub fn touches_marked(&self, v: &CoordVector) -> bool {
        v.support()
            .into_iter()
            .any(|o| self.ban.is_marked(self.perm.tableau(o)))
    }
}
