//! Depth-first tree traversal over admissible sign patterns.
//!
//! Each level of the tree decides one slot (see `Slot`): which of its
//! columns are positive and which are zero. A node survives only if the
//! exact LP "rows = 0, decided zeros = 0, decided positives >= 1" is
//! feasible. At a leaf every column is decided and the support `S` is fixed:
//! - vertex mode accepts `S` iff the kernel of the rows restricted to `S` is
//!   one-dimensional with a generator of one strict sign;
//! - point mode takes the LP point itself.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::coords::{CoordVector, Coords};
use crate::lp::primitive_integer;
use crate::tri::Triangulation;

use super::ban::{BanConstraint, BanNone};
use super::constraint::{LpConstraint, LpSubspace, NoConstraint};
use super::progress::ProgressTracker;
use super::tableau::InitialTableau;
use super::types::{ColState, Slot, SlotPolicy};
use super::{EnumCfg, EnumerateError, SearchOutcome, SearchReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Leaf {
    Vertex,
    Point,
}

/// DFS runner carrying the shared context and accumulators.
struct TreeRunner<'a, F> {
    tab: &'a InitialTableau,
    slots: &'a [Slot],
    leaf: Leaf,
    cover: Option<Vec<usize>>,
    tracker: Option<&'a ProgressTracker>,
    /// Mark the tracker finished when the run ends.
    finish: bool,
    cfg: EnumCfg,
    state: Vec<ColState>,
    octagons: usize,
    nodes: usize,
    found: usize,
    stop: Option<SearchOutcome>,
    emit: F,
}

impl<'a, F: FnMut(Vec<BigInt>) -> bool> TreeRunner<'a, F> {
    fn new(
        tab: &'a InitialTableau,
        slots: &'a [Slot],
        leaf: Leaf,
        tracker: Option<&'a ProgressTracker>,
        cfg: EnumCfg,
        emit: F,
    ) -> Self {
        Self {
            tab,
            slots,
            leaf,
            cover: None,
            tracker,
            finish: true,
            cfg,
            state: tab.initial_state(),
            octagons: 0,
            nodes: 0,
            found: 0,
            stop: None,
            emit,
        }
    }

    fn run(mut self) -> SearchReport {
        if self.tab.size() > 0 {
            self.descend(0);
        }
        let outcome = self.stop.unwrap_or(SearchOutcome::Completed);
        if let (Some(t), true) = (self.tracker, self.finish) {
            t.set_finished();
        }
        tracing::debug!(nodes = self.nodes, solutions = self.found, ?outcome, "tree search done");
        SearchReport {
            outcome,
            nodes: self.nodes,
            solutions: self.found,
        }
    }

    fn cancelled(&mut self) -> bool {
        if self.stop.is_some() {
            return true;
        }
        if self.nodes % self.cfg.poll_interval.max(1) == 0
            && self.tracker.is_some_and(ProgressTracker::is_cancelled)
        {
            self.stop = Some(SearchOutcome::Cancelled);
        }
        self.stop.is_some()
    }

    fn descend(&mut self, depth: usize) {
        if depth == self.slots.len() {
            self.accept();
            return;
        }
        let slots = self.slots;
        let slot = &slots[depth];
        let total = slot.patterns.len();
        for (i, pattern) in slot.patterns.iter().enumerate() {
            if depth == 0 {
                if let Some(t) = self.tracker {
                    t.set_percent(100.0 * i as f64 / total.max(1) as f64);
                    if t.is_cancelled() {
                        self.stop = Some(SearchOutcome::Cancelled);
                    }
                }
            }
            if self.cancelled() {
                return;
            }
            let oct = pattern.iter().filter(|&&c| self.tab.is_octagon(c)).count();
            if self.octagons + oct > 1 {
                continue;
            }
            for &c in &slot.columns {
                self.state[c] = if pattern.contains(&c) {
                    ColState::Positive
                } else {
                    ColState::Zero
                };
            }
            self.nodes += 1;
            if self.tab.problem(&self.state, self.cover.as_deref()).is_feasible() {
                self.octagons += oct;
                self.descend(depth + 1);
                self.octagons -= oct;
            }
            for &c in &slot.columns {
                self.state[c] = ColState::Free;
            }
        }
    }

    fn accept(&mut self) {
        let x = match self.leaf {
            Leaf::Vertex => self.vertex_at_leaf(),
            Leaf::Point => self.point_at_leaf(),
        };
        let Some(x) = x else { return };
        self.found += 1;
        if let Some(t) = self.tracker {
            t.record_solution();
        }
        if !(self.emit)(x) {
            self.stop = Some(SearchOutcome::Stopped);
        }
    }

    fn support(&self) -> Vec<usize> {
        self.state
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ColState::Positive)
            .map(|(c, _)| c)
            .collect()
    }

    fn vertex_at_leaf(&self) -> Option<Vec<BigInt>> {
        let support = self.support();
        let kernel = self.tab.support_kernel(&support);
        let [generator] = kernel.as_slice() else {
            return None;
        };
        let mut g = primitive_integer(generator);
        if g.iter().all(|v| v.is_negative()) {
            g.iter_mut().for_each(|v| *v = -v.clone());
        }
        if !g.iter().all(|v| v.is_positive()) {
            return None;
        }
        let mut x = vec![BigInt::zero(); self.tab.width()];
        for (&c, v) in support.iter().zip(g) {
            x[c] = v;
        }
        Some(x)
    }

    fn point_at_leaf(&self) -> Option<Vec<BigInt>> {
        let p = self.tab.problem(&self.state, self.cover.as_deref()).solve()?;
        Some(primitive_integer(&p))
    }
}

/// Collect every vertex ray in tableau order (used by the fundamental
/// search for its bounds). The tracker is left unfinished.
pub(crate) fn vertex_rays(
    tab: &InitialTableau,
    slots: &[Slot],
    tracker: Option<&ProgressTracker>,
    cfg: EnumCfg,
) -> (Vec<Vec<BigInt>>, SearchReport) {
    let mut rays = Vec::new();
    let mut runner = TreeRunner::new(tab, slots, Leaf::Vertex, tracker, cfg, |x| {
        rays.push(x);
        true
    });
    runner.finish = false;
    let report = runner.run();
    (rays, report)
}

/// Vertex enumeration of the admissible cone.
#[derive(Clone, Debug)]
pub struct TreeEnumeration {
    tableau: InitialTableau,
    slots: Vec<Slot>,
    cfg: EnumCfg,
}

impl TreeEnumeration {
    /// Vertex search in `coords`. With `embedded`, the embedded constraints
    /// restrict supports; otherwise every column branches on its own.
    pub fn new<C: LpSubspace, B: BanConstraint>(
        tri: &Triangulation,
        coords: Coords,
        embedded: bool,
        constraint: &C,
        ban: &B,
    ) -> Result<Self, EnumerateError> {
        let tableau = InitialTableau::new(tri, coords, constraint, ban)?;
        let policy = if embedded {
            SlotPolicy::Embedded
        } else {
            SlotPolicy::Unconstrained
        };
        let slots = tableau.slots(policy);
        Ok(Self {
            tableau,
            slots,
            cfg: EnumCfg::default(),
        })
    }

    pub fn with_cfg(mut self, cfg: EnumCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn tableau(&self) -> &InitialTableau {
        &self.tableau
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Report each vertex (coordinate order) to `on_solution` as it is
    /// found; returning false stops the search.
    pub fn run<F>(&self, tracker: Option<&ProgressTracker>, mut on_solution: F) -> SearchReport
    where
        F: FnMut(&CoordVector) -> bool,
    {
        let tab = &self.tableau;
        TreeRunner::new(tab, &self.slots, Leaf::Vertex, tracker, self.cfg, |x| {
            on_solution(&tab.to_coordinates(&x))
        })
        .run()
    }

    /// All vertices, in search order.
    pub fn collect(&self, tracker: Option<&ProgressTracker>) -> (Vec<CoordVector>, SearchReport) {
        let mut out = Vec::new();
        let report = self.run(tracker, |v| {
            out.push(v.clone());
            true
        });
        (out, report)
    }

    pub(crate) fn cfg(&self) -> EnumCfg {
        self.cfg
    }

    pub(crate) fn rays(&self, tracker: Option<&ProgressTracker>) -> (Vec<Vec<BigInt>>, SearchReport) {
        vertex_rays(&self.tableau, &self.slots, tracker, self.cfg)
    }
}

/// Find one admissible solution, if any.
///
/// In normal coordinates the solution must use at least one quad or
/// octagon, so unions of vertex links never qualify. Constraints need not
/// be subspaces here.
#[derive(Clone, Debug)]
pub struct TreeSingleSolution {
    tableau: InitialTableau,
    slots: Vec<Slot>,
    cfg: EnumCfg,
}

impl TreeSingleSolution {
    pub fn new<C: LpConstraint, B: BanConstraint>(
        tri: &Triangulation,
        coords: Coords,
        constraint: &C,
        ban: &B,
    ) -> Result<Self, EnumerateError> {
        let tableau = InitialTableau::new(tri, coords, constraint, ban)?;
        let slots = tableau.slots(SlotPolicy::Embedded);
        Ok(Self {
            tableau,
            slots,
            cfg: EnumCfg::default(),
        })
    }

    pub fn with_cfg(mut self, cfg: EnumCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn tableau(&self) -> &InitialTableau {
        &self.tableau
    }

    /// The first solution in search order, or `None` (also on cancellation;
    /// the report tells the two apart).
    pub fn find(&self, tracker: Option<&ProgressTracker>) -> (Option<CoordVector>, SearchReport) {
        let tab = &self.tableau;
        let quads = tab.quad_like();
        let mut found = None;
        let mut runner = TreeRunner::new(tab, &self.slots, Leaf::Point, tracker, self.cfg, |x| {
            found = Some(tab.to_coordinates(&x));
            false
        });
        if !quads.is_empty() {
            runner.cover = Some(quads);
        }
        let mut report = runner.run();
        if report.outcome == SearchOutcome::Stopped {
            report.outcome = SearchOutcome::Completed;
        }
        (found, report)
    }
}

/// All taut angle structures: one angle per tetrahedron equal to π.
#[derive(Clone, Debug)]
pub struct TautEnumeration {
    tableau: InitialTableau,
    slots: Vec<Slot>,
    cfg: EnumCfg,
}

impl TautEnumeration {
    pub fn new(tri: &Triangulation) -> Result<Self, EnumerateError> {
        let tableau = InitialTableau::new(tri, Coords::Angle, &NoConstraint, &BanNone)?;
        let slots = tableau.slots(SlotPolicy::Taut);
        Ok(Self {
            tableau,
            slots,
            cfg: EnumCfg::default(),
        })
    }

    pub fn with_cfg(mut self, cfg: EnumCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn tableau(&self) -> &InitialTableau {
        &self.tableau
    }

    pub fn run<F>(&self, tracker: Option<&ProgressTracker>, mut on_solution: F) -> SearchReport
    where
        F: FnMut(&CoordVector) -> bool,
    {
        let tab = &self.tableau;
        TreeRunner::new(tab, &self.slots, Leaf::Vertex, tracker, self.cfg, |x| {
            on_solution(&tab.to_coordinates(&x))
        })
        .run()
    }

    pub fn collect(&self, tracker: Option<&ProgressTracker>) -> (Vec<CoordVector>, SearchReport) {
        let mut out = Vec::new();
        let report = self.run(tracker, |v| {
            out.push(v.clone());
            true
        });
        (out, report)
    }
}
