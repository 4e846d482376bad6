//! Fundamental (Hilbert basis) solutions of the admissible region.
//!
//! Every fundamental solution lies in the cone of some admissible face and
//! is a combination of that face's vertex rays with coefficients below one,
//! so the sum of all vertex rays bounds each column. Integer points under
//! those bounds are enumerated column by column with exact LP pruning, and a
//! point is kept iff no other nonzero admissible point lies below it.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::coords::{CoordVector, Coords};
use crate::tri::Triangulation;

use super::ban::BanConstraint;
use super::constraint::LpSubspace;
use super::progress::ProgressTracker;
use super::tableau::InitialTableau;
use super::tree::TreeEnumeration;
use super::types::ColState;
use super::{EnumCfg, EnumerateError, SearchOutcome, SearchReport};

/// Hilbert basis search, seeded by a vertex enumeration.
#[derive(Clone, Debug)]
pub struct FundamentalEnumeration {
    vertices: TreeEnumeration,
    embedded: bool,
}

impl FundamentalEnumeration {
    pub fn new<C: LpSubspace, B: BanConstraint>(
        tri: &Triangulation,
        coords: Coords,
        embedded: bool,
        constraint: &C,
        ban: &B,
    ) -> Result<Self, EnumerateError> {
        if coords.is_angle() {
            return Err(EnumerateError::UnsupportedMode {
                mode: "fundamental",
                coords,
            });
        }
        Ok(Self {
            vertices: TreeEnumeration::new(tri, coords, embedded, constraint, ban)?,
            embedded,
        })
    }

    pub fn with_cfg(mut self, cfg: EnumCfg) -> Self {
        self.vertices = self.vertices.with_cfg(cfg);
        self
    }

    pub fn tableau(&self) -> &InitialTableau {
        self.vertices.tableau()
    }

    /// Report fundamental solutions in lexicographic tableau order. The
    /// list is only final once the bounded search completes, so solutions
    /// are reported after it; a cancelled search reports none.
    pub fn run<F>(&self, tracker: Option<&ProgressTracker>, on_solution: F) -> SearchReport
    where
        F: FnMut(&CoordVector) -> bool,
    {
        let report = self.search(tracker, on_solution);
        if let Some(t) = tracker {
            t.set_finished();
        }
        tracing::debug!(
            nodes = report.nodes,
            solutions = report.solutions,
            outcome = ?report.outcome,
            "fundamental search done"
        );
        report
    }

    fn search<F>(&self, tracker: Option<&ProgressTracker>, mut on_solution: F) -> SearchReport
    where
        F: FnMut(&CoordVector) -> bool,
    {
        let (rays, report) = self.vertices.rays(tracker);
        if report.outcome != SearchOutcome::Completed {
            return report;
        }
        let tab = self.vertices.tableau();
        let mut bounds = vec![BigInt::zero(); tab.width()];
        for ray in &rays {
            for (b, v) in bounds.iter_mut().zip(ray) {
                *b += v;
            }
        }
        tracing::debug!(rays = rays.len(), "fundamental bounds from vertex rays");

        let mut runner = BoxRunner {
            tab,
            embedded: self.embedded,
            bounds,
            values: Vec::with_capacity(tab.dimension()),
            tracker,
            poll: self.vertices.cfg().poll_interval.max(1),
            nodes: 0,
            cancelled: false,
            candidates: Vec::new(),
        };
        runner.descend();
        let nodes = report.nodes + runner.nodes;
        if runner.cancelled {
            return SearchReport {
                outcome: SearchOutcome::Cancelled,
                nodes,
                solutions: 0,
            };
        }

        let candidates = runner.candidates;
        let mut solutions = 0;
        let mut outcome = SearchOutcome::Completed;
        for (i, x) in candidates.iter().enumerate() {
            let reducible = candidates
                .iter()
                .enumerate()
                .any(|(j, y)| j != i && y.iter().zip(x).all(|(a, b)| a <= b));
            if reducible {
                continue;
            }
            solutions += 1;
            if let Some(t) = tracker {
                t.record_solution();
            }
            if !on_solution(&tab.to_coordinates(x)) {
                outcome = SearchOutcome::Stopped;
                break;
            }
        }
        SearchReport {
            outcome,
            nodes,
            solutions,
        }
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

/// Column-by-column search over the bounding box.
struct BoxRunner<'a> {
    tab: &'a InitialTableau,
    embedded: bool,
    bounds: Vec<BigInt>,
    /// Values fixed so far, one per leading coordinate column.
    values: Vec<BigInt>,
    tracker: Option<&'a ProgressTracker>,
    poll: usize,
    nodes: usize,
    cancelled: bool,
    candidates: Vec<Vec<BigInt>>,
}

impl BoxRunner<'_> {
    fn descend(&mut self) {
        let c = self.values.len();
        if c == self.tab.dimension() {
            self.leaf();
            return;
        }
        let mut v = BigInt::zero();
        while v <= self.bounds[c] {
            if self.nodes % self.poll == 0 {
                self.cancelled |= self.tracker.is_some_and(ProgressTracker::is_cancelled);
            }
            if self.cancelled {
                return;
            }
            if !v.is_zero() && !self.may_be_positive(c) {
                break;
            }
            self.nodes += 1;
            self.values.push(v.clone());
            if self.feasible() {
                self.descend();
            }
            self.values.pop();
            v += 1;
        }
    }

    /// Bans, exclusive groups and the one-octagon rule against the fixed
    /// prefix.
    fn may_be_positive(&self, c: usize) -> bool {
        if self.tab.ban().is_banned(c) {
            return false;
        }
        if self.embedded {
            let clash = self.tab.groups().iter().any(|g| {
                g.contains(&c) && g.iter().any(|&o| o < c && !self.values[o].is_zero())
            });
            if clash {
                return false;
            }
        }
        if self.tab.is_octagon(c) {
            let used = (0..c).any(|o| self.tab.is_octagon(o) && !self.values[o].is_zero());
            if used {
                return false;
            }
        }
        true
    }

    fn feasible(&self) -> bool {
        let tab = self.tab;
        let mut state = tab.initial_state();
        // Relax forced positivity: bounds below do the work here.
        for s in state.iter_mut() {
            if *s == ColState::Positive {
                *s = ColState::Free;
            }
        }
        let mut lp = tab.bounded_problem(&state);
        for (c, v) in self.values.iter().enumerate() {
            lp.fix(c, BigRational::from_integer(v.clone()));
        }
        for c in self.values.len()..tab.dimension() {
            lp.at_most(c, BigRational::from_integer(self.bounds[c].clone()));
        }
        lp.is_feasible()
    }

    fn leaf(&mut self) {
        if self.values.iter().all(Zero::is_zero) {
            return;
        }
        let mut x = self.values.clone();
        x.resize(self.tab.width(), BigInt::zero());
        if self.tab.satisfies(&x) {
            self.candidates.push(x);
        }
    }
}
