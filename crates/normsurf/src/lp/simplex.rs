//! Phase-one simplex for exact feasibility.
//!
//! Model
//! - Variables `x` with bounds `l_j <= x_j <= u_j` (`l_j >= 0`, `u_j` optional),
//!   equality rows `a·x = b` and covering rows `c·x >= d`.
//! - Substitute `y = x - l`, add a slack per finite upper bound and a surplus
//!   per covering row, then minimise the sum of artificial variables with
//!   Bland's rule (no cycling). The problem is feasible iff that minimum is 0.
//!
//! The tableau is dense and rebuilt per call. Problems solved here are small
//! (one search node at a time), so clarity wins over incremental updates.

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::q;

/// Counters for one `solve` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LpStats {
    pub rows: usize,
    pub cols: usize,
    pub pivots: usize,
}

/// A feasibility problem over nonnegative rationals.
#[derive(Clone, Debug)]
pub struct LpProblem {
    cols: usize,
    eq: Vec<(Vec<BigRational>, BigRational)>,
    ge: Vec<(Vec<BigRational>, BigRational)>,
    lower: Vec<BigRational>,
    upper: Vec<Option<BigRational>>,
}

impl LpProblem {
    /// `cols` variables, all `>= 0`, no rows yet.
    pub fn new(cols: usize) -> Self {
        Self {
            cols,
            eq: Vec::new(),
            ge: Vec::new(),
            lower: vec![BigRational::zero(); cols],
            upper: vec![None; cols],
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `row · x = rhs`.
    pub fn add_equality(&mut self, row: Vec<BigRational>, rhs: BigRational) -> &mut Self {
        debug_assert_eq!(row.len(), self.cols);
        self.eq.push((row, rhs));
        self
    }

    /// `row · x >= rhs`.
    pub fn add_at_least(&mut self, row: Vec<BigRational>, rhs: BigRational) -> &mut Self {
        debug_assert_eq!(row.len(), self.cols);
        self.ge.push((row, rhs));
        self
    }

    /// Raise the lower bound of `x_j` (never lowers it).
    pub fn at_least(&mut self, j: usize, value: BigRational) -> &mut Self {
        if value > self.lower[j] {
            self.lower[j] = value;
        }
        self
    }

    /// Tighten the upper bound of `x_j`.
    pub fn at_most(&mut self, j: usize, value: BigRational) -> &mut Self {
        let tighter = match &self.upper[j] {
            Some(u) => value < *u,
            None => true,
        };
        if tighter {
            self.upper[j] = Some(value);
        }
        self
    }

    /// `x_j = value`.
    pub fn fix(&mut self, j: usize, value: BigRational) -> &mut Self {
        self.at_least(j, value.clone());
        self.at_most(j, value)
    }

    /// Shorthand for `fix(j, 0)`.
    pub fn zero(&mut self, j: usize) -> &mut Self {
        self.at_most(j, BigRational::zero())
    }

    pub fn is_feasible(&self) -> bool {
        self.solve().is_some()
    }

    /// A feasible point, or `None` if there is none.
    pub fn solve(&self) -> Option<Vec<BigRational>> {
        self.solve_with_stats().0
    }

    pub fn solve_with_stats(&self) -> (Option<Vec<BigRational>>, LpStats) {
        let mut stats = LpStats::default();
        // Bounds first: fixed columns drop out, crossed bounds are infeasible.
        let mut free: Vec<usize> = Vec::with_capacity(self.cols);
        for j in 0..self.cols {
            match &self.upper[j] {
                Some(u) if *u < self.lower[j] => return (None, stats),
                Some(u) if *u == self.lower[j] => {}
                _ => free.push(j),
            }
        }

        // Constant parts after substituting x = l + y.
        let shift = |row: &[BigRational]| -> BigRational {
            row.iter()
                .zip(&self.lower)
                .filter(|(a, l)| !a.is_zero() && !l.is_zero())
                .map(|(a, l)| a * l)
                .sum()
        };

        let boxed: Vec<(usize, BigRational)> = free
            .iter()
            .enumerate()
            .filter_map(|(k, &j)| {
                self.upper[j]
                    .as_ref()
                    .map(|u| (k, u - &self.lower[j]))
            })
            .collect();

        let nf = free.len();
        let n_struct = nf + boxed.len() + self.ge.len();
        let mut rows: Vec<Vec<BigRational>> = Vec::new();
        let mut rhs: Vec<BigRational> = Vec::new();
        let mut needs_artificial: Vec<bool> = Vec::new();
        let mut basis: Vec<usize> = Vec::new();

        for (row, b) in &self.eq {
            let mut t = vec![BigRational::zero(); n_struct];
            for (k, &j) in free.iter().enumerate() {
                t[k] = row[j].clone();
            }
            rows.push(t);
            rhs.push(b - shift(row));
            needs_artificial.push(true);
        }
        for (s, (k, width)) in boxed.iter().enumerate() {
            let mut t = vec![BigRational::zero(); n_struct];
            t[*k] = q(1);
            t[nf + s] = q(1);
            rows.push(t);
            rhs.push(width.clone());
            // The slack starts basic.
            needs_artificial.push(false);
        }
        for (g, (row, d)) in self.ge.iter().enumerate() {
            let mut t = vec![BigRational::zero(); n_struct];
            for (k, &j) in free.iter().enumerate() {
                t[k] = row[j].clone();
            }
            t[nf + boxed.len() + g] = q(-1);
            rows.push(t);
            rhs.push(d - shift(row));
            needs_artificial.push(true);
        }

        // Rows with a nonnegative right-hand side; artificials fill the basis.
        for (t, b) in rows.iter_mut().zip(rhs.iter_mut()) {
            if b.is_negative() {
                for x in t.iter_mut() {
                    *x = -x.clone();
                }
                *b = -b.clone();
            }
        }
        let n_art = needs_artificial.iter().filter(|&&a| a).count();
        let width = n_struct + n_art;
        let mut next_art = n_struct;
        for (i, t) in rows.iter_mut().enumerate() {
            t.resize(width, BigRational::zero());
            if needs_artificial[i] {
                t[next_art] = q(1);
                basis.push(next_art);
                next_art += 1;
            } else {
                // Boxed slack rows come after the equalities, in order.
                let s = i - self.eq.len();
                basis.push(nf + s);
            }
        }
        stats.rows = rows.len();
        stats.cols = width;

        // Reduced costs of the phase-one objective (sum of artificials).
        let mut cost = vec![BigRational::zero(); width];
        for (i, t) in rows.iter().enumerate() {
            if !needs_artificial[i] {
                continue;
            }
            for (c, x) in cost.iter_mut().zip(t).take(n_struct) {
                if !x.is_zero() {
                    *c -= x;
                }
            }
        }

        loop {
            // Bland: smallest improving column, artificials never re-enter.
            let Some(e) = (0..n_struct).find(|&j| cost[j].is_negative()) else {
                break;
            };
            let mut leave: Option<(usize, BigRational)> = None;
            for (i, t) in rows.iter().enumerate() {
                if !t[e].is_positive() {
                    continue;
                }
                let ratio = &rhs[i] / &t[e];
                let better = match &leave {
                    None => true,
                    Some((li, lr)) => ratio < *lr || (ratio == *lr && basis[i] < basis[*li]),
                };
                if better {
                    leave = Some((i, ratio));
                }
            }
            // Phase one is bounded below by zero, so a pivot row always exists.
            let Some((r, _)) = leave else { break };
            pivot(&mut rows, &mut rhs, &mut cost, r, e);
            basis[r] = e;
            stats.pivots += 1;
        }

        // Feasible iff no artificial is left basic at a positive level.
        let stuck = basis
            .iter()
            .zip(&rhs)
            .any(|(&b, v)| b >= n_struct && !v.is_zero());
        if stuck {
            tracing::trace!(?stats, "phase one infeasible");
            return (None, stats);
        }

        let mut y = vec![BigRational::zero(); width];
        for (i, &b) in basis.iter().enumerate() {
            y[b] = rhs[i].clone();
        }
        let mut x = self.lower.clone();
        for (k, &j) in free.iter().enumerate() {
            x[j] += &y[k];
        }
        tracing::trace!(?stats, "phase one feasible");
        (Some(x), stats)
    }
}

fn pivot(
    rows: &mut [Vec<BigRational>],
    rhs: &mut [BigRational],
    cost: &mut [BigRational],
    r: usize,
    e: usize,
) {
    let inv = rows[r][e].recip();
    for x in rows[r].iter_mut() {
        if !x.is_zero() {
            *x *= &inv;
        }
    }
    rhs[r] *= &inv;
    let prow = rows[r].clone();
    let prhs = rhs[r].clone();
    for (i, t) in rows.iter_mut().enumerate() {
        if i == r || t[e].is_zero() {
            continue;
        }
        let f = t[e].clone();
        for (x, p) in t.iter_mut().zip(&prow) {
            if !p.is_zero() {
                *x -= &f * p;
            }
        }
        rhs[i] -= &f * &prhs;
    }
    if !cost[e].is_zero() {
        let f = cost[e].clone();
        for (x, p) in cost.iter_mut().zip(&prow) {
            if !p.is_zero() {
                *x -= &f * p;
            }
        }
    }
}
