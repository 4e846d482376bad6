//! Exact row reduction and kernels.

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::q;

/// Rows of a small-integer matrix as exact rationals.
pub fn rational_rows(m: &DMatrix<i64>) -> Vec<Vec<BigRational>> {
    (0..m.nrows())
        .map(|r| m.row(r).iter().map(|&x| q(x)).collect())
        .collect()
}

/// Reduced row echelon form in place. Returns the pivot columns; rows past
/// the last pivot are left zero.
pub fn rref(rows: &mut [Vec<BigRational>]) -> Vec<usize> {
    let ncols = rows.first().map_or(0, Vec::len);
    let mut pivots = Vec::new();
    let mut r = 0;
    for c in 0..ncols {
        if r == rows.len() {
            break;
        }
        let Some(p) = (r..rows.len()).find(|&i| !rows[i][c].is_zero()) else {
            continue;
        };
        rows.swap(r, p);
        let inv = rows[r][c].recip();
        for x in rows[r][c..].iter_mut() {
            *x *= &inv;
        }
        let pivot_row = rows[r].clone();
        for (i, row) in rows.iter_mut().enumerate() {
            if i == r || row[c].is_zero() {
                continue;
            }
            let f = row[c].clone();
            for (x, p) in row[c..].iter_mut().zip(&pivot_row[c..]) {
                if !p.is_zero() {
                    *x -= &f * p;
                }
            }
        }
        pivots.push(c);
        r += 1;
    }
    pivots
}

/// Exact rank of an integer matrix.
pub fn rank(m: &DMatrix<i64>) -> usize {
    let mut rows = rational_rows(m);
    rref(&mut rows).len()
}

/// Indices of a maximal linearly independent subset of rows, chosen greedily
/// in row order.
pub fn independent_rows(m: &DMatrix<i64>) -> Vec<usize> {
    let mut basis: Vec<(usize, Vec<BigRational>)> = Vec::new();
    let mut keep = Vec::new();
    for (idx, mut row) in rational_rows(m).into_iter().enumerate() {
        for (pc, b) in &basis {
            if row[*pc].is_zero() {
                continue;
            }
            let f = row[*pc].clone();
            for (x, y) in row.iter_mut().zip(b) {
                if !y.is_zero() {
                    *x -= &f * y;
                }
            }
        }
        let Some(pc) = row.iter().position(|x| !x.is_zero()) else {
            continue;
        };
        let inv = row[pc].recip();
        for x in row.iter_mut() {
            *x *= &inv;
        }
        basis.push((pc, row));
        keep.push(idx);
    }
    keep
}

/// Basis of `{ x : rows · x = 0 }` in dimension `ncols`, one vector per
/// free column of the reduced form.
pub fn kernel_basis(rows: &[Vec<BigRational>], ncols: usize) -> Vec<Vec<BigRational>> {
    let mut r = rows.to_vec();
    let pivots = rref(&mut r);
    let mut is_pivot = vec![false; ncols];
    for &c in &pivots {
        is_pivot[c] = true;
    }
    (0..ncols)
        .filter(|&f| !is_pivot[f])
        .map(|f| {
            let mut v = vec![BigRational::zero(); ncols];
            v[f] = BigRational::one();
            for (i, &pc) in pivots.iter().enumerate() {
                v[pc] = -r[i][f].clone();
            }
            v
        })
        .collect()
}

/// Scale a rational vector to the primitive integer vector on the same ray
/// (clear denominators, divide by the gcd). The sign is preserved.
pub fn primitive_integer(v: &[BigRational]) -> Vec<BigInt> {
    let denom = v
        .iter()
        .filter(|x| !x.is_zero())
        .fold(BigInt::one(), |acc, x| acc.lcm(x.denom()));
    let scaled: Vec<BigInt> = v
        .iter()
        .map(|x| (x.numer() * &denom) / x.denom())
        .collect();
    let g = scaled.iter().fold(BigInt::zero(), |acc, x| acc.gcd(x));
    if g.is_zero() || g.is_one() {
        return scaled;
    }
    scaled.into_iter().map(|x| x / &g).collect()
}
