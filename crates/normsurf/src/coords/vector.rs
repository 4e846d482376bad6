//! Exact integer coordinate vectors.

use std::ops::{Index, IndexMut};

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

/// A coordinate vector with arbitrary-precision entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordVector(Vec<BigInt>);

impl CoordVector {
    pub fn zeros(len: usize) -> Self {
        Self(vec![BigInt::zero(); len])
    }

    pub fn from_i64(entries: &[i64]) -> Self {
        Self(entries.iter().map(|&x| BigInt::from(x)).collect())
    }

    pub fn from_entries(entries: Vec<BigInt>) -> Self {
        Self(entries)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Zero::is_zero)
    }

    pub fn entries(&self) -> &[BigInt] {
        &self.0
    }

    pub fn into_entries(self) -> Vec<BigInt> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BigInt> {
        self.0.iter()
    }

    /// Indices of nonzero entries.
    pub fn support(&self) -> Vec<usize> {
        (0..self.0.len()).filter(|&i| !self.0[i].is_zero()).collect()
    }

    pub fn is_nonnegative(&self) -> bool {
        self.0.iter().all(|x| !x.is_negative())
    }

    /// Dot product with a small-integer row.
    pub fn dot_i64<'a, I>(&self, row: I) -> BigInt
    where
        I: IntoIterator<Item = &'a i64>,
    {
        self.0
            .iter()
            .zip(row)
            .filter(|(_, c)| **c != 0)
            .map(|(x, &c)| x * c)
            .sum()
    }

    /// Componentwise `self <= other`.
    pub fn le(&self, other: &CoordVector) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// Entries as `i64` when they all fit.
    pub fn to_i64(&self) -> Option<Vec<i64>> {
        use num_traits::ToPrimitive;
        self.0.iter().map(ToPrimitive::to_i64).collect()
    }
}

impl Index<usize> for CoordVector {
    type Output = BigInt;
    #[inline]
    fn index(&self, i: usize) -> &BigInt {
        &self.0[i]
    }
}

impl IndexMut<usize> for CoordVector {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut BigInt {
        &mut self.0[i]
    }
}

impl From<Vec<BigInt>> for CoordVector {
    fn from(v: Vec<BigInt>) -> Self {
        Self(v)
    }
}

impl std::fmt::Display for CoordVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, ")")
    }
}
