//! Exact linear algebra and linear programming over `BigRational`.
//!
//! Purpose
//! - Everything the enumeration engine decides (feasibility of a search node,
//!   extremality of a candidate ray, rank of the matching equations) is
//!   decided here, exactly. No floating point is involved anywhere.
//!
//! Contents
//! - `linalg`: row reduction, rank, kernels, independent row selection and
//!   scaling of rational rays to primitive integer vectors.
//! - `simplex`: a phase-one simplex (Bland's rule) for feasibility of
//!   `A x = b`, bounds `l <= x <= u`, and extra `c·x >= d` rows.

mod linalg;
mod simplex;

pub use linalg::{
    independent_rows, kernel_basis, primitive_integer, rank, rational_rows, rref,
};
pub use simplex::{LpProblem, LpStats};

use num_bigint::BigInt;
use num_rational::BigRational;

/// Small integer to exact rational.
#[inline]
pub fn q(x: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(x))
}
