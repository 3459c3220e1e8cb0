//! Safe arithmetic helpers shared by the score calculators.
//!
//! All helpers build polars expressions that run over a single company's
//! statements sorted ascending by date, so "previous period" always means
//! row `i - 1`.
//!
//! Two simplifying policies live here and are applied on purpose:
//!
//! - an undefined ratio (zero denominator, infinite or NaN result) is
//!   replaced by `0` rather than propagated;
//! - ratios produced by [`safe_ratio`] are rounded to 2 decimals before they
//!   are combined into a higher-level score.
//!
//! Absent values (nulls, e.g. the first `k` rows of [`previous`]) are left
//! absent; each calculator decides how to fill them.

use polars::prelude::*;

/// Number of decimals kept by [`safe_ratio`] and [`round2`].
pub const RATIO_DECIMALS: u32 = 2;

/// Value of `expr` `k` periods earlier.
///
/// Null for the first `k` rows of the frame.
pub fn previous(expr: Expr, k: i64) -> Expr {
    expr.shift(lit(k))
}

/// Replace infinite and NaN values with `0`, leaving nulls untouched.
pub fn guard(expr: Expr) -> Expr {
    when(expr.clone().is_infinite().or(expr.clone().is_nan()))
        .then(lit(0.0))
        .otherwise(expr)
}

/// Report every undefined value of `expr` (infinite, NaN or null) as NaN.
pub fn nan_if_undefined(expr: Expr) -> Expr {
    when(expr.clone().is_infinite())
        .then(lit(f64::NAN))
        .otherwise(expr)
        .fill_null(lit(f64::NAN))
}

/// `numerator / denominator`, zero-guarded and rounded to 2 decimals.
///
/// A zero denominator or any non-finite result yields `0` for that period.
pub fn safe_ratio(numerator: Expr, denominator: Expr) -> Expr {
    guard(numerator / denominator).round(RATIO_DECIMALS)
}

/// Round to 2 decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scalar counterpart of [`safe_ratio`].
pub fn safe_ratio_value(numerator: f64, denominator: f64) -> f64 {
    let ratio = numerator / denominator;
    if ratio.is_finite() { round2(ratio) } else { 0.0 }
}
