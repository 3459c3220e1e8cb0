//! Earnings quality and financial strength scores
//!
//! The Beneish M-Score flags likely earnings manipulation; the Piotroski
//! F-Score counts year-over-year improvements in fundamentals.

pub mod beneish_m;
pub mod piotroski;

pub use beneish_m::{BENEISH_THRESHOLD, BeneishM};
pub use piotroski::Piotroski;
