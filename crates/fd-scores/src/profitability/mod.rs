//! Profitability decompositions

pub mod dupont;

pub use dupont::DuPont;
