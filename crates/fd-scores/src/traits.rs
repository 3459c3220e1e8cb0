//! Core trait definitions for scores.
//!
//! All calculators implement the [`Score`] trait, which provides a unified
//! interface for computing per-period scores from a company's statements.

use crate::{
    Result,
    registry::ScoreCategory,
    statements::{CompanyStatements, Requirement, StatementKind},
};
use polars::prelude::*;

/// A per-period score computed from financial statements.
///
/// Implementations are pure: the same statements always produce the same
/// frame, and no state is shared between companies.
pub trait Score: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this score, also the name of its output column.
    ///
    /// Should be snake_case and stable across versions.
    fn name(&self) -> &str;

    /// Column header used when the score is exported, e.g. `Altman Z-Score`.
    fn display_name(&self) -> &str;

    /// Human-readable description of what this score measures.
    fn description(&self) -> &str;

    /// Score category for grouping and analysis.
    fn category(&self) -> ScoreCategory;

    /// Statement columns read by the calculator.
    fn requirements(&self) -> &[Requirement];

    /// Named intermediate series emitted next to the score.
    fn components(&self) -> &[&str] {
        &[]
    }

    /// Number of periods needed before every term is defined.
    fn lookback(&self) -> usize;

    /// Conventional cut-off separating flagged from unflagged scores, if any.
    fn threshold(&self) -> Option<f64> {
        None
    }

    /// Statements that must be non-empty for the score to be computed.
    fn statements(&self) -> Vec<StatementKind> {
        self.requirements().iter().map(|(kind, _)| *kind).collect()
    }

    /// Compute the score over an aligned single-company frame.
    ///
    /// `data` must be sorted ascending by `date` and hold every column listed
    /// in [`Score::requirements`]. Returns one row per input period with
    /// columns `date`, the score name, and each of [`Score::components`].
    fn compute_raw(&self, data: &LazyFrame) -> Result<DataFrame>;

    /// Align a company's statements and compute the score.
    fn compute(&self, company: &CompanyStatements) -> Result<DataFrame> {
        let data = company.aligned(self.requirements())?;
        self.compute_raw(&data)
    }
}

/// Marker trait for score configuration types.
///
/// All config types should implement Default, Clone, Send, Sync, and Debug.
pub trait ScoreConfig: Default + Clone + Send + Sync + std::fmt::Debug {}

/// A score that supports runtime configuration.
pub trait ConfigurableScore: Score {
    /// Configuration type for this score.
    type Config: ScoreConfig;

    /// Create a new score with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}

/// Blanket implementation for any type that satisfies the trait bounds.
impl<T: Default + Clone + Send + Sync + std::fmt::Debug> ScoreConfig for T {}
