//! Long-format aggregation of per-company scores.
//!
//! Runs one score over every company of a [`Universe`] and stacks the results
//! into a single table sorted by period date. Ties keep universe order.

use crate::{
    Result, Score,
    statements::{DATE, SYMBOL, Universe},
};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// One company's score for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    /// Ticker symbol
    pub symbol: String,
    /// Report date of the period
    pub date: String,
    /// Score value, NaN when undefined
    pub value: f64,
}

/// Result of running one score over a universe.
#[derive(Debug, Clone)]
pub struct Aggregated {
    /// Score name, also the value column of [`Aggregated::scores`]
    pub name: String,
    /// Export header of the value column
    pub display_name: String,
    /// Columns `symbol`, `date` and the score
    pub scores: DataFrame,
    /// Columns `symbol`, `date` and one per component, when the score has any
    pub components: Option<DataFrame>,
    /// Companies skipped for missing input, in universe order
    pub skipped: Vec<String>,
}

impl Aggregated {
    /// Number of score rows.
    pub fn len(&self) -> usize {
        self.scores.height()
    }

    /// Whether no company produced a row.
    pub fn is_empty(&self) -> bool {
        self.scores.height() == 0
    }

    /// Score rows as records, in table order.
    pub fn records(&self) -> Result<Vec<ScoreRecord>> {
        let symbols = self.scores.column(SYMBOL)?.str()?;
        let dates = self.scores.column(DATE)?.str()?;
        let values = self.scores.column(&self.name)?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        Ok(symbols
            .into_iter()
            .zip(dates.into_iter())
            .zip(values.into_iter())
            .map(|((symbol, date), value)| ScoreRecord {
                symbol: symbol.unwrap_or_default().to_string(),
                date: date.unwrap_or_default().to_string(),
                value: value.unwrap_or(f64::NAN),
            })
            .collect())
    }

    /// Most recent record of `symbol`, if any.
    pub fn latest(&self, symbol: &str) -> Result<Option<ScoreRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .rev()
            .find(|r| r.symbol == symbol))
    }
}

/// Run `score` over every company of `universe`.
///
/// Companies missing a required statement or column, or repeating a period,
/// are skipped with a warning; any other error aborts the aggregation.
pub fn aggregate(score: &dyn Score, universe: &Universe) -> Result<Aggregated> {
    let mut frames = Vec::with_capacity(universe.len());
    let mut skipped = Vec::new();

    for company in universe {
        let computed = company
            .ensure_present(&score.statements())
            .and_then(|()| score.compute(company));

        match computed {
            Ok(frame) => {
                debug!(
                    score = score.name(),
                    symbol = company.symbol(),
                    periods = frame.height(),
                    "computed"
                );
                frames.push(frame.lazy().with_column(lit(company.symbol()).alias(SYMBOL)));
            }
            Err(err) if err.is_missing_input() => {
                warn!(score = score.name(), symbol = company.symbol(), %err, "skipping company");
                skipped.push(company.symbol().to_string());
            }
            Err(err) => return Err(err),
        }
    }

    let score_columns = vec![col(SYMBOL), col(DATE), col(score.name())];
    let mut component_columns = vec![col(SYMBOL), col(DATE)];
    component_columns.extend(score.components().iter().map(|c| col(*c)));

    let (scores, components) = if frames.is_empty() {
        (
            empty_table(&[score.name()])?,
            (!score.components().is_empty())
                .then(|| empty_table(score.components()))
                .transpose()?,
        )
    } else {
        let stacked = concat(frames, UnionArgs::default())?
            .sort([DATE], SortMultipleOptions::default().with_maintain_order(true))
            .collect()?;
        let components = if score.components().is_empty() {
            None
        } else {
            Some(stacked.clone().lazy().select(component_columns).collect()?)
        };
        (stacked.lazy().select(score_columns).collect()?, components)
    };

    info!(
        score = score.name(),
        rows = scores.height(),
        skipped = skipped.len(),
        "aggregated"
    );

    Ok(Aggregated {
        name: score.name().to_string(),
        display_name: score.display_name().to_string(),
        scores,
        components,
        skipped,
    })
}

fn empty_table(value_columns: &[&str]) -> Result<DataFrame> {
    let mut columns = vec![
        Column::new(SYMBOL.into(), Vec::<String>::new()),
        Column::new(DATE.into(), Vec::<String>::new()),
    ];
    columns.extend(
        value_columns
            .iter()
            .map(|c| Column::new((*c).into(), Vec::<f64>::new())),
    );
    Ok(DataFrame::new(columns)?)
}
