//! On-disk cache of statement responses.
//!
//! The market-data API returns each statement as a JSON array of objects, one
//! per period, newest first. Responses are cached as
//! `<dir>/<SYMBOL>_<statement-slug>.json`; this module turns them back into
//! statement tables. Fetching is handled elsewhere.

use crate::{
    Result,
    statements::{CompanyStatements, DATE, StatementKind, Universe},
};
use polars::prelude::*;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Directory of cached statement responses.
#[derive(Debug, Clone)]
pub struct StatementCache {
    dir: PathBuf,
}

impl StatementCache {
    /// Cache rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `symbol`'s statement of the given kind.
    pub fn path(&self, symbol: &str, kind: StatementKind) -> PathBuf {
        self.dir.join(format!("{symbol}_{}.json", kind.slug()))
    }

    /// Load one statement. A missing file yields an empty table.
    pub fn load_statement(&self, symbol: &str, kind: StatementKind) -> Result<DataFrame> {
        let path = self.path(symbol, kind);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(symbol, statement = %kind, path = %path.display(), "cached statement not found");
                return Ok(DataFrame::empty());
            }
            Err(err) => return Err(err.into()),
        };

        let table = parse_statement(&raw, kind)?;
        debug!(symbol, statement = %kind, periods = table.height(), "loaded statement");
        Ok(table)
    }

    /// Load all three statements of `symbol`.
    pub fn load(&self, symbol: &str) -> Result<CompanyStatements> {
        StatementKind::ALL
            .into_iter()
            .try_fold(CompanyStatements::new(symbol), |company, kind| {
                Ok(company.with_statement(kind, self.load_statement(symbol, kind)?))
            })
    }

    /// Load every symbol, preserving order.
    pub fn load_universe<S: AsRef<str>>(&self, symbols: &[S]) -> Result<Universe> {
        symbols.iter().map(|s| self.load(s.as_ref())).collect()
    }
}

/// Parse a statement response into a table.
///
/// Only `date` and the fields listed by [`StatementKind::fields`] are kept.
/// Values that are absent or not numbers become nulls.
pub fn parse_statement(json: &str, kind: StatementKind) -> Result<DataFrame> {
    let rows: Vec<Map<String, Value>> = serde_json::from_str(json)?;
    if rows.is_empty() {
        return Ok(DataFrame::empty());
    }

    let dates: Vec<Option<&str>> = rows
        .iter()
        .map(|row| row.get(DATE).and_then(Value::as_str))
        .collect();

    let mut columns = vec![Column::new(DATE.into(), dates)];
    columns.extend(kind.fields().iter().map(|field| {
        let values: Vec<Option<f64>> = rows
            .iter()
            .map(|row| row.get(*field).and_then(Value::as_f64))
            .collect();
        Column::new((*field).into(), values)
    }));

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScoreError;

    const CASH_FLOW: &str = r#"[
        {"date": "2023-06-30", "symbol": "MSFT", "operatingCashFlow": 87582000000},
        {"date": "2022-06-30", "symbol": "MSFT", "operatingCashFlow": null}
    ]"#;

    #[test]
    fn test_parse_statement() {
        let table = parse_statement(CASH_FLOW, StatementKind::CashFlow).unwrap();

        assert_eq!(table.shape(), (2, 2));
        let ocf = table.column("operatingCashFlow").unwrap().f64().unwrap();
        assert_eq!(ocf.get(0), Some(87_582_000_000.0));
        assert!(ocf.get(1).is_none());
    }

    #[test]
    fn test_parse_statement_fills_absent_fields() {
        let table = parse_statement(
            r#"[{"date": "2023-06-30", "revenue": 10}]"#,
            StatementKind::IncomeStatement,
        )
        .unwrap();

        assert_eq!(table.width(), 1 + StatementKind::IncomeStatement.fields().len());
        assert!(table.column("netIncome").unwrap().f64().unwrap().get(0).is_none());
    }

    #[test]
    fn test_parse_statement_rejects_malformed_json() {
        let err = parse_statement("{not json", StatementKind::CashFlow).unwrap_err();
        assert!(matches!(err, ScoreError::Json(_)));
    }

    #[test]
    fn test_load_missing_files_gives_empty_statements() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("MSFT_cash-flow-statement.json"), CASH_FLOW).unwrap();

        let company = StatementCache::new(dir.path()).load("MSFT").unwrap();

        assert!(company.is_empty(StatementKind::BalanceSheet));
        assert!(company.is_empty(StatementKind::IncomeStatement));
        assert_eq!(company.statement(StatementKind::CashFlow).height(), 2);
    }
}
