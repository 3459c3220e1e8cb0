//! Financial statement tables and period alignment.
//!
//! A company owns one table per [`StatementKind`], each with a `date` column
//! and one numeric column per reported field, named the way the market-data
//! API reports them (`totalAssets`, `netIncome`, ...). Calculators never read
//! these tables directly; they receive an aligned frame built by
//! [`CompanyStatements::aligned`].

use crate::{Result, ScoreError};
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column holding the report date of each period.
pub const DATE: &str = "date";

/// Column holding the ticker symbol in aggregated outputs.
pub const SYMBOL: &str = "symbol";

/// Kind of financial statement.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Balance sheet
    #[display("balance sheet")]
    BalanceSheet,
    /// Income statement
    #[display("income statement")]
    IncomeStatement,
    /// Cash flow statement
    #[display("cash flow statement")]
    CashFlow,
}

impl StatementKind {
    /// All statement kinds, in the order they are fetched and cached.
    pub const ALL: [Self; 3] = [Self::BalanceSheet, Self::IncomeStatement, Self::CashFlow];

    /// Identifier used by the market-data API and the on-disk cache.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet-statement",
            Self::IncomeStatement => "income-statement",
            Self::CashFlow => "cash-flow-statement",
        }
    }

    /// Numeric fields read from this statement by any calculator.
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::BalanceSheet => &[
                "totalAssets",
                "totalLiabilities",
                "totalCurrentAssets",
                "totalCurrentLiabilities",
                "retainedEarnings",
                "totalEquity",
                "longTermDebt",
                "preferredStock",
                "commonStock",
                "netReceivables",
                "propertyPlantEquipmentNet",
                "shortTermInvestments",
                "longTermInvestments",
            ],
            Self::IncomeStatement => &[
                "revenue",
                "operatingIncome",
                "netIncome",
                "incomeBeforeTax",
                "interestExpense",
                "ebitda",
                "costOfRevenue",
                "depreciationAndAmortization",
                "sellingGeneralAndAdministrativeExpenses",
                "totalOtherIncomeExpensesNet",
            ],
            Self::CashFlow => &["operatingCashFlow"],
        }
    }
}

/// Columns a calculator needs from one statement.
pub type Requirement = (StatementKind, &'static [&'static str]);

/// The three statement tables of one company.
#[derive(Debug, Clone)]
pub struct CompanyStatements {
    symbol: String,
    balance_sheet: DataFrame,
    income_statement: DataFrame,
    cash_flow: DataFrame,
}

impl CompanyStatements {
    /// Create a company with all statements empty.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            balance_sheet: DataFrame::empty(),
            income_statement: DataFrame::empty(),
            cash_flow: DataFrame::empty(),
        }
    }

    /// Attach a statement table, replacing any previous one of the same kind.
    pub fn with_statement(mut self, kind: StatementKind, table: DataFrame) -> Self {
        *self.statement_mut(kind) = table;
        self
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Statement table of the given kind.
    pub const fn statement(&self, kind: StatementKind) -> &DataFrame {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    const fn statement_mut(&mut self, kind: StatementKind) -> &mut DataFrame {
        match kind {
            StatementKind::BalanceSheet => &mut self.balance_sheet,
            StatementKind::IncomeStatement => &mut self.income_statement,
            StatementKind::CashFlow => &mut self.cash_flow,
        }
    }

    /// Whether the statement has no periods.
    pub fn is_empty(&self, kind: StatementKind) -> bool {
        self.statement(kind).height() == 0
    }

    /// Check that every statement in `kinds` has at least one period.
    pub fn ensure_present(&self, kinds: &[StatementKind]) -> Result<()> {
        match kinds.iter().find(|kind| self.is_empty(**kind)) {
            Some(kind) => Err(ScoreError::MissingInput {
                symbol: self.symbol.clone(),
                statement: *kind,
            }),
            None => Ok(()),
        }
    }

    /// Build the aligned frame a calculator runs on.
    ///
    /// Each statement is narrowed to `date` plus the requested columns (cast
    /// to `Float64`), the statements are inner-joined on `date`, and the
    /// result is sorted ascending by date so that row `i - 1` is the previous
    /// period. Periods reported in only some of the statements are dropped.
    /// A statement that repeats a date is rejected with
    /// [`ScoreError::DuplicatePeriod`].
    pub fn aligned(&self, requirements: &[Requirement]) -> Result<LazyFrame> {
        let mut frames = requirements
            .iter()
            .map(|(kind, columns)| self.prepared(*kind, columns));

        let mut aligned = match frames.next() {
            Some(frame) => frame?,
            None => return Err(ScoreError::Computation("no statements requested".into())),
        };
        for frame in frames {
            aligned = aligned.join(
                frame?,
                [col(DATE)],
                [col(DATE)],
                JoinArgs::new(JoinType::Inner),
            );
        }

        Ok(aligned.sort([DATE], SortMultipleOptions::default()))
    }

    fn prepared(&self, kind: StatementKind, columns: &[&str]) -> Result<LazyFrame> {
        self.ensure_present(&[kind])?;
        let table = self.statement(kind);

        for name in std::iter::once(&DATE).chain(columns) {
            if table.column(name).is_err() {
                return Err(ScoreError::MissingColumn(format!(
                    "{} of {} lacks {name}",
                    kind, self.symbol
                )));
            }
        }

        if table.column(DATE)?.as_materialized_series().n_unique()? != table.height() {
            return Err(ScoreError::DuplicatePeriod {
                symbol: self.symbol.clone(),
                statement: kind,
            });
        }

        let mut selection = vec![col(DATE).cast(DataType::String)];
        selection.extend(columns.iter().map(|c| col(*c).cast(DataType::Float64)));

        Ok(table.clone().lazy().select(selection))
    }
}

/// An explicit, ordered collection of companies to score.
///
/// Order is significant: it breaks ties when aggregated results are sorted by
/// date.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    companies: Vec<CompanyStatements>,
}

impl Universe {
    /// Create an empty universe.
    pub const fn new() -> Self {
        Self {
            companies: Vec::new(),
        }
    }

    /// Append a company.
    pub fn push(&mut self, company: CompanyStatements) {
        self.companies.push(company);
    }

    /// Look up a company by symbol.
    pub fn get(&self, symbol: &str) -> Option<&CompanyStatements> {
        self.companies.iter().find(|c| c.symbol == symbol)
    }

    /// Iterate companies in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CompanyStatements> {
        self.companies.iter()
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> Vec<&str> {
        self.companies.iter().map(|c| c.symbol()).collect()
    }

    /// Number of companies.
    pub const fn len(&self) -> usize {
        self.companies.len()
    }

    /// Whether the universe has no companies.
    pub const fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

impl FromIterator<CompanyStatements> for Universe {
    fn from_iter<I: IntoIterator<Item = CompanyStatements>>(iter: I) -> Self {
        Self {
            companies: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a CompanyStatements;
    type IntoIter = std::slice::Iter<'a, CompanyStatements>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
