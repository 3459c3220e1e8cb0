//! DuPont decomposition.
//!
//! Breaks return on equity into five multiplicative drivers:
//!
//! ```text
//! ROE = Tax Burden * Interest Burden * Operating Margin * Asset Turnover * Leverage
//!     = NI/EBT     * EBT/EBIT        * EBIT/Revenue     * Revenue/TA     * TA/Equity
//! ```

use crate::{
    Result,
    registry::ScoreCategory,
    statements::{DATE, Requirement, StatementKind},
    traits::Score,
};
use polars::prelude::*;

const TAX_BURDEN: &str = "tax_burden";
const INTEREST_BURDEN: &str = "interest_burden";
const OPERATING_PROFIT_MARGIN: &str = "operating_profit_margin";
const ASSET_TURNOVER: &str = "asset_turnover";
const FINANCIAL_LEVERAGE_RATIO: &str = "financial_leverage_ratio";
const NET_PROFIT_MARGIN: &str = "net_profit_margin";
const EQUITY_TURNOVER: &str = "equity_turnover";

const EBIT: &str = "ebit";

const COMPONENTS: &[&str] = &[
    NET_PROFIT_MARGIN,
    ASSET_TURNOVER,
    EQUITY_TURNOVER,
    TAX_BURDEN,
    INTEREST_BURDEN,
    OPERATING_PROFIT_MARGIN,
    FINANCIAL_LEVERAGE_RATIO,
];

const REQUIREMENTS: &[Requirement] = &[
    (
        StatementKind::IncomeStatement,
        &["netIncome", "revenue", "incomeBeforeTax", "interestExpense"],
    ),
    (StatementKind::BalanceSheet, &["totalAssets", "totalEquity"]),
];

/// DuPont decomposition of return on equity.
///
/// EBIT is rebuilt as pre-tax income plus interest expense. Missing inputs
/// count as 0.
///
/// No zero guard is applied: a zero denominator yields `±inf` or `NaN` in the
/// affected series, unlike the distress and quality scores which zero such
/// ratios.
///
/// The headline column `return_on_equity` is
/// `net_profit_margin * equity_turnover`.
#[derive(Debug, Clone, Default)]
pub struct DuPont;

impl Score for DuPont {
    fn name(&self) -> &str {
        "return_on_equity"
    }

    fn display_name(&self) -> &str {
        "DuPont ROE"
    }

    fn description(&self) -> &str {
        "DuPont analysis - return on equity split into margin, turnover and leverage"
    }

    fn category(&self) -> ScoreCategory {
        ScoreCategory::Profitability
    }

    fn requirements(&self) -> &[Requirement] {
        REQUIREMENTS
    }

    fn components(&self) -> &[&str] {
        COMPONENTS
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute_raw(&self, data: &LazyFrame) -> Result<DataFrame> {
        let filled: Vec<Expr> = REQUIREMENTS
            .iter()
            .flat_map(|(_, columns)| columns.iter())
            .map(|c| col(*c).fill_null(lit(0.0)))
            .collect();

        let mut selection = vec![col(DATE), col(self.name())];
        selection.extend(COMPONENTS.iter().map(|c| col(*c)));

        let result = data
            .clone()
            .with_columns(filled)
            .with_column((col("incomeBeforeTax") + col("interestExpense")).alias(EBIT))
            .with_columns([
                (col("netIncome") / col("incomeBeforeTax")).alias(TAX_BURDEN),
                (col("incomeBeforeTax") / col(EBIT)).alias(INTEREST_BURDEN),
                (col(EBIT) / col("revenue")).alias(OPERATING_PROFIT_MARGIN),
                (col("revenue") / col("totalAssets")).alias(ASSET_TURNOVER),
                (col("totalAssets") / col("totalEquity")).alias(FINANCIAL_LEVERAGE_RATIO),
            ])
            .with_columns([
                (col(TAX_BURDEN) * col(INTEREST_BURDEN) * col(OPERATING_PROFIT_MARGIN))
                    .alias(NET_PROFIT_MARGIN),
                (col(ASSET_TURNOVER) * col(FINANCIAL_LEVERAGE_RATIO)).alias(EQUITY_TURNOVER),
            ])
            .with_column((col(NET_PROFIT_MARGIN) * col(EQUITY_TURNOVER)).alias(self.name()))
            .select(selection)
            .collect()?;

        Ok(result)
    }
}
