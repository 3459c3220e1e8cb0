//! Piotroski F-Score.
//!
//! The Piotroski F-Score is a 9-point composite score that assesses financial
//! strength based on profitability, leverage and cash-flow signals.

use crate::{
    Result,
    arith::{guard, previous},
    registry::ScoreCategory,
    statements::{DATE, Requirement, StatementKind},
    traits::Score,
};
use polars::prelude::*;

const NET_INCOME_POSITIVE: &str = "net_income_positive";
const ROA_POSITIVE: &str = "roa_positive";
const OPERATING_CASH_FLOW_POSITIVE: &str = "operating_cash_flow_positive";
const ACCRUALS: &str = "accruals";
const LEVERAGE_DECREASE: &str = "leverage_decrease";
const ROA_IMPROVEMENT: &str = "roa_improvement";
const NO_EQUITY_ISSUANCE: &str = "no_equity_issuance";
const OPERATING_CASH_FLOW_GROWTH: &str = "operating_cash_flow_growth";
const ASSET_TURNOVER_CHANGE: &str = "asset_turnover_change";

const ROA: &str = "roa";
const SHARES: &str = "shares";

const COMPONENTS: &[&str] = &[
    NET_INCOME_POSITIVE,
    ROA_POSITIVE,
    OPERATING_CASH_FLOW_POSITIVE,
    ACCRUALS,
    LEVERAGE_DECREASE,
    ROA_IMPROVEMENT,
    NO_EQUITY_ISSUANCE,
    OPERATING_CASH_FLOW_GROWTH,
    ASSET_TURNOVER_CHANGE,
];

const REQUIREMENTS: &[Requirement] = &[
    (
        StatementKind::BalanceSheet,
        &["totalAssets", "longTermDebt", "preferredStock", "commonStock"],
    ),
    (StatementKind::IncomeStatement, &["netIncome"]),
    (StatementKind::CashFlow, &["operatingCashFlow"]),
];

/// Piotroski F-Score.
///
/// The F-Score is a 9-point score (0-9), one point per signal:
///
/// 1. Net income > 0
/// 2. ROA > 0, with ROA = net income / prior-period total assets
/// 3. Operating cash flow > 0
/// 4. Operating cash flow > net income (accruals)
/// 5. Long-term debt decreased
/// 6. ROA increased
/// 7. Shares (preferred + common stock) did not increase
/// 8. Operating cash flow increased
/// 9. Net income > 0, standing in for the asset-turnover change
///
/// Signal 9 deliberately repeats signal 1 instead of measuring asset
/// turnover; correcting it would change historical scores.
///
/// A signal that cannot be evaluated (no prior period) scores 0.
#[derive(Debug, Clone, Default)]
pub struct Piotroski;

impl Score for Piotroski {
    fn name(&self) -> &str {
        "piotroski_f_score"
    }

    fn display_name(&self) -> &str {
        "Piotroski F-Score"
    }

    fn description(&self) -> &str {
        "Piotroski F-Score - 9-point composite score assessing financial strength"
    }

    fn category(&self) -> ScoreCategory {
        ScoreCategory::Strength
    }

    fn requirements(&self) -> &[Requirement] {
        REQUIREMENTS
    }

    fn components(&self) -> &[&str] {
        COMPONENTS
    }

    fn lookback(&self) -> usize {
        3 // ROA improvement compares two lagged ratios
    }

    fn compute_raw(&self, data: &LazyFrame) -> Result<DataFrame> {
        let signal = |condition: Expr, name: &str| {
            condition
                .cast(DataType::Int32)
                .fill_null(lit(0))
                .alias(name)
        };
        let change = |name: &str| col(name) - previous(col(name), 1);

        let total = COMPONENTS
            .iter()
            .map(|c| col(*c))
            .reduce(|acc, c| acc + c)
            .unwrap_or_else(|| lit(0));

        let mut selection = vec![col(DATE), col(self.name())];
        selection.extend(COMPONENTS.iter().map(|c| col(*c)));

        let result = data
            .clone()
            .with_columns([
                guard(col("netIncome") / previous(col("totalAssets"), 1)).alias(ROA),
                (col("preferredStock") + col("commonStock"))
                    .fill_null(lit(0.0))
                    .alias(SHARES),
            ])
            .with_columns([
                signal(col("netIncome").gt(lit(0.0)), NET_INCOME_POSITIVE),
                signal(col(ROA).gt(lit(0.0)), ROA_POSITIVE),
                signal(
                    col("operatingCashFlow").gt(lit(0.0)),
                    OPERATING_CASH_FLOW_POSITIVE,
                ),
                signal(col("operatingCashFlow").gt(col("netIncome")), ACCRUALS),
                signal(change("longTermDebt").lt(lit(0.0)), LEVERAGE_DECREASE),
                signal(change(ROA).gt(lit(0.0)), ROA_IMPROVEMENT),
                signal(change(SHARES).lt_eq(lit(0.0)), NO_EQUITY_ISSUANCE),
                signal(
                    change("operatingCashFlow").gt(lit(0.0)),
                    OPERATING_CASH_FLOW_GROWTH,
                ),
                signal(col("netIncome").gt(lit(0.0)), ASSET_TURNOVER_CHANGE),
            ])
            .with_column(total.alias(self.name()))
            .select(selection)
            .collect()?;

        Ok(result)
    }
}
