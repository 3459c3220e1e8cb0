//! Beneish M-Score.
//!
//! The Beneish model uses eight period-over-period indices built from the
//! three statements to estimate the probability that reported earnings were
//! manipulated.

use crate::{
    Result,
    arith::{RATIO_DECIMALS, previous, safe_ratio},
    registry::ScoreCategory,
    statements::{DATE, Requirement, StatementKind},
    traits::Score,
};
use polars::prelude::*;

const DSRI: &str = "dsri";
const GMI: &str = "gmi";
const AQI: &str = "aqi";
const SGI: &str = "sgi";
const DEPI: &str = "depi";
const SGAI: &str = "sgai";
const LVGI: &str = "lvgi";
const TATA: &str = "tata";

const SECURITIES: &str = "securities";

const COMPONENTS: &[&str] = &[DSRI, GMI, AQI, SGI, DEPI, SGAI, LVGI, TATA];

const REQUIREMENTS: &[Requirement] = &[
    (
        StatementKind::IncomeStatement,
        &[
            "netIncome",
            "revenue",
            "costOfRevenue",
            "depreciationAndAmortization",
            "sellingGeneralAndAdministrativeExpenses",
        ],
    ),
    (
        StatementKind::BalanceSheet,
        &[
            "totalAssets",
            "netReceivables",
            "totalCurrentAssets",
            "totalCurrentLiabilities",
            "totalLiabilities",
            "propertyPlantEquipmentNet",
            "shortTermInvestments",
            "longTermInvestments",
        ],
    ),
    (StatementKind::CashFlow, &["operatingCashFlow"]),
];

/// Scores above this suggest a likely manipulator.
pub const BENEISH_THRESHOLD: f64 = -1.78;

/// Beneish M-Score.
///
/// ```text
/// M = -4.84 + 0.92*DSRI + 0.528*GMI + 0.404*AQI + 0.892*SGI + 0.115*DEPI
///     - 0.172*SGAI + 4.679*TATA - 0.327*LVGI
/// where:
///   DSRI = Days Sales in Receivables Index
///   GMI  = Gross Margin Index
///   AQI  = Asset Quality Index
///   SGI  = Sales Growth Index
///   DEPI = Depreciation Index
///   SGAI = SG&A Expenses Index
///   LVGI = Leverage Index ((current liabilities + total liabilities) / assets)
///   TATA = Total Accruals to Total Assets
/// ```
///
/// Missing inputs count as 0. Each component is zero-guarded, rounded to 2
/// decimals, and zero-filled when the prior period is absent, so the first
/// period always has every index except TATA equal to 0. The score is
/// combined from those components and rounded to 2 decimals, except in the
/// first period, which has nothing to compare against and scores 0. Scores
/// above [`BENEISH_THRESHOLD`] suggest manipulation.
#[derive(Debug, Clone, Default)]
pub struct BeneishM;

impl Score for BeneishM {
    fn name(&self) -> &str {
        "beneish_m_score"
    }

    fn display_name(&self) -> &str {
        "Beneish M-Score"
    }

    fn description(&self) -> &str {
        "Beneish M-Score - eight-index model of earnings manipulation likelihood"
    }

    fn category(&self) -> ScoreCategory {
        ScoreCategory::EarningsQuality
    }

    fn requirements(&self) -> &[Requirement] {
        REQUIREMENTS
    }

    fn components(&self) -> &[&str] {
        COMPONENTS
    }

    fn lookback(&self) -> usize {
        2 // Need current and prior period
    }

    fn threshold(&self) -> Option<f64> {
        Some(BENEISH_THRESHOLD)
    }

    fn compute_raw(&self, data: &LazyFrame) -> Result<DataFrame> {
        let filled: Vec<Expr> = REQUIREMENTS
            .iter()
            .flat_map(|(_, columns)| columns.iter())
            .map(|c| col(*c).fill_null(lit(0.0)))
            .collect();

        let cur = |name: &str| col(name);
        let prev = |name: &str| previous(col(name), 1);
        let component = |ratio: Expr, name: &str| ratio.fill_null(lit(0.0)).alias(name);

        let mut selection = vec![col(DATE), col(self.name())];
        selection.extend(COMPONENTS.iter().map(|c| col(*c)));

        let result = data
            .clone()
            .with_columns(filled)
            .with_column(
                (col("shortTermInvestments") + col("longTermInvestments")).alias(SECURITIES),
            )
            .with_columns([
                component(
                    safe_ratio(
                        cur("netReceivables") / cur("revenue"),
                        prev("netReceivables") / prev("revenue"),
                    ),
                    DSRI,
                ),
                component(
                    safe_ratio(
                        (prev("revenue") - prev("costOfRevenue")) / prev("revenue"),
                        (cur("revenue") - cur("costOfRevenue")) / cur("revenue"),
                    ),
                    GMI,
                ),
                component(
                    safe_ratio(
                        lit(1.0)
                            - (cur("totalCurrentAssets")
                                + cur("propertyPlantEquipmentNet")
                                + cur(SECURITIES))
                                / cur("totalAssets"),
                        lit(1.0)
                            - (prev("totalCurrentAssets")
                                + prev("propertyPlantEquipmentNet")
                                + prev(SECURITIES))
                                / prev("totalAssets"),
                    ),
                    AQI,
                ),
                component(safe_ratio(cur("revenue"), prev("revenue")), SGI),
                component(
                    safe_ratio(
                        prev("depreciationAndAmortization")
                            / (prev("propertyPlantEquipmentNet")
                                + prev("depreciationAndAmortization")),
                        cur("depreciationAndAmortization")
                            / (cur("propertyPlantEquipmentNet")
                                + cur("depreciationAndAmortization")),
                    ),
                    DEPI,
                ),
                component(
                    safe_ratio(
                        cur("sellingGeneralAndAdministrativeExpenses") / cur("revenue"),
                        prev("sellingGeneralAndAdministrativeExpenses") / prev("revenue"),
                    ),
                    SGAI,
                ),
                component(
                    safe_ratio(
                        (cur("totalCurrentLiabilities") + cur("totalLiabilities"))
                            / cur("totalAssets"),
                        (prev("totalCurrentLiabilities") + prev("totalLiabilities"))
                            / prev("totalAssets"),
                    ),
                    LVGI,
                ),
                component(
                    safe_ratio(
                        cur("netIncome") - cur("operatingCashFlow"),
                        cur("totalAssets"),
                    ),
                    TATA,
                ),
            ])
            .with_column(
                // The first period has no prior period to compare against
                when(prev("revenue").is_null())
                    .then(lit(0.0))
                    .otherwise(
                        (lit(-4.84)
                            + lit(0.92) * col(DSRI)
                            + lit(0.528) * col(GMI)
                            + lit(0.404) * col(AQI)
                            + lit(0.892) * col(SGI)
                            + lit(0.115) * col(DEPI)
                            - lit(0.172) * col(SGAI)
                            + lit(4.679) * col(TATA)
                            - lit(0.327) * col(LVGI))
                        .round(RATIO_DECIMALS),
                    )
                    .alias(self.name()),
            )
            .select(selection)
            .collect()?;

        Ok(result)
    }
}
