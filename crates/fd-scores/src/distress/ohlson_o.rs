//! Ohlson O-Score.
//!
//! Ohlson's (1980) logit model of bankruptcy probability. Unlike the Altman
//! Z-Score, a higher O-Score means a higher risk of failure; scores above 0.5
//! are conventionally read as distressed.

use super::gnp::GnpRegion;
use crate::{
    Result,
    arith::{nan_if_undefined, previous},
    registry::ScoreCategory,
    statements::{DATE, Requirement, StatementKind},
    traits::{ConfigurableScore, Score},
};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const GNP: &str = "gnp";
const SIZE: &str = "size";
const LIABILITIES_TO_ASSETS: &str = "liabilities_to_assets";
const WORKING_CAPITAL_TO_ASSETS: &str = "working_capital_to_assets";
const CURRENT_LIABILITIES_TO_CURRENT_ASSETS: &str = "current_liabilities_to_current_assets";
const INSOLVENT: &str = "insolvent";
const RETURN_ON_ASSETS: &str = "return_on_assets";
const FUNDS_FROM_OPERATIONS_TO_LIABILITIES: &str = "funds_from_operations_to_liabilities";
const CONSECUTIVE_LOSSES: &str = "consecutive_losses";
const NET_INCOME_CHANGE: &str = "net_income_change";

const COMPONENTS: &[&str] = &[
    SIZE,
    LIABILITIES_TO_ASSETS,
    WORKING_CAPITAL_TO_ASSETS,
    CURRENT_LIABILITIES_TO_CURRENT_ASSETS,
    INSOLVENT,
    RETURN_ON_ASSETS,
    FUNDS_FROM_OPERATIONS_TO_LIABILITIES,
    CONSECUTIVE_LOSSES,
    NET_INCOME_CHANGE,
];

const REQUIREMENTS: &[Requirement] = &[
    (
        StatementKind::BalanceSheet,
        &[
            "totalAssets",
            "totalLiabilities",
            "totalCurrentAssets",
            "totalCurrentLiabilities",
        ],
    ),
    (
        StatementKind::IncomeStatement,
        &[
            "netIncome",
            "depreciationAndAmortization",
            "totalOtherIncomeExpensesNet",
        ],
    ),
];

/// Score above which a company is read as distressed.
pub const OHLSON_THRESHOLD: f64 = 0.5;

/// Configuration for the Ohlson O-Score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OhlsonOConfig {
    /// GNP table used to scale total assets.
    pub region: GnpRegion,
}

/// Ohlson O-Score.
///
/// ```text
/// O = -1.32 - 0.407*ln(TA/GNP) + 6.03*TL/TA - 1.43*WC/TA + 0.0757*CL/CA
///     - 1.72*X - 2.37*NI/TA - 1.83*FFO/TL + 0.285*Y
///     - 0.521*(NI_t - NI_t-1)/(|NI_t| + |NI_t-1|)
/// where:
///   X   = 1 if total liabilities exceed total assets, else 0
///   Y   = 1 if net income was negative in this and the prior period, else 0
///   FFO = Net Income + Depreciation & Amortization - Other Income/Expenses
/// ```
///
/// GNP comes from the configured region's table, keyed by the calendar year
/// of each period. A year outside the table is logged and makes that row NaN.
/// No zero guard is applied: a zero denominator makes the affected component
/// and the score NaN, never infinite. The first period has no prior net
/// income, so its score is NaN as well; none of these cases is an error.
#[derive(Debug, Clone, Default)]
pub struct OhlsonO {
    config: OhlsonOConfig,
}

impl OhlsonO {
    /// GNP value for every period of `frame`, NaN where the lookup misses.
    fn gnp_column(&self, frame: &DataFrame) -> Result<Column> {
        let region = self.config.region;
        let values: Vec<f64> = frame
            .column(DATE)?
            .str()?
            .into_iter()
            .map(|date| {
                let year = date
                    .and_then(|d| d.get(..10))
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                    .map(|d| d.year());
                let Some(year) = year else {
                    tracing::warn!(?date, "unparseable report date, GNP unavailable");
                    return f64::NAN;
                };
                region.gnp(year).unwrap_or_else(|err| {
                    tracing::warn!(%err, covered = ?region.years(), "Ohlson O-Score row will be NaN");
                    f64::NAN
                })
            })
            .collect();

        Ok(Column::new(GNP.into(), values))
    }
}

impl Score for OhlsonO {
    fn name(&self) -> &str {
        "ohlson_o_score"
    }

    fn display_name(&self) -> &str {
        "Ohlson O-Score"
    }

    fn description(&self) -> &str {
        "Ohlson O-Score - logit bankruptcy model scaled by national GNP"
    }

    fn category(&self) -> ScoreCategory {
        ScoreCategory::Distress
    }

    fn requirements(&self) -> &[Requirement] {
        REQUIREMENTS
    }

    fn components(&self) -> &[&str] {
        COMPONENTS
    }

    fn lookback(&self) -> usize {
        2 // Need current and prior net income
    }

    fn threshold(&self) -> Option<f64> {
        Some(OHLSON_THRESHOLD)
    }

    fn compute_raw(&self, data: &LazyFrame) -> Result<DataFrame> {
        let mut frame = data.clone().collect()?;
        let gnp = self.gnp_column(&frame)?;
        frame.with_column(gnp)?;

        let net_income = || col("netIncome");
        let prior_net_income = || previous(col("netIncome"), 1);

        let mut selection = vec![col(DATE), nan_if_undefined(col(self.name()))];
        selection.extend(COMPONENTS.iter().map(|c| nan_if_undefined(col(*c))));

        let result = frame
            .lazy()
            .with_columns([
                (col("totalAssets") / col(GNP))
                    .log(std::f64::consts::E)
                    .alias(SIZE),
                (col("totalLiabilities") / col("totalAssets")).alias(LIABILITIES_TO_ASSETS),
                ((col("totalCurrentAssets") - col("totalCurrentLiabilities"))
                    / col("totalAssets"))
                .alias(WORKING_CAPITAL_TO_ASSETS),
                (col("totalCurrentLiabilities") / col("totalCurrentAssets"))
                    .alias(CURRENT_LIABILITIES_TO_CURRENT_ASSETS),
                col("totalLiabilities")
                    .gt(col("totalAssets"))
                    .cast(DataType::Float64)
                    .alias(INSOLVENT),
                (net_income() / col("totalAssets")).alias(RETURN_ON_ASSETS),
                ((net_income() + col("depreciationAndAmortization")
                    - col("totalOtherIncomeExpensesNet"))
                    / col("totalLiabilities"))
                .alias(FUNDS_FROM_OPERATIONS_TO_LIABILITIES),
                net_income()
                    .lt(lit(0.0))
                    .and(prior_net_income().lt(lit(0.0)))
                    .cast(DataType::Float64)
                    .alias(CONSECUTIVE_LOSSES),
                ((net_income() - prior_net_income())
                    / (net_income().abs() + prior_net_income().abs()))
                .alias(NET_INCOME_CHANGE),
            ])
            .with_column(
                (lit(-1.32) - lit(0.407) * col(SIZE) + lit(6.03) * col(LIABILITIES_TO_ASSETS)
                    - lit(1.43) * col(WORKING_CAPITAL_TO_ASSETS)
                    + lit(0.0757) * col(CURRENT_LIABILITIES_TO_CURRENT_ASSETS)
                    - lit(1.72) * col(INSOLVENT)
                    - lit(2.37) * col(RETURN_ON_ASSETS)
                    - lit(1.83) * col(FUNDS_FROM_OPERATIONS_TO_LIABILITIES)
                    + lit(0.285) * col(CONSECUTIVE_LOSSES)
                    - lit(0.521) * col(NET_INCOME_CHANGE))
                .alias(self.name()),
            )
            .select(selection)
            .collect()?;

        Ok(result)
    }
}

impl ConfigurableScore for OhlsonO {
    type Config = OhlsonOConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn frame(dates: [&str; 2]) -> LazyFrame {
        df![
            "date" => dates,
            "totalAssets" => [400_000.0, 500_000.0],
            "totalLiabilities" => [300_000.0, 350_000.0],
            "totalCurrentAssets" => [120_000.0, 150_000.0],
            "totalCurrentLiabilities" => [80_000.0, 100_000.0],
            "netIncome" => [-10_000.0, 20_000.0],
            "depreciationAndAmortization" => [5_000.0, 6_000.0],
            "totalOtherIncomeExpensesNet" => [1_000.0, 2_000.0]
        ]
        .unwrap()
        .lazy()
    }

    fn expected(gnp: f64) -> f64 {
        let (ta, tl, ca, cl, ni, prior) =
            (500_000.0_f64, 350_000.0, 150_000.0, 100_000.0, 20_000.0, -10_000.0_f64);
        let ffo = ni + 6_000.0 - 2_000.0;
        -1.32 - 0.407 * (ta / gnp).ln() + 6.03 * (tl / ta) - 1.43 * ((ca - cl) / ta)
            + 0.0757 * (cl / ca)
            - 1.72 * 0.0
            - 2.37 * (ni / ta)
            - 1.83 * (ffo / tl)
            + 0.285 * 0.0
            - 0.521 * ((ni - prior) / (ni.abs() + prior.abs()))
    }

    fn scores(score: &OhlsonO, data: &LazyFrame) -> Vec<f64> {
        score
            .compute_raw(data)
            .unwrap()
            .column("ohlson_o_score")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_ohlson_o_metadata() {
        let score = OhlsonO::default();
        assert_eq!(score.name(), "ohlson_o_score");
        assert_eq!(score.lookback(), 2);
        assert_eq!(score.category(), ScoreCategory::Distress);
        assert_eq!(score.config().region, GnpRegion::UnitedKingdom);
        assert_eq!(score.threshold(), Some(OHLSON_THRESHOLD));
    }

    #[test]
    fn test_ohlson_o_computation() {
        let o = scores(&OhlsonO::default(), &frame(["2022-12-31", "2023-12-31"]));

        // First period lacks prior net income
        assert!(o[0].is_nan());
        assert_abs_diff_eq!(o[1], expected(2_369_300_000_000.0), epsilon = 1e-9);
    }

    #[test]
    fn test_ohlson_o_region_is_configurable() {
        let score = OhlsonO::with_config(OhlsonOConfig {
            region: GnpRegion::UnitedStates,
        });
        let o = scores(&score, &frame(["2022-12-31", "2023-12-31"]));

        assert_abs_diff_eq!(o[1], expected(25_537_000_000_000.0), epsilon = 1e-9);
    }

    #[test]
    fn test_ohlson_o_missing_gnp_year_is_nan() {
        let o = scores(&OhlsonO::default(), &frame(["2010-12-31", "2011-12-31"]));

        assert_eq!(o.len(), 2);
        assert!(o.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_ohlson_o_zero_denominators_are_nan() {
        let data = df![
            "date" => ["2021-12-31", "2022-12-31", "2023-12-31"],
            "totalAssets" => [400_000.0, 500_000.0, 0.0],
            "totalLiabilities" => [300_000.0, 350_000.0, 350_000.0],
            "totalCurrentAssets" => [120_000.0, 0.0, 150_000.0],
            "totalCurrentLiabilities" => [80_000.0, 100_000.0, 100_000.0],
            "netIncome" => [-10_000.0, 20_000.0, 25_000.0],
            "depreciationAndAmortization" => [5_000.0, 6_000.0, 6_000.0],
            "totalOtherIncomeExpensesNet" => [1_000.0, 2_000.0, 2_000.0]
        ]
        .unwrap()
        .lazy();

        let result = OhlsonO::default().compute_raw(&data).unwrap();
        let o = scores(&OhlsonO::default(), &data);
        let current = result
            .column(CURRENT_LIABILITIES_TO_CURRENT_ASSETS)
            .unwrap()
            .f64()
            .unwrap();

        // Current assets of 0, then total assets of 0
        assert!(o[1].is_nan());
        assert!(o[2].is_nan());
        assert!(current.get(1).is_some_and(f64::is_nan));
        assert!(result.column(SIZE).unwrap().f64().unwrap().get(2).is_some_and(f64::is_nan));
    }

    #[test]
    fn test_ohlson_o_indicators() {
        let data = df![
            "date" => ["2022-06-30", "2022-09-30"],
            "totalAssets" => [100.0, 100.0],
            "totalLiabilities" => [90.0, 120.0],
            "totalCurrentAssets" => [50.0, 40.0],
            "totalCurrentLiabilities" => [30.0, 60.0],
            "netIncome" => [-5.0, -8.0],
            "depreciationAndAmortization" => [1.0, 1.0],
            "totalOtherIncomeExpensesNet" => [0.0, 0.0]
        ]
        .unwrap()
        .lazy();

        let result = OhlsonO::default().compute_raw(&data).unwrap();
        let insolvent = result.column(INSOLVENT).unwrap().f64().unwrap();
        let losses = result.column(CONSECUTIVE_LOSSES).unwrap().f64().unwrap();

        assert_eq!(insolvent.get(0), Some(0.0));
        assert_eq!(insolvent.get(1), Some(1.0));
        assert_eq!(losses.get(1), Some(1.0));
        assert_eq!(result.width(), 2 + COMPONENTS.len());
    }
}
