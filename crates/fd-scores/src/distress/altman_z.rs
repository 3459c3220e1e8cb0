//! Altman Z-Score.
//!
//! The Altman Z-Score is a bankruptcy prediction model that combines five
//! balance-sheet and income ratios into a single measure of financial health.
//! Published by Edward Altman in 1968, it estimates the likelihood that a firm
//! goes bankrupt within two years.

use crate::{
    Result,
    arith::guard,
    registry::ScoreCategory,
    statements::{DATE, Requirement, StatementKind},
    traits::{ConfigurableScore, Score},
};
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const WORKING_CAPITAL_TO_ASSETS: &str = "working_capital_to_assets";
const RETAINED_EARNINGS_TO_ASSETS: &str = "retained_earnings_to_assets";
const EBIT_TO_ASSETS: &str = "ebit_to_assets";
const EQUITY_TO_LIABILITIES: &str = "equity_to_liabilities";
const REVENUE_TO_ASSETS: &str = "revenue_to_assets";
const ZONE: &str = "zone";

const REQUIREMENTS: &[Requirement] = &[
    (
        StatementKind::BalanceSheet,
        &[
            "totalCurrentAssets",
            "totalCurrentLiabilities",
            "retainedEarnings",
            "totalAssets",
            "totalLiabilities",
        ],
    ),
    (StatementKind::IncomeStatement, &["operatingIncome", "revenue"]),
];

/// Industry whose coefficient set weights the Z-Score ratios.
#[derive(
    Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    /// Non-manufacturing firms (Z'' model)
    #[default]
    #[display("non_manufacturer")]
    #[cfg_attr(feature = "clap", value(name = "non_manufacturer"))]
    NonManufacturer,
    /// Public manufacturing firms (original 1968 model)
    #[display("manufacturers")]
    #[cfg_attr(feature = "clap", value(name = "manufacturers"))]
    Manufacturers,
    /// Emerging-market firms (Z'' model with a constant)
    #[display("emerging_market")]
    #[cfg_attr(feature = "clap", value(name = "emerging_market"))]
    EmergingMarket,
}

/// Weights, constant and zone thresholds of one industry model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltmanCoefficients {
    /// Weight of working capital / total assets
    pub y1: f64,
    /// Weight of retained earnings / total assets
    pub y2: f64,
    /// Weight of EBIT / total assets
    pub y3: f64,
    /// Weight of book equity / total liabilities
    pub y4: f64,
    /// Weight of revenue / total assets
    pub y5: f64,
    /// Additive constant
    pub a: f64,
    /// Scores above this are in the safe zone
    pub safe: f64,
    /// Scores below this are in the distress zone
    pub distress: f64,
}

impl Industry {
    /// Coefficient set of this industry.
    pub const fn coefficients(self) -> AltmanCoefficients {
        match self {
            Self::NonManufacturer => AltmanCoefficients {
                y1: 6.56,
                y2: 3.26,
                y3: 6.72,
                y4: 1.05,
                y5: 0.0,
                a: 0.0,
                safe: 2.6,
                distress: 1.1,
            },
            Self::Manufacturers => AltmanCoefficients {
                y1: 1.2,
                y2: 1.4,
                y3: 3.3,
                y4: 0.6,
                y5: 1.0,
                a: 0.0,
                safe: 2.99,
                distress: 1.81,
            },
            Self::EmergingMarket => AltmanCoefficients {
                y1: 6.56,
                y2: 3.26,
                y3: 6.72,
                y4: 1.05,
                y5: 0.0,
                a: 3.25,
                safe: 2.6,
                distress: 1.1,
            },
        }
    }

    /// Parse a label, falling back to the default industry when unknown.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::warn!(label, default = %Self::default(), "unknown industry, using default");
            Self::default()
        })
    }

    /// Zone of a Z-Score under this industry's thresholds.
    pub fn zone(self, z_score: f64) -> AltmanZone {
        let coefficients = self.coefficients();
        if z_score > coefficients.safe {
            AltmanZone::Safe
        } else if z_score < coefficients.distress {
            AltmanZone::Distress
        } else {
            AltmanZone::Grey
        }
    }

    /// Zone label of every value of `z_score`, matching [`Industry::zone`].
    pub fn zone_expr(self, z_score: Expr) -> Expr {
        let coefficients = self.coefficients();
        when(z_score.clone().gt(lit(coefficients.safe)))
            .then(lit(AltmanZone::Safe.to_string()))
            .when(z_score.lt(lit(coefficients.distress)))
            .then(lit(AltmanZone::Distress.to_string()))
            .otherwise(lit(AltmanZone::Grey.to_string()))
    }
}

impl FromStr for Industry {
    type Err = crate::ScoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "non_manufacturer" => Ok(Self::NonManufacturer),
            "manufacturers" | "manufacturer" => Ok(Self::Manufacturers),
            "emerging_market" => Ok(Self::EmergingMarket),
            other => Err(crate::ScoreError::NotFound(format!("industry {other}"))),
        }
    }
}

/// Bankruptcy-risk zone of a Z-Score.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AltmanZone {
    /// Low bankruptcy risk
    #[display("safe")]
    Safe,
    /// Ambiguous
    #[display("grey")]
    Grey,
    /// High bankruptcy risk
    #[display("distress")]
    Distress,
}

/// Configuration for the Altman Z-Score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AltmanZConfig {
    /// Coefficient set, selected once per run.
    pub industry: Industry,
}

/// Altman Z-Score.
///
/// The Z-Score is calculated as:
/// ```text
/// Z = y1*A + y2*B + y3*C + y4*D + y5*E + a
/// where:
///   A = (Current Assets - Current Liabilities) / Total Assets
///   B = Retained Earnings / Total Assets
///   C = Operating Income (EBIT) / Total Assets
///   D = (Total Assets - Total Liabilities) / Total Liabilities
///   E = Revenue / Total Assets
/// ```
///
/// Weights come from the configured [`Industry`]. Each ratio is zero-guarded:
/// a zero denominator contributes `0` instead of an infinity. Ratios are not
/// rounded.
///
/// Higher scores indicate lower bankruptcy risk. The `zone` column labels
/// each period `safe`, `grey` or `distress` per [`Industry::zone`].
#[derive(Debug, Clone, Default)]
pub struct AltmanZ {
    config: AltmanZConfig,
}

impl Score for AltmanZ {
    fn name(&self) -> &str {
        "altman_z_score"
    }

    fn display_name(&self) -> &str {
        "Altman Z-Score"
    }

    fn description(&self) -> &str {
        "Altman Z-Score - bankruptcy prediction model combining five financial ratios"
    }

    fn category(&self) -> ScoreCategory {
        ScoreCategory::Distress
    }

    fn requirements(&self) -> &[Requirement] {
        REQUIREMENTS
    }

    fn components(&self) -> &[&str] {
        &[
            WORKING_CAPITAL_TO_ASSETS,
            RETAINED_EARNINGS_TO_ASSETS,
            EBIT_TO_ASSETS,
            EQUITY_TO_LIABILITIES,
            REVENUE_TO_ASSETS,
            ZONE,
        ]
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute_raw(&self, data: &LazyFrame) -> Result<DataFrame> {
        let c = self.config.industry.coefficients();

        let result = data
            .clone()
            .with_columns([
                guard(
                    (col("totalCurrentAssets") - col("totalCurrentLiabilities"))
                        / col("totalAssets"),
                )
                .alias(WORKING_CAPITAL_TO_ASSETS),
                guard(col("retainedEarnings") / col("totalAssets"))
                    .alias(RETAINED_EARNINGS_TO_ASSETS),
                guard(col("operatingIncome") / col("totalAssets")).alias(EBIT_TO_ASSETS),
                guard((col("totalAssets") - col("totalLiabilities")) / col("totalLiabilities"))
                    .alias(EQUITY_TO_LIABILITIES),
                guard(col("revenue") / col("totalAssets")).alias(REVENUE_TO_ASSETS),
            ])
            .with_column(
                (lit(c.y1) * col(WORKING_CAPITAL_TO_ASSETS)
                    + lit(c.y2) * col(RETAINED_EARNINGS_TO_ASSETS)
                    + lit(c.y3) * col(EBIT_TO_ASSETS)
                    + lit(c.y4) * col(EQUITY_TO_LIABILITIES)
                    + lit(c.y5) * col(REVENUE_TO_ASSETS)
                    + lit(c.a))
                .alias(self.name()),
            )
            .with_column(self.config.industry.zone_expr(col(self.name())).alias(ZONE))
            .select([
                col(DATE),
                col(self.name()),
                col(WORKING_CAPITAL_TO_ASSETS),
                col(RETAINED_EARNINGS_TO_ASSETS),
                col(EBIT_TO_ASSETS),
                col(EQUITY_TO_LIABILITIES),
                col(REVENUE_TO_ASSETS),
                col(ZONE),
            ])
            .collect()?;

        Ok(result)
    }
}

impl ConfigurableScore for AltmanZ {
    type Config = AltmanZConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
