//! Gross national product reference tables for the Ohlson O-Score.
//!
//! Values are nominal GNP in national currency units, one per calendar year.

use crate::{Result, ScoreError};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Region whose GNP table scales company size.
///
/// The default is the United Kingdom table even though the usual universe is
/// US tickers; switch to [`GnpRegion::UnitedStates`] through configuration.
#[derive(
    Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum GnpRegion {
    /// United Kingdom
    #[default]
    #[display("united_kingdom")]
    #[cfg_attr(feature = "clap", value(name = "united_kingdom", alias = "uk"))]
    UnitedKingdom,
    /// United States
    #[display("united_states")]
    #[cfg_attr(feature = "clap", value(name = "united_states", alias = "us"))]
    UnitedStates,
}

impl GnpRegion {
    /// GNP for `year`, or [`ScoreError::GnpUnavailable`] outside the table.
    pub fn gnp(self, year: i32) -> Result<f64> {
        let value = match (self, year) {
            (Self::UnitedKingdom, 2018) => 2_116_600_000_000.0,
            (Self::UnitedKingdom, 2019) => 2_130_400_000_000.0,
            (Self::UnitedKingdom, 2020) => 2_090_700_000_000.0,
            (Self::UnitedKingdom, 2021) => 2_307_700_000_000.0,
            (Self::UnitedKingdom, 2022) => 2_412_200_000_000.0,
            (Self::UnitedKingdom, 2023) => 2_369_300_000_000.0,
            (Self::UnitedStates, 2018) => 21_431_000_000_000.0,
            (Self::UnitedStates, 2019) => 22_325_000_000_000.0,
            (Self::UnitedStates, 2020) => 20_909_000_000_000.0,
            (Self::UnitedStates, 2021) => 23_136_000_000_000.0,
            (Self::UnitedStates, 2022) => 25_347_000_000_000.0,
            (Self::UnitedStates, 2023) => 25_537_000_000_000.0,
            _ => {
                return Err(ScoreError::GnpUnavailable {
                    region: self.to_string(),
                    year,
                });
            }
        };
        Ok(value)
    }

    /// Years covered by the table, inclusive.
    pub const fn years(self) -> std::ops::RangeInclusive<i32> {
        2018..=2023
    }
}
