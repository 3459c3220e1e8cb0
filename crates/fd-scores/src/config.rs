//! Run-wide configuration of the score engine.

use crate::distress::{GnpRegion, Industry};
use serde::{Deserialize, Serialize};

/// Settings selected once per run and shared by every company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Altman Z-Score coefficient set.
    pub industry: Industry,
    /// GNP table used by the Ohlson O-Score.
    pub gnp_region: GnpRegion,
}
