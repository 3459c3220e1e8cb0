//! Distress scores - bankruptcy prediction models
//!
//! Both models combine balance sheet and income statement ratios into a
//! single index whose thresholds separate healthy from distressed firms.

pub mod altman_z;
pub mod gnp;
pub mod ohlson_o;

pub use altman_z::{AltmanCoefficients, AltmanZ, AltmanZConfig, AltmanZone, Industry};
pub use gnp::GnpRegion;
pub use ohlson_o::{OHLSON_THRESHOLD, OhlsonO, OhlsonOConfig};
