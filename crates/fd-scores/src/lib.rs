#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod arith;
pub mod cache;
pub mod config;
pub mod distress;
pub mod error;
pub mod export;
pub mod profitability;
pub mod quality;
pub mod registry;
pub mod statements;
pub mod traits;

// Re-export core types
pub use aggregate::{Aggregated, ScoreRecord, aggregate};
pub use arith::{guard, safe_ratio, safe_ratio_value};
pub use cache::StatementCache;
pub use config::EngineConfig;
pub use distress::{GnpRegion, Industry};
pub use error::{Result, ScoreError};
pub use registry::{ScoreCategory, ScoreInfo, ScoreRegistry};
pub use statements::{CompanyStatements, StatementKind, Universe};
pub use traits::{ConfigurableScore, Score, ScoreConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
