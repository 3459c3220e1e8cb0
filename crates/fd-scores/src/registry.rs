//! Score registry for discovery and introspection.
//!
//! The registry provides a centralized way to discover, instantiate, and
//! query scores. It supports grouping by category and bulk computation over a
//! [`Universe`].

use crate::{
    Result, Score, ScoreError,
    aggregate::{Aggregated, aggregate},
    config::EngineConfig,
    distress::{AltmanZ, AltmanZConfig, OhlsonO, OhlsonOConfig},
    profitability::DuPont,
    quality::{BeneishM, Piotroski},
    statements::{StatementKind, Universe},
    traits::ConfigurableScore,
};
use derive_more::Display;
use std::collections::HashMap;
use std::sync::Arc;

/// Score category for grouping related scores.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    /// Distress - bankruptcy prediction models
    Distress,
    /// EarningsQuality - accounting manipulation models
    EarningsQuality,
    /// Strength - composite financial strength signals
    Strength,
    /// Profitability - return decompositions
    Profitability,
}

/// Metadata for score introspection.
#[derive(Debug, Clone)]
pub struct ScoreInfo {
    /// Score name (unique identifier)
    pub name: String,
    /// Export header
    pub display_name: String,
    /// Human-readable description
    pub description: String,
    /// Score category
    pub category: ScoreCategory,
    /// Statements that must be present
    pub statements: Vec<StatementKind>,
    /// Required input columns, prefixed by statement
    pub required_columns: Vec<String>,
    /// Named components emitted next to the score
    pub components: Vec<String>,
    /// Lookback period
    pub lookback: usize,
    /// Cut-off above which a score is flagged
    pub threshold: Option<f64>,
}

impl ScoreInfo {
    fn of(score: &dyn Score) -> Self {
        Self {
            name: score.name().to_string(),
            display_name: score.display_name().to_string(),
            description: score.description().to_string(),
            category: score.category(),
            statements: score.statements(),
            required_columns: score
                .requirements()
                .iter()
                .flat_map(|(kind, columns)| columns.iter().map(move |c| format!("{}.{c}", kind.slug())))
                .collect(),
            components: score.components().iter().map(|s| s.to_string()).collect(),
            lookback: score.lookback(),
            threshold: score.threshold(),
        }
    }
}

/// Registry for score discovery and instantiation.
#[derive(Debug, Default)]
pub struct ScoreRegistry {
    scores: HashMap<String, Arc<dyn Score>>,
}

impl ScoreRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    /// Register all standard scores with default configuration.
    pub fn with_defaults() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Register all standard scores, configured from `config`.
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut registry = Self::new();

        // Distress scores
        registry.register(Arc::new(AltmanZ::with_config(AltmanZConfig {
            industry: config.industry,
        })));
        registry.register(Arc::new(OhlsonO::with_config(OhlsonOConfig {
            region: config.gnp_region,
        })));

        // Earnings quality and strength scores
        registry.register(Arc::new(BeneishM));
        registry.register(Arc::new(Piotroski));

        // Profitability
        registry.register(Arc::new(DuPont));

        registry
    }

    /// Register a score in the registry.
    pub fn register(&mut self, score: Arc<dyn Score>) {
        self.scores.insert(score.name().to_string(), score);
    }

    /// Get a score by name.
    pub fn get(&self, name: &str) -> Option<&dyn Score> {
        self.scores.get(name).map(|s| s.as_ref())
    }

    /// Get a score by name, or [`ScoreError::NotFound`].
    pub fn require(&self, name: &str) -> Result<&dyn Score> {
        self.get(name)
            .ok_or_else(|| ScoreError::NotFound(name.to_string()))
    }

    /// Get scores by category.
    pub fn by_category(&self, category: ScoreCategory) -> Vec<&dyn Score> {
        self.scores
            .values()
            .filter(|s| s.category() == category)
            .map(|s| s.as_ref())
            .collect()
    }

    /// Get all score metadata.
    pub fn all_info(&self) -> Vec<ScoreInfo> {
        self.scores.values().map(|s| ScoreInfo::of(s.as_ref())).collect()
    }

    /// Get all score names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scores.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Compute every registered score over `universe`, in name order.
    pub fn compute_all(&self, universe: &Universe) -> Result<Vec<Aggregated>> {
        self.names()
            .into_iter()
            .map(|name| self.require(name).and_then(|score| aggregate(score, universe)))
            .collect()
    }

    /// Number of registered scores.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
