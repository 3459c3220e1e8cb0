//! CLI for the fd-scores financial score engine.
//!
//! This binary lists and describes the available scores and computes them for
//! a set of symbols from cached statement responses, writing CSV tables.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use fd_scores::{
    Aggregated, EngineConfig, GnpRegion, Industry, ScoreCategory, ScoreRegistry, StatementCache,
    aggregate,
    export::{components_file_name, results_file_name, write_components_csv, write_csv},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_OUTPUT_DIR: &str = "output";
const ALL_SCORES: &str = "all";

#[derive(Parser)]
#[command(name = "fd-scores")]
#[command(about = "Financial distress and earnings-quality scores", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available scores
    List,
    /// Show information about a specific score
    Info {
        /// Score name
        score: String,
    },
    /// Compute scores for a set of symbols
    Compute(ComputeArgs),
}

#[derive(Args, Debug, Default)]
struct ComputeArgs {
    /// Comma-separated stock symbols
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,
    /// Score to compute, or `all`
    #[arg(long, default_value = ALL_SCORES)]
    score: String,
    /// Directory of cached statement responses
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Directory CSV tables are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Altman Z-Score coefficient set
    #[arg(long, value_enum)]
    industry: Option<Industry>,
    /// GNP table used by the Ohlson O-Score
    #[arg(long, value_enum)]
    gnp_region: Option<GnpRegion>,
    /// JSON run file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Settings read from a `--config` run file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    symbols: Vec<String>,
    cache_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    industry: Option<Industry>,
    gnp_region: Option<GnpRegion>,
}

impl RunConfig {
    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading run file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing run file {}", path.display()))
    }
}

/// Fully resolved compute settings.
#[derive(Debug, PartialEq)]
struct ComputePlan {
    symbols: Vec<String>,
    score: String,
    cache_dir: PathBuf,
    output_dir: PathBuf,
    engine: EngineConfig,
}

impl ComputePlan {
    /// Merge flags over the run file.
    fn resolve(args: ComputeArgs, file: RunConfig) -> Self {
        Self {
            symbols: if args.symbols.is_empty() {
                file.symbols
            } else {
                args.symbols
            },
            score: args.score,
            cache_dir: args
                .cache_dir
                .or(file.cache_dir)
                .unwrap_or_else(|| DEFAULT_CACHE_DIR.into()),
            output_dir: args
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into()),
            engine: EngineConfig {
                industry: args.industry.or(file.industry).unwrap_or_default(),
                gnp_region: args.gnp_region.or(file.gnp_region).unwrap_or_default(),
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::List => {
            list_scores(&ScoreRegistry::with_defaults());
            Ok(())
        }
        Commands::Info { score } => show_score_info(&ScoreRegistry::with_defaults(), &score),
        Commands::Compute(args) => compute_scores(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "fd_scores=info",
        1 => "fd_scores=debug",
        _ => "fd_scores=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// List all available scores grouped by category.
fn list_scores(registry: &ScoreRegistry) {
    let mut by_category: HashMap<ScoreCategory, Vec<_>> = HashMap::new();
    for info in registry.all_info() {
        by_category.entry(info.category).or_default().push(info);
    }

    println!("Available Scores ({} total)\n", registry.len());

    // Sort categories for consistent output
    let mut categories: Vec<_> = by_category.into_iter().collect();
    categories.sort_by_key(|(category, _)| category.to_string());

    for (category, mut scores) in categories {
        println!("{category}:");
        scores.sort_by(|a, b| a.name.cmp(&b.name));
        for info in scores {
            println!("  {} - {}", info.name, info.description);
        }
        println!();
    }
}

/// Show detailed information about a specific score.
fn show_score_info(registry: &ScoreRegistry, score_name: &str) -> Result<()> {
    let info = registry
        .all_info()
        .into_iter()
        .find(|i| i.name == score_name)
        .with_context(|| unknown_score(registry, score_name))?;

    println!("Score: {} ({})", info.name, info.display_name);
    println!("Category: {}", info.category);
    println!("Description: {}", info.description);
    println!("Lookback: {} periods", info.lookback);
    if let Some(threshold) = info.threshold {
        println!("Threshold: {threshold}");
    }
    println!(
        "Statements: {}",
        info.statements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Required columns:");
    for column in &info.required_columns {
        println!("  - {column}");
    }
    if !info.components.is_empty() {
        println!("Components: {}", info.components.join(", "));
    }
    Ok(())
}

fn unknown_score(registry: &ScoreRegistry, score_name: &str) -> String {
    format!(
        "score '{score_name}' not found, available: {}",
        registry.names().join(", ")
    )
}

/// Compute the requested scores and write their tables.
fn compute_scores(args: ComputeArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let plan = ComputePlan::resolve(args, file);
    anyhow::ensure!(!plan.symbols.is_empty(), "no symbols given");

    let registry = ScoreRegistry::with_config(&plan.engine);
    let names: Vec<&str> = if plan.score == ALL_SCORES {
        registry.names()
    } else {
        let score = registry
            .get(&plan.score)
            .with_context(|| unknown_score(&registry, &plan.score))?;
        vec![score.name()]
    };

    info!(
        symbols = ?plan.symbols,
        cache_dir = %plan.cache_dir.display(),
        industry = %plan.engine.industry,
        gnp_region = %plan.engine.gnp_region,
        "computing scores"
    );
    let universe = StatementCache::new(&plan.cache_dir).load_universe(plan.symbols.as_slice())?;

    for name in names {
        let score = registry.require(name)?;
        let result = aggregate(score, &universe)?;
        print_result(&result);

        write_csv(
            &result.scores,
            score,
            plan.output_dir.join(results_file_name(name, plan.symbols.as_slice())),
        )?;
        if let Some(components) = &result.components {
            write_components_csv(
                components,
                plan.output_dir.join(components_file_name(name, plan.symbols.as_slice())),
            )?;
        }
    }
    Ok(())
}

fn print_result(result: &Aggregated) {
    println!("{}:", result.display_name);
    println!("{}", result.scores);
    if !result.skipped.is_empty() {
        println!("Skipped: {}", result.skipped.join(", "));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_not_empty() {
        let registry = ScoreRegistry::with_defaults();
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_all_scores_have_info() {
        let registry = ScoreRegistry::with_defaults();
        let all_info = registry.all_info();

        assert_eq!(all_info.len(), registry.len());

        for info in all_info {
            assert!(!info.name.is_empty());
            assert!(!info.description.is_empty());
            assert!(!info.required_columns.is_empty());
        }
    }

    #[test]
    fn test_parse_compute() {
        let cli = Cli::try_parse_from([
            "fd-scores",
            "compute",
            "--symbols",
            "MSFT,AAPL",
            "--score",
            "altman_z_score",
            "--industry",
            "manufacturers",
            "--gnp-region",
            "us",
        ])
        .unwrap();

        let Commands::Compute(args) = cli.command else {
            panic!("expected compute");
        };
        assert_eq!(args.symbols, vec!["MSFT", "AAPL"]);
        assert_eq!(args.industry, Some(Industry::Manufacturers));
        assert_eq!(args.gnp_region, Some(GnpRegion::UnitedStates));
    }

    #[test]
    fn test_flags_override_run_file() {
        let file: RunConfig = serde_json::from_str(
            r#"{"symbols": ["GOOGL"], "cache_dir": "data", "industry": "emerging_market"}"#,
        )
        .unwrap();
        let args = ComputeArgs {
            symbols: vec!["MSFT".into()],
            score: ALL_SCORES.into(),
            industry: Some(Industry::Manufacturers),
            ..Default::default()
        };

        let plan = ComputePlan::resolve(args, file);

        assert_eq!(plan.symbols, vec!["MSFT"]);
        assert_eq!(plan.cache_dir, PathBuf::from("data"));
        assert_eq!(plan.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(plan.engine.industry, Industry::Manufacturers);
        assert_eq!(plan.engine.gnp_region, GnpRegion::UnitedKingdom);
    }

    #[test]
    fn test_unknown_score_fails() {
        let dir = std::env::temp_dir();
        let args = ComputeArgs {
            symbols: vec!["MSFT".into()],
            score: "sloan_ratio".into(),
            cache_dir: Some(dir.clone()),
            output_dir: Some(dir),
            ..Default::default()
        };

        let err = compute_scores(args).unwrap_err();
        assert!(err.to_string().contains("sloan_ratio"));
    }
}
