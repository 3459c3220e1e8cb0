//! Cache to aggregate to export scenarios across every registered score.

use approx::assert_abs_diff_eq;
use fd_scores::{
    EngineConfig, Industry, ScoreRegistry, StatementCache, StatementKind, Universe, aggregate,
    export::{results_file_name, write_components_csv, write_csv},
};
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};
use std::path::Path;
use tempfile::TempDir;

const DATES: [&str; 3] = ["2023-12-31", "2022-12-31", "2021-12-31"];

/// Values per field, oldest period first. Fields not listed get `100 + 10 * i`.
const OVERRIDES: &[(&str, [f64; 3])] = &[
    ("totalCurrentAssets", [90.0, 100.0, 120.0]),
    ("totalCurrentLiabilities", [55.0, 60.0, 70.0]),
    ("totalAssets", [480.0, 500.0, 550.0]),
    ("totalLiabilities", [290.0, 300.0, 310.0]),
    ("retainedEarnings", [45.0, 50.0, 60.0]),
    ("totalEquity", [190.0, 200.0, 240.0]),
    ("operatingIncome", [35.0, 40.0, 45.0]),
    ("revenue", [190.0, 200.0, 220.0]),
    ("netIncome", [20.0, 25.0, 30.0]),
    ("incomeBeforeTax", [28.0, 32.0, 38.0]),
    ("interestExpense", [4.0, 5.0, 6.0]),
];

/// Statement response as the API returns it, newest period first.
fn response(kind: StatementKind) -> Value {
    let rows: Vec<Value> = DATES
        .iter()
        .enumerate()
        .map(|(newest_first, date)| {
            let i = DATES.len() - 1 - newest_first;
            let mut row = Map::new();
            row.insert("date".into(), json!(date));
            row.insert("symbol".into(), json!("MSFT"));
            for field in kind.fields() {
                let value = OVERRIDES
                    .iter()
                    .find(|(name, _)| name == field)
                    .map_or(100.0 + 10.0 * i as f64, |(_, values)| values[i]);
                row.insert((*field).into(), json!(value));
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

fn write_cache(dir: &Path, symbol: &str, kinds: &[StatementKind]) {
    let cache = StatementCache::new(dir);
    for kind in kinds {
        std::fs::write(cache.path(symbol, *kind), response(*kind).to_string()).unwrap();
    }
}

struct Workspace {
    dir: TempDir,
    universe: Universe,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    write_cache(dir.path(), "MSFT", &StatementKind::ALL);
    // Balance sheet only
    write_cache(dir.path(), "IBM", &[StatementKind::BalanceSheet]);

    let universe = StatementCache::new(dir.path())
        .load_universe(&["MSFT", "IBM", "NONE"])
        .unwrap();
    Workspace { dir, universe }
}

fn values(frame: &polars::prelude::DataFrame, column: &str) -> Vec<f64> {
    frame
        .column(column)
        .unwrap()
        .cast(&polars::prelude::DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

#[rstest]
fn test_altman_end_to_end(workspace: Workspace) {
    let registry = ScoreRegistry::with_defaults();
    let result = aggregate(registry.require("altman_z_score").unwrap(), &workspace.universe).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.skipped, vec!["IBM".to_string(), "NONE".to_string()]);

    let latest = result.latest("MSFT").unwrap().unwrap();
    assert_eq!(latest.date, "2023-12-31");
    assert_abs_diff_eq!(latest.value, 2.3147, epsilon = 1e-3);

    let zones = result.components.unwrap();
    let zones = zones.column("zone").unwrap().str().unwrap();
    assert_eq!(zones.get(2), Some("grey"));
}

#[rstest]
fn test_emerging_market_shifts_every_period(workspace: Workspace) {
    let base = ScoreRegistry::with_defaults();
    let emerging = ScoreRegistry::with_config(&EngineConfig {
        industry: Industry::EmergingMarket,
        ..Default::default()
    });

    let base = aggregate(base.require("altman_z_score").unwrap(), &workspace.universe).unwrap();
    let emerging =
        aggregate(emerging.require("altman_z_score").unwrap(), &workspace.universe).unwrap();

    for (b, e) in values(&base.scores, "altman_z_score")
        .iter()
        .zip(values(&emerging.scores, "altman_z_score"))
    {
        assert_abs_diff_eq!(e - b, 3.25, epsilon = 1e-9);
    }
}

#[rstest]
fn test_every_score_skips_companies_without_statements(workspace: Workspace) {
    let registry = ScoreRegistry::with_defaults();
    let results = registry.compute_all(&workspace.universe).unwrap();

    assert_eq!(results.len(), registry.len());
    for result in &results {
        assert_eq!(result.len(), 3, "{}", result.name);
        assert!(result.skipped.contains(&"NONE".to_string()));
        assert!(result.records().unwrap().iter().all(|r| r.symbol == "MSFT"));
    }
}

#[rstest]
fn test_beneish_first_period_indices_are_zero(workspace: Workspace) {
    let registry = ScoreRegistry::with_defaults();
    let result = aggregate(registry.require("beneish_m_score").unwrap(), &workspace.universe).unwrap();
    let components = result.components.unwrap();

    for index in ["dsri", "gmi", "aqi", "sgi", "depi", "sgai", "lvgi"] {
        assert_eq!(values(&components, index)[0], 0.0, "{index}");
    }
    assert_eq!(values(&result.scores, "beneish_m_score")[0], 0.0);
}

#[rstest]
fn test_piotroski_in_range(workspace: Workspace) {
    let registry = ScoreRegistry::with_defaults();
    let result =
        aggregate(registry.require("piotroski_f_score").unwrap(), &workspace.universe).unwrap();

    for score in values(&result.scores, "piotroski_f_score") {
        assert!((0.0..=9.0).contains(&score));
    }
}

#[rstest]
fn test_dupont_roe_matches_net_income_over_equity(workspace: Workspace) {
    let registry = ScoreRegistry::with_defaults();
    let result =
        aggregate(registry.require("return_on_equity").unwrap(), &workspace.universe).unwrap();
    let roe = values(&result.scores, "return_on_equity");

    assert_abs_diff_eq!(roe[0], 20.0 / 190.0, epsilon = 1e-12);
    assert_abs_diff_eq!(roe[2], 30.0 / 240.0, epsilon = 1e-12);
}

#[rstest]
fn test_export_all(workspace: Workspace) {
    let registry = ScoreRegistry::with_defaults();
    let output = workspace.dir.path().join("output");
    let symbols = workspace.universe.symbols();

    for result in registry.compute_all(&workspace.universe).unwrap() {
        let score = registry.require(&result.name).unwrap();
        let path = output.join(results_file_name(&result.name, symbols.as_slice()));
        write_csv(&result.scores, score, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let header = written.lines().next().unwrap();
        assert_eq!(header, format!("Symbol,Date/Period,{}", result.display_name));
        assert_eq!(written.lines().count(), 4);

        if let Some(components) = &result.components {
            write_components_csv(components, output.join(format!("{}.csv", result.name))).unwrap();
        }
    }

    assert!(output.join("altman_z_score_results_for_MSFT,IBM,NONE.csv").exists());
    assert!(output.join("piotroski_f_score.csv").exists());
}
