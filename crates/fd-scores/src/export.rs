//! CSV export of aggregated score tables.

use crate::{
    Result, Score,
    statements::{DATE, SYMBOL},
};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Export header of the symbol column.
pub const SYMBOL_HEADER: &str = "Symbol";

/// Export header of the date column.
pub const DATE_HEADER: &str = "Date/Period";

/// File name of a score table, e.g. `altman_z_score_results_for_MSFT,AAPL.csv`.
pub fn results_file_name<S: AsRef<str>>(score: &str, symbols: &[S]) -> String {
    format!("{score}_results_for_{}.csv", join_symbols(symbols))
}

/// File name of a component table.
pub fn components_file_name<S: AsRef<str>>(score: &str, symbols: &[S]) -> String {
    format!("{score}_components_for_{}.csv", join_symbols(symbols))
}

fn join_symbols<S: AsRef<str>>(symbols: &[S]) -> String {
    symbols
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Write a `symbol, date, <score>` table to `path` under display headers.
pub fn write_csv(frame: &DataFrame, score: &dyn Score, path: impl AsRef<Path>) -> Result<PathBuf> {
    let renamed = frame
        .clone()
        .lazy()
        .select([
            col(SYMBOL).alias(SYMBOL_HEADER),
            col(DATE).alias(DATE_HEADER),
            col(score.name()).alias(score.display_name()),
        ])
        .collect()?;
    write(renamed, path.as_ref())
}

/// Write a `symbol, date, <components...>` table to `path`.
///
/// Component columns keep their names.
pub fn write_components_csv(frame: &DataFrame, path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut renamed = frame.clone();
    renamed.rename(SYMBOL, SYMBOL_HEADER.into())?;
    renamed.rename(DATE, DATE_HEADER.into())?;
    write(renamed, path.as_ref())
}

fn write(mut frame: DataFrame, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)?;

    info!(path = %path.display(), rows = frame.height(), "wrote csv");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distress::AltmanZ;

    fn scores() -> DataFrame {
        df![
            "symbol" => ["MSFT", "AAPL"],
            "date" => ["2023-06-30", "2023-09-30"],
            "altman_z_score" => [2.5, 4.25]
        ]
        .unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            results_file_name("altman_z_score", &["MSFT", "AAPL"]),
            "altman_z_score_results_for_MSFT,AAPL.csv"
        );
        assert_eq!(
            components_file_name("piotroski_f_score", &["MSFT"]),
            "piotroski_f_score_components_for_MSFT.csv"
        );
    }

    #[test]
    fn test_write_csv_uses_display_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("scores.csv");

        write_csv(&scores(), &AltmanZ::default(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();

        assert_eq!(lines.next(), Some("Symbol,Date/Period,Altman Z-Score"));
        assert_eq!(lines.next(), Some("MSFT,2023-06-30,2.5"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_write_components_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.csv");
        let components = df![
            "symbol" => ["MSFT"],
            "date" => ["2023-06-30"],
            "ebit_to_assets" => [0.08]
        ]
        .unwrap();

        write_components_csv(&components, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert!(written.starts_with("Symbol,Date/Period,ebit_to_assets\n"));
    }
}
