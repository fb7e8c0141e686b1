//! Results File Loader
//! Reads the harness CSV with Polars and checks the schema up front.

use polars::prelude::*;
use thiserror::Error;

use super::aggregator::Channel;

/// Independent variable column: the number of vertices in the generated graph.
pub const INDEPENDENT_COLUMN: &str = "V";

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("failed to read results file: {0}")]
    Csv(#[from] PolarsError),
    #[error("results file is missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Load the benchmark results CSV and verify every required column is present.
///
/// Fails before any aggregation if the file is unreadable or a measurement
/// column is absent.
pub fn load_results(path: &str) -> Result<DataFrame, FormatError> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    ensure_columns(&df)?;
    Ok(df)
}

/// Schema check: `V` plus one column per measurement channel.
pub fn ensure_columns(df: &DataFrame) -> Result<(), FormatError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if !names.iter().any(|n| n == INDEPENDENT_COLUMN) {
        return Err(FormatError::MissingColumn(INDEPENDENT_COLUMN));
    }
    for channel in Channel::ALL {
        if !names.iter().any(|n| n == channel.column_name()) {
            return Err(FormatError::MissingColumn(channel.column_name()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FULL_HEADER: &str =
        "V,approx1-ratio,approx2-ratio,cnf-sat-time,approx1-time,approx2-time";

    fn write_csv(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn loads_well_formed_results() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "output.csv",
            &format!("{FULL_HEADER}\n5,1.0,1.33,20.5,0.1,0.2\n5,1.0,1.0,22.0,0.1,0.2\n"),
        );

        let df = load_results(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn missing_file_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.csv");
        let err = load_results(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, FormatError::Csv(_)));
    }

    #[test]
    fn missing_measurement_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        // header lacks cnf-sat-time
        let path = write_csv(
            &dir,
            "output.csv",
            "V,approx1-ratio,approx2-ratio,approx1-time,approx2-time\n5,1.0,1.0,0.1,0.2\n",
        );

        let err = load_results(&path).unwrap_err();
        assert!(matches!(err, FormatError::MissingColumn("cnf-sat-time")));
    }

    #[test]
    fn missing_independent_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "output.csv",
            "approx1-ratio,approx2-ratio,cnf-sat-time,approx1-time,approx2-time\n1.0,1.0,20.0,0.1,0.2\n",
        );

        let err = load_results(&path).unwrap_err();
        assert!(matches!(err, FormatError::MissingColumn("V")));
    }
}
