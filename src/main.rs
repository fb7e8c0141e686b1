//! vcplot - Vertex Cover Benchmark Post-Processing
//!
//! Aggregates repeated solver trials from the harness CSV and renders the
//! approximation-ratio and run-time comparison charts.

mod charts;
mod data;
mod stats;

use std::path::Path;

use anyhow::Context;
use tracing::info;

/// Results file written by the benchmark harness.
const RESULTS_PATH: &str = "build/output.csv";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let df = data::load_results(RESULTS_PATH)
        .with_context(|| format!("failed to load benchmark results from {RESULTS_PATH}"))?;
    info!(rows = df.height(), "loaded benchmark trials");

    let mut summary = data::aggregate(&df)?;
    summary.attach_sem();
    info!(groups = summary.groups().len(), "aggregated trials by V");

    charts::render_ratio_chart(&summary, Path::new(charts::RATIO_CHART_PATH))?;
    charts::render_time_chart(&summary, Path::new(charts::TIME_CHART_PATH))?;
    info!(
        "charts written to {} and {}",
        charts::RATIO_CHART_PATH,
        charts::TIME_CHART_PATH
    );

    // Hand the charts to the default viewer; headless environments skip this.
    for path in [charts::RATIO_CHART_PATH, charts::TIME_CHART_PATH] {
        let _ = open::that_detached(path);
    }

    Ok(())
}
