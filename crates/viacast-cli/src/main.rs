// Batch projection driver.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Load config from the base directory (first argument, default cwd),
//    writing the built-in config/engine.toml there if it is missing
// 3. Load lookup tables and stat lines
// 4. Project every player with complete inputs
// 5. Print the JSON report

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use viacast_core::aging::PositionalAgeCurve;
use viacast_core::config;
use viacast_core::loader;
use viacast_core::projection::{project_all, ProjectionContext, ProjectionResult, StatLine};
use viacast_core::trajectory::{cumulative_war, project_forward, SeasonOutlook};

/// Seasons covered by each player's forward outlook.
const OUTLOOK_YEARS: u32 = 10;

#[derive(Debug, Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    players: Vec<PlayerReport>,
    /// Players skipped for missing required inputs.
    unavailable: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PlayerReport {
    #[serde(flatten)]
    projection: ProjectionResult,
    outlook: Vec<SeasonOutlook>,
    outlook_war: f64,
}

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config
    let base_dir = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    if let Some(path) =
        config::ensure_engine_config(&base_dir).context("failed to write default config")?
    {
        info!("Wrote default config to {}", path.display());
    }
    let config = config::load_config_from(&base_dir).context("failed to load configuration")?;
    info!("Config loaded from {}", base_dir.display());

    // 3. Load lookup tables and stat lines
    let paths = config.data_paths.resolved(&base_dir);
    let tables = loader::load_tables(&paths).context("failed to load lookup tables")?;
    let rows = loader::load_stat_lines(std::path::Path::new(&paths.stat_lines))
        .context("failed to load stat lines")?;

    let mut lines = Vec::with_capacity(rows.len());
    let mut unavailable = Vec::new();
    for row in &rows {
        match StatLine::from_row(row) {
            Ok(line) => lines.push(line),
            Err(e) => {
                warn!("projection unavailable: {}", e);
                unavailable.push(e.to_string());
            }
        }
    }

    // 4. Project
    let curve = PositionalAgeCurve::new(config.model.aging.clone());
    let ctx = ProjectionContext {
        tables: &tables,
        model: &config.model,
        age_curve: &curve,
    };
    let players: Vec<PlayerReport> = project_all(&lines, &ctx)
        .into_iter()
        .map(|projection| {
            let outlook = project_forward(
                projection.war,
                projection.wrc_plus,
                projection.projected_ops,
                projection.age,
                projection.position,
                OUTLOOK_YEARS,
                &curve,
            );
            PlayerReport {
                outlook_war: cumulative_war(&outlook),
                outlook,
                projection,
            }
        })
        .collect();
    info!(
        "Projected {} players ({} unavailable)",
        players.len(),
        unavailable.len()
    );

    // 5. Report
    let report = Report {
        generated_at: Utc::now(),
        players,
        unavailable,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("viacast=info,viacast_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
