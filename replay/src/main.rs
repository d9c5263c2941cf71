//! Replay newline-delimited JSON login attempts and print risk assessments.
//!
//! ```bash
//! REPLAY_INPUT=attempts.jsonl REPLAY_GEO_TABLE=geo_table.json login-risk-replay > assessments.jsonl
//! ```

use anyhow::Context;
use login_risk_engine::RiskDetector;
use login_risk_engine::sinks::TracingSink;
use login_risk_replay::{InputSource, ReplayConfig, ReplayResolver, ReplayStore, run_replay};
use std::fs::File;
use std::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize tracing; stdout carries the assessments
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "login_risk_replay=info,login_risk_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = ReplayConfig::from_env().context("Invalid detector configuration")?;
    info!(
        input = ?config.input,
        redis = config.redis_url.is_some(),
        max_travel_speed_kmh = config.detector.max_travel_speed_kmh,
        "Starting replay"
    );

    let resolver = ReplayResolver::from_config(&config)?;
    let store = ReplayStore::from_config(&config).await?;
    let detector = RiskDetector::new(config.detector.clone(), resolver, store, TracingSink)?;

    let stdout = io::stdout().lock();
    let summary = match &config.input {
        InputSource::Stdin => run_replay(&detector, io::stdin().lock(), stdout).await?,
        InputSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            run_replay(&detector, BufReader::new(file), stdout).await?
        }
    };

    if summary.unsaved_profiles > 0 {
        tracing::warn!(
            unsaved = summary.unsaved_profiles,
            "Some profiles were not saved; later runs will see less history"
        );
    }

    Ok(())
}
