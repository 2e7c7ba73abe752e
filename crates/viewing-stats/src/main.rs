mod bootstrap;
mod report;

use anyhow::{Context, Result};
use viewing_core::settings::Settings;
use viewing_data::analysis::analyze_history;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Viewing Stats v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.pipeline_config()?;
    tracing::info!(
        "Top shows: {}, top devices: {}, timezone: {}, mode: {:?}",
        config.top_shows,
        config.top_devices,
        config.timezone,
        config.parse_mode
    );

    let input = settings
        .input
        .clone()
        .or_else(bootstrap::discover_input_path)
        .context(
            "no input given and no ViewingActivity.csv found in the working directory or ~/Downloads",
        )?;
    tracing::info!("Reading viewing history from {}", input.display());

    let analysis = analyze_history(&input, settings.profile.as_deref(), &config)
        .with_context(|| format!("failed to analyse {}", input.display()))?;
    tracing::info!(
        "Run metadata: {}",
        serde_json::to_string(&analysis.metadata)?
    );

    let rendered = report::render(&analysis.result, settings.format)?;
    report::write_report(&rendered, settings.output.as_deref())?;

    if let Some(path) = &settings.output {
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}
