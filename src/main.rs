//! Crop Resilience Advisor - Main Entry Point
//!
//! Loads both pipelines once, then re-renders the predictions on every input
//! change read from stdin. Frames go to stdout, logs to stderr.

use anyhow::Result;
use crop_resilience_advisor::{
    config::{AppConfig, LogFormat, LoggingConfig},
    host::Session,
    metrics::RenderMetrics,
    models::inference::InferenceEngine,
    presenter::Presenter,
    render::Renderer,
};
use std::io::{self, IsTerminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting Crop Resilience Advisor");
    info!(
        models_dir = %config.models.models_dir,
        display = ?config.display.format,
        "Configuration loaded successfully"
    );

    // Missing or corrupt artifacts end the process here
    let engine = InferenceEngine::from_config(&config)?;
    info!(models = ?engine.model_names(), "Pipelines ready");

    let renderer = Renderer::new(engine, Presenter::from_config(&config.display));
    let metrics = RenderMetrics::new();

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut session = Session::new(&renderer, &metrics).with_prompt(interactive);
    session.run(stdin.lock(), io::stdout().lock())?;

    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("crop_resilience_advisor={}", logging.level)))?;

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }

    Ok(())
}
