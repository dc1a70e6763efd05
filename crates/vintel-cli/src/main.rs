//! `vintel` binary: runs the analysis pipeline on a local file through FFmpeg.

mod args;
mod logging;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use vintel_media::{
    probe_media, AnalysisConfig, AnalysisProgress, CancelSignal, EditorSession, ExportSelection,
    FfmpegAudioDecoder, FfmpegSource, MediaError, MediaSource,
};

use crate::args::{AnalyzeArgs, Cli, Commands};
use crate::report::{to_json, Report};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = logging::init_tracing() {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e:#}");
        if is_transient(&e) {
            eprintln!("note: this failure may be transient, retrying may succeed");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => analyze(args).await,
        Commands::Probe { file, pretty } => {
            let config = AnalysisConfig::from_env();
            let info = probe_media(&file, config.ffmpeg_timeout_secs)
                .await
                .with_context(|| format!("Failed to probe {}", file.display()))?;
            println!("{}", to_json(&info, pretty)?);
            Ok(())
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref(), false)?;
            println!("{}", to_json(&config, true)?);
            Ok(())
        }
    }
}

/// Whether any pipeline error in the chain is worth retrying.
fn is_transient(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<MediaError>())
        .any(MediaError::is_retryable)
}

/// Defaults (or a JSON file), then `VINTEL_*` overrides.
fn load_config(path: Option<&std::path::Path>, fast: bool) -> Result<AnalysisConfig> {
    let base = match path {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if fast => AnalysisConfig::fast(),
        None => AnalysisConfig::default(),
    };
    let config = base.with_env_overrides();
    config.validate().context("Invalid analysis configuration")?;
    Ok(config)
}

fn install_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let metrics = if args.metrics {
        Some(install_metrics()?)
    } else {
        None
    };

    let mut config = load_config(args.config.as_deref(), args.fast)?;
    if let Some(budget) = args.reel_budget {
        config = config.with_reel_budget(budget);
    }

    let (cancel_tx, cancel) = CancelSignal::channel();
    spawn_ctrl_c_handler(cancel_tx);

    let mut source = FfmpegSource::open(&args.file, config.ffmpeg_timeout_secs, cancel.clone())
        .await
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let decoder = FfmpegAudioDecoder::new(config.ffmpeg_timeout_secs, cancel.clone());

    info!(
        file = %args.file.display(),
        width = source.info().width,
        height = source.info().height,
        has_audio = source.info().has_audio,
        "Opened source"
    );
    if !source.info().has_audio {
        warn!("Source has no audio stream, audio signals will be synthetic");
    }

    let mut session = EditorSession::new(config)
        .with_cancel(cancel)
        .with_progress(Arc::new(|p: AnalysisProgress| {
            debug!(stage = p.label(), percent = format!("{:.0}", p.percent), "Progress");
        }));

    session
        .analyze(&mut source, &decoder)
        .await
        .context("Analysis failed")?;

    if args.auto_edit {
        session.auto_edit().context("Auto-edit failed")?;
    }

    let beat_sync = if args.beats {
        Some(session.beat_sync_actions()?)
    } else {
        None
    };

    let export_plan = if args.auto_edit {
        Some(session.export_plan(ExportSelection::HighlightReel, false)?)
    } else {
        None
    };

    let analysis = session.analysis().context("Session holds no analysis")?;
    let report = Report {
        session_id: session.id().to_string(),
        source: source.id(),
        analysis,
        auto_edit: session.auto_edit_result(),
        beat_sync,
        export_plan,
    };
    println!("{}", to_json(&report, args.pretty)?);

    if let Some(handle) = metrics {
        eprintln!("{}", handle.render());
    }

    Ok(())
}

/// Flip the cancel signal on Ctrl-C so in-flight FFmpeg calls are killed.
fn spawn_ctrl_c_handler(tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, cancelling analysis");
            tx.send(true).ok();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vintel.json");
        std::fs::write(&path, r#"{ "auto_edit": { "reel_budget": 30.0 } }"#).unwrap();

        let config = load_config(Some(&path), false).unwrap();
        assert!((config.auto_edit.reel_budget - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transient_errors_are_detected_through_context() {
        let timed_out = anyhow::Error::new(MediaError::Timeout(120)).context("Analysis failed");
        assert!(is_transient(&timed_out));

        let cancelled = anyhow::Error::new(MediaError::Cancelled).context("Analysis failed");
        assert!(!is_transient(&cancelled));

        assert!(!is_transient(&anyhow::anyhow!("plain failure")));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Some(std::path::Path::new("/nonexistent/vintel.json")), false).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load config"));
    }
}
