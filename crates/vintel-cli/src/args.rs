//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vintel")]
#[command(about = "Video intelligence and auto-edit pipeline", long_about = None, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze a local video file and print the result as JSON
    Analyze(AnalyzeArgs),

    /// Print container information reported by ffprobe
    Probe {
        /// Media file to probe
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective analysis configuration
    Config {
        /// JSON config file to merge over the defaults
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Video file to analyze
    pub file: PathBuf,

    /// Also run the auto-editor
    #[arg(long)]
    pub auto_edit: bool,

    /// Also emit beat-synchronised split actions
    #[arg(long)]
    pub beats: bool,

    /// Highlight reel budget in seconds
    #[arg(long, value_name = "SECS")]
    pub reel_budget: Option<f64>,

    /// JSON config file (missing fields keep their defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Coarser sampling for quick previews (not combinable with --config)
    #[arg(long, conflicts_with = "config")]
    pub fast: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Print a Prometheus metrics snapshot to stderr when done
    #[arg(long)]
    pub metrics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::parse_from([
            "vintel",
            "analyze",
            "clip.mp4",
            "--auto-edit",
            "--reel-budget",
            "45",
            "--pretty",
        ]);

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.file, PathBuf::from("clip.mp4"));
        assert!(args.auto_edit);
        assert!(!args.beats);
        assert_eq!(args.reel_budget, Some(45.0));
        assert!(args.pretty);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_fast_conflicts_with_config_file() {
        let result = Cli::try_parse_from(["vintel", "analyze", "clip.mp4", "--fast", "--config", "vintel.json"]);
        assert!(result.is_err());

        let cli = Cli::parse_from(["vintel", "analyze", "clip.mp4", "--fast"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert!(args.fast);
    }
}
