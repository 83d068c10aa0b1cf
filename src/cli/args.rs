use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "studyfocus")]
#[command(about = "A study timer that tracks whether you are facing your work")]
#[command(long_about = "studyfocus - head-angle study focus timer

Samples face landmarks on a fixed cadence, classifies you as focused or
distracted from your head angle, and accumulates time in each state.

QUICK START:
  studyfocus run -t session.yaml       Live timer driven by a recorded trace
  studyfocus replay session.yaml -d 5m Simulate a session and print a summary
  studyfocus angle face.json           Estimate the head angle of one face
  studyfocus format-time 3600000       Render milliseconds as a clock

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  studyfocus <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Configuration file (defaults to ~/.studyfocus/config.yaml)
    #[arg(short, long, global = true, env = "STUDYFOCUS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the live focus timer
    ///
    /// Opens the terminal timer. Detection results come from a recorded
    /// trace played back in real time; without one, no face is ever seen.
    ///
    /// KEYS:
    ///   s  start / resume      p  pause        r  reset
    ///   +  raise sensitivity   -  lower sensitivity
    ///   ]  raise threshold     [  lower threshold
    ///   q  quit
    Run(RunArgs),

    /// Simulate a session against a recorded trace
    ///
    /// Plays the trace on a simulated clock, so a five minute session
    /// finishes instantly, and prints the resulting summary.
    ///
    /// # Examples
    ///
    ///   studyfocus replay session.yaml
    ///   studyfocus replay session.yaml --duration 10m --threshold 20
    Replay(ReplayArgs),

    /// Estimate the head angle of one face
    ///
    /// Reads a YAML or JSON file holding either grouped landmarks
    /// (nose, left_eye, right_eye) or the 68 raw points.
    Angle {
        /// Landmark file
        file: PathBuf,

        /// Threshold to classify against (defaults to the configured one)
        #[arg(long, short = 't')]
        threshold: Option<u32>,
    },

    /// Render milliseconds as MM:SS or HH:MM:SS
    FormatTime {
        /// Duration in milliseconds
        ms: u64,
    },

    /// Model asset management
    Models(ModelsArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: studyfocus completions zsh > ~/.zsh/completions/_studyfocus
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Recorded trace to play back
    #[arg(long, short = 't')]
    pub trace: Option<PathBuf>,

    /// Start the timer immediately
    #[arg(long)]
    pub autostart: bool,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Recorded trace to play back
    pub trace: PathBuf,

    /// Session length (e.g. 90s, 5m, 1h30m); defaults to the trace length
    #[arg(long, short = 'd')]
    pub duration: Option<String>,

    /// Focus angle threshold in degrees
    #[arg(long, short = 't')]
    pub threshold: Option<u32>,

    /// Detector sensitivity (0.1 - 0.9)
    #[arg(long, short = 's')]
    pub sensitivity: Option<f64>,
}

#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommands,
}

#[derive(Subcommand)]
pub enum ModelsCommands {
    /// Check that all model weight manifests are present
    Check {
        /// Model directory (defaults to the configured one)
        dir: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_output_flag() {
        let cli = parse(&["studyfocus", "--output", "json", "format-time", "0"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));

        let cli = parse(&["studyfocus", "format-time", "0", "-o", "pretty"]);
        assert_eq!(cli.output, Some(OutputFormat::Pretty));

        let cli = parse(&["studyfocus", "format-time", "0"]);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_replay() {
        let cli = parse(&[
            "studyfocus",
            "replay",
            "trace.yaml",
            "-d",
            "5m",
            "--threshold",
            "20",
        ]);
        if let Commands::Replay(args) = cli.command {
            assert_eq!(args.trace, PathBuf::from("trace.yaml"));
            assert_eq!(args.duration.as_deref(), Some("5m"));
            assert_eq!(args.threshold, Some(20));
            assert!(args.sensitivity.is_none());
        } else {
            panic!("Expected Replay command");
        }
    }

    #[test]
    fn test_cli_run() {
        let cli = parse(&["studyfocus", "run", "--trace", "trace.yaml", "--autostart"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.trace, Some(PathBuf::from("trace.yaml")));
            assert!(args.autostart);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_format_time() {
        let cli = parse(&["studyfocus", "format-time", "59999"]);
        assert!(matches!(cli.command, Commands::FormatTime { ms: 59_999 }));
    }

    #[test]
    fn test_cli_config_init() {
        let cli = parse(&["studyfocus", "config", "init", "--force"]);
        if let Commands::Config(args) = cli.command {
            assert!(matches!(args.command, ConfigCommands::Init { force: true }));
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_completions() {
        let cli = parse(&["studyfocus", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Zsh }
        ));
    }

    #[test]
    fn test_cli_rejects_negative_ms() {
        assert!(Cli::try_parse_from(["studyfocus", "format-time", "-5"]).is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Pretty));
    }
}
