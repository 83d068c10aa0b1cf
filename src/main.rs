use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use studyfocus::cli::args::{Cli, Commands, ConfigArgs, ConfigCommands};
use studyfocus::cli::{commands, logging};
use studyfocus::config::Config;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = commands::config_path(cli.config.as_deref())?;

    // The live timer draws on stderr's terminal; its records go to a file.
    let log_file = matches!(cli.command, Commands::Run(_))
        .then(|| logging::tui_log_file(&config_path));
    logging::builder(log_file.as_deref())?.init();

    let config = match commands::load_config(Some(&config_path)) {
        Ok(config) => config,
        // A broken file must not block locating or replacing it.
        Err(e) if matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                command: ConfigCommands::Path | ConfigCommands::Init { .. }
            })
        ) =>
        {
            log::warn!("{e}");
            Config::default()
        }
        Err(e) => return Err(e).with_context(|| format!("loading {}", config_path.display())),
    };
    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        Commands::Run(args) => commands::run(&args, &config)?,
        Commands::Replay(args) => commands::replay(&args, &config, format)?,
        Commands::Angle { file, threshold } => commands::angle(&file, threshold, &config, format)?,
        Commands::FormatTime { ms } => commands::format_time(ms, format)?,
        Commands::Models(args) => commands::models(args.command, &config, format)?,
        Commands::Config(args) => commands::config(args.command, &config_path, &config, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
