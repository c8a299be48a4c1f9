use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use eyes_break::cli::args::{Cli, Commands, RunArgs};
use eyes_break::cli::commands;
use eyes_break::config::{Paths, SettingsStore};
use eyes_break::error::EyesBreakError;
use eyes_break::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        let code = e
            .downcast_ref::<EyesBreakError>()
            .map_or(1, EyesBreakError::exit_code);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;
    let paths = Paths::new()?;

    let command = cli.command.unwrap_or(Commands::Tui);
    let interactive = match &command {
        Commands::Tui => true,
        Commands::Run(args) => !args.headless,
        _ => false,
    };
    if !matches!(command, Commands::Completions { .. }) {
        paths.ensure_dirs()?;
    }
    if matches!(command, Commands::Tui | Commands::Run(_)) {
        let log_file = interactive.then_some(paths.log_file.as_path());
        logging::init(cli.verbose, log_file).context("logging setup")?;
    }

    let store = SettingsStore::new(paths.settings_file.clone());

    let output = match command {
        Commands::Tui => {
            commands::session(&paths, store, false, format)?;
            String::new()
        },
        Commands::Run(RunArgs { headless }) => {
            commands::session(&paths, store, headless, format)?;
            String::new()
        },
        Commands::Config(args) => commands::config(&store, args.command, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
