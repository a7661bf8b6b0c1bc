//! Entry point for the `todo` binary.

use clap::Parser;
use log::LevelFilter;

use console_todo::cli::Cli;
use console_todo::cmd::*;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> eyre::Result<()> {
    let color = cli.color_enabled();
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(color),
        Commands::ParseDate { text } => cmd_parse_date(&text),
        Commands::Next { from, interval, every, days, count, json } => {
            cmd_next(from, interval, every, days, count, json, color)
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::info!("starting todo {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
