use clap::Parser;

use crate::cmd::Commands;

/// Console todo tracker with due dates and recurring tasks.
/// Tasks live in memory for the length of the session.
#[derive(Parser)]
#[command(name = "todo", version, about = "Console todo tracker with recurring tasks")]
pub struct Cli {
    /// Disable coloured output (also honours NO_COLOR).
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Defaults to the interactive menu.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether output should carry terminal colours.
    pub fn color_enabled(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}
