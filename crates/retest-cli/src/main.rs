//! retest CLI - retry failing CI checks on labeled pull requests.

use clap::Parser;

mod commands;
mod host;
mod logging;
mod output;

use commands::{Cli, Commands, Settings};

fn main() {
    let cli = Cli::parse();

    output::set_quiet(cli.quiet);
    logging::init(cli.json, cli.quiet);

    let result = Settings::load(&cli.config).and_then(|settings| {
        match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
            Commands::Run { dry_run } => commands::run::run(&settings, dry_run),
            Commands::Check => commands::check::run(&settings),
        }
    });

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
