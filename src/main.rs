//! Command-line entry point for the `tokens` binary.

use anyhow::Result;
use clap::Parser;

use tokens_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.subcommand() {
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
        command => {
            logging::init_subscriber(args.verbose, command.name());
            let log = logging::Logger::new(command.name());
            dispatch(&args.global, &command, &log)
        }
    }
}

fn dispatch(global: &cli::GlobalOpts, command: &cli::Command, log: &logging::Logger) -> Result<()> {
    match command {
        cli::Command::Build(opts) => commands::build::run(global, opts, log),
        cli::Command::Check(opts) => commands::check::run(global, opts, log),
        cli::Command::List(opts) => commands::list::run(global, opts, log),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
