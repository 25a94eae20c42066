use anyhow::Result;

use chess_masters::cli::Command;
use chess_masters::{handle_completions, handle_serve, handle_show, handle_watch, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port, assets } => handle_serve(*port, assets),
        Command::Show { table } => handle_show(*table),
        Command::Watch { table } => handle_watch(*table),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
