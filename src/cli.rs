use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chess Masters tournament site backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Serve the tournament views and forms over HTTP
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Directory with the built front-end assets
        #[arg(short, long, default_value = "dist")]
        assets: String,
    },
    /// Fetch one collection and print it
    Show {
        #[arg(value_enum)]
        table: Table,
    },
    /// Print a collection and re-print it on every remote change
    Watch {
        #[arg(value_enum)]
        table: LiveTable,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Players,
    Matches,
    Leaderboard,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveTable {
    Matches,
    Leaderboard,
}
