use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::sync::Arc;

use crate::accessors::{Accessor, Entity, LiveEntity};
use crate::cli::{LiveTable, Table};
use crate::domain::{LeaderboardEntry, Match, MatchStatus, Player, Trend};
use crate::errors::remote_context;
use crate::remote::RemoteDataService;
use crate::sync::{Binding, ViewState};

/// One printable line per record
pub trait ConsoleLine {
    fn console_line(&self) -> String;
}

impl ConsoleLine for Player {
    fn console_line(&self) -> String {
        let title = self.title.as_deref().unwrap_or("");
        format!(
            "{:<4} {:<28} {:>5} {}",
            title.yellow(),
            self.full_name(),
            self.rating,
            self.country.dimmed()
        )
    }
}

impl ConsoleLine for Match {
    fn console_line(&self) -> String {
        let name = |player: &Option<Player>| {
            player
                .as_ref()
                .map(Player::full_name)
                .unwrap_or_else(|| "TBD".to_string())
        };
        let status = match self.status {
            MatchStatus::Live => "live".red().bold(),
            MatchStatus::Completed => "completed".green(),
            MatchStatus::Upcoming => "upcoming".normal(),
            MatchStatus::Unknown => "unknown".dimmed(),
        };
        format!(
            "R{} B{:<3} {:<24} vs {:<24} {:<9} {}",
            self.round,
            self.board,
            name(&self.white_player),
            name(&self.black_player),
            status,
            self.result
        )
    }
}

impl ConsoleLine for LeaderboardEntry {
    fn console_line(&self) -> String {
        let name = self
            .player
            .as_ref()
            .map(Player::full_name)
            .unwrap_or_default();
        let trend = match self.trend {
            Trend::Up => "▲".green(),
            Trend::Down => "▼".red(),
            Trend::Same => "-".dimmed(),
        };
        format!(
            "{:>3}. {:<28} {:>4.1} pts  {:>2} games  {}",
            self.rank, name, self.points, self.games_played, trend
        )
    }
}

pub struct ConsoleService {
    service: Arc<dyn RemoteDataService>,
}

impl ConsoleService {
    pub fn new(service: Arc<dyn RemoteDataService>) -> Self {
        Self { service }
    }

    pub async fn show(&self, table: Table) -> Result<()> {
        match table {
            Table::Players => self.show_table::<Player>().await,
            Table::Matches => self.show_table::<Match>().await,
            Table::Leaderboard => self.show_table::<LeaderboardEntry>().await,
        }
    }

    pub async fn watch(&self, table: LiveTable) -> Result<()> {
        match table {
            LiveTable::Matches => self.watch_table::<Match>().await,
            LiveTable::Leaderboard => self.watch_table::<LeaderboardEntry>().await,
        }
    }

    async fn show_table<E: Entity + ConsoleLine>(&self) -> Result<()> {
        let records = Accessor::<E>::new(Arc::clone(&self.service))
            .fetch_all()
            .await
            .with_context(|| remote_context("fetch", E::TABLE))?;

        println!("{}", E::TABLE.bold());
        print_records(&records);
        Ok(())
    }

    async fn watch_table<E: LiveEntity + ConsoleLine>(&self) -> Result<()> {
        let binding = Binding::<E>::new(Arc::clone(&self.service));
        let mut updates = binding.watch();

        binding
            .mount_live()
            .await
            .with_context(|| remote_context("subscribe to", E::TABLE))?;
        info!("Watching {} for changes, press Ctrl-C to stop", E::TABLE);
        let initial = updates.borrow_and_update().clone();
        print_state(&initial);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = updates.borrow_and_update().clone();
                    if !state.loading {
                        print_state(&state);
                    }
                }
            }
        }

        binding.teardown();
        Ok(())
    }
}

fn print_records<E: ConsoleLine>(records: &[E]) {
    if records.is_empty() {
        println!("{}", "(no rows)".dimmed());
    }
    for record in records {
        println!("{}", record.console_line());
    }
}

fn print_state<E: Entity + ConsoleLine>(state: &ViewState<E>) {
    println!();
    println!("{} ({} rows)", E::TABLE.bold(), state.data.len());
    if let Some(error) = &state.error {
        println!("{} {}", "error:".red().bold(), error);
    }
    print_records(&state.data);
}
