//! View models for each route, computed from binding snapshots.

pub mod forms;
pub mod home;
pub mod leaderboard;
pub mod live;
pub mod schedule;

use serde::Serialize;

use crate::domain::{Match, MatchStatus};
use crate::sync::ViewState;

pub const TOTAL_ROUNDS: i32 = 9;

/// Loading/error banner shared by every data-backed view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
}

impl Status {
    pub fn of<T>(state: &ViewState<T>) -> Self {
        Self {
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Loading if any source is; the first error wins
    pub fn merge(states: &[Status]) -> Self {
        Self {
            loading: states.iter().any(|s| s.loading),
            error: states.iter().find_map(|s| s.error.clone()),
        }
    }
}

pub fn count_status(matches: &[Match], status: MatchStatus) -> usize {
    matches.iter().filter(|m| m.status == status).count()
}

/// Highest round seen, 0 before any pairing exists
pub fn current_round(matches: &[Match]) -> i32 {
    matches.iter().map(|m| m.round).max().unwrap_or(0).max(0)
}

pub fn country_flag(country: &str) -> &'static str {
    match country {
        "US" => "🇺🇸",
        "CA" => "🇨🇦",
        "UK" => "🇬🇧",
        "DE" => "🇩🇪",
        "FR" => "🇫🇷",
        "RU" => "🇷🇺",
        "IN" => "🇮🇳",
        "CN" => "🇨🇳",
        _ => "🏳️",
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{LeaderboardEntry, Match, MatchStatus, Player, Trend};

    pub fn player(id: &str, rating: i32, title: Option<&str>, country: &str) -> Player {
        Player {
            id: id.to_string(),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            email: format!("{id}@example.com"),
            phone: String::new(),
            country: country.to_string(),
            rating,
            title: title.map(str::to_string),
            birth_date: String::new(),
            emergency_contact: String::new(),
            emergency_phone: String::new(),
            registration_date: None,
            payment_status: "pending".to_string(),
            created_at: None,
        }
    }

    pub fn game(round: i32, board: i32, status: MatchStatus, viewers: i64) -> Match {
        Match {
            id: format!("r{round}b{board}"),
            round,
            board,
            white_player_id: None,
            black_player_id: None,
            result: String::new(),
            moves: 0,
            status,
            start_time: None,
            end_time: None,
            last_move: String::new(),
            evaluation: String::new(),
            viewers,
            created_at: None,
            white_player: None,
            black_player: None,
        }
    }

    pub fn standing(rank: i32, games_played: i32, player: Option<Player>) -> LeaderboardEntry {
        LeaderboardEntry {
            id: format!("l{rank}"),
            player_id: player.as_ref().map(|p| p.id.clone()),
            points: f64::from(games_played) / 2.0,
            games_played,
            rank,
            tiebreak: 0.0,
            performance_rating: 2000,
            trend: Trend::Same,
            updated_at: None,
            player,
        }
    }
}
