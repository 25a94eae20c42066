use serde::Serialize;
use std::str::FromStr;

use crate::domain::{LeaderboardEntry, Player, Trend};
use crate::sync::ViewState;
use crate::views::{Status, country_flag};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StandingsFilter {
    #[default]
    Overall,
    Gm,
    Im,
    Amateur,
}

impl StandingsFilter {
    pub fn accepts(&self, entry: &LeaderboardEntry) -> bool {
        let title = entry.player.as_ref().and_then(|p| p.title.as_deref());
        match self {
            StandingsFilter::Overall => true,
            StandingsFilter::Gm => title == Some("GM"),
            StandingsFilter::Im => title == Some("IM"),
            StandingsFilter::Amateur => title.is_none(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StandingsFilter::Overall => "overall",
            StandingsFilter::Gm => "gm",
            StandingsFilter::Im => "im",
            StandingsFilter::Amateur => "amateur",
        }
    }
}

impl FromStr for StandingsFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "overall" => Ok(StandingsFilter::Overall),
            "gm" => Ok(StandingsFilter::Gm),
            "im" => Ok(StandingsFilter::Im),
            "amateur" => Ok(StandingsFilter::Amateur),
            other => Err(format!("Unknown leaderboard filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBadge {
    Crown,
    Silver,
    Bronze,
    Number,
}

impl RankBadge {
    pub fn for_rank(rank: i32) -> Self {
        match rank {
            1 => RankBadge::Crown,
            2 => RankBadge::Silver,
            3 => RankBadge::Bronze,
            _ => RankBadge::Number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub rank: i32,
    pub badge: RankBadge,
    pub name: String,
    pub title: Option<String>,
    pub flag: &'static str,
    pub rating: Option<i32>,
    pub points: f64,
    pub games_played: i32,
    pub tiebreak: f64,
    pub performance_rating: i32,
    pub trend: Trend,
}

impl From<&LeaderboardEntry> for StandingRow {
    fn from(entry: &LeaderboardEntry) -> Self {
        let player = entry.player.as_ref();
        Self {
            rank: entry.rank,
            badge: RankBadge::for_rank(entry.rank),
            name: player
                .map(Player::full_name)
                .unwrap_or_else(|| "Unknown player".to_string()),
            title: player.and_then(|p| p.title.clone()),
            flag: country_flag(player.map(|p| p.country.as_str()).unwrap_or_default()),
            rating: player.map(|p| p.rating),
            points: entry.points,
            games_played: entry.games_played,
            tiebreak: entry.tiebreak,
            performance_rating: entry.performance_rating,
            trend: entry.trend,
        }
    }
}

/// Standings table, or an explicit empty state instead of an empty table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Standings {
    Rows { rows: Vec<StandingRow> },
    NoResults { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentStats {
    pub total_players: usize,
    pub average_rating: i64,
    pub grandmasters: usize,
    pub completed_rounds: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub filter: StandingsFilter,
    pub standings: Standings,
    pub stats: TournamentStats,
    #[serde(flatten)]
    pub status: Status,
}

pub fn build_leaderboard(
    leaderboard: &ViewState<LeaderboardEntry>,
    players: &ViewState<Player>,
    filter: StandingsFilter,
) -> LeaderboardView {
    let rows: Vec<StandingRow> = leaderboard
        .data
        .iter()
        .filter(|entry| filter.accepts(entry))
        .map(StandingRow::from)
        .collect();

    let standings = if rows.is_empty() {
        Standings::NoResults {
            message: no_results_message(filter),
        }
    } else {
        Standings::Rows { rows }
    };

    LeaderboardView {
        filter,
        standings,
        stats: tournament_stats(&players.data, &leaderboard.data),
        // the player list only feeds the stats strip
        status: Status::of(leaderboard),
    }
}

pub fn tournament_stats(players: &[Player], leaderboard: &[LeaderboardEntry]) -> TournamentStats {
    let average_rating = if players.is_empty() {
        0
    } else {
        let total: i64 = players.iter().map(|p| i64::from(p.rating)).sum();
        (total as f64 / players.len() as f64).round() as i64
    };

    TournamentStats {
        total_players: players.len(),
        average_rating,
        grandmasters: players.iter().filter(|p| p.has_title("GM")).count(),
        completed_rounds: leaderboard
            .iter()
            .map(|e| e.games_played)
            .max()
            .unwrap_or(0)
            .max(0),
    }
}

fn no_results_message(filter: StandingsFilter) -> String {
    match filter {
        StandingsFilter::Overall => {
            "Tournament standings will appear here once matches begin.".to_string()
        }
        other => format!("No players found in the {} category.", other.label()),
    }
}
