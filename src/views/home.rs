use serde::Serialize;

use crate::domain::{LeaderboardEntry, Match, MatchStatus, Player};
use crate::sync::ViewState;
use crate::views::{Status, TOTAL_ROUNDS, count_status, current_round};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub registered_players: usize,
    pub completed_matches: usize,
    pub live_matches: usize,
    pub upcoming_matches: usize,
    pub current_round: i32,
    pub rounds_label: String,
    pub tournament_banner: Option<String>,
    pub leader: Option<String>,
    #[serde(flatten)]
    pub status: Status,
}

pub fn build_home(
    players: &ViewState<Player>,
    matches: &ViewState<Match>,
    leaderboard: &ViewState<LeaderboardEntry>,
) -> HomeView {
    let completed = count_status(&matches.data, MatchStatus::Completed);
    let live = count_status(&matches.data, MatchStatus::Live);
    let upcoming = count_status(&matches.data, MatchStatus::Upcoming);
    let round = current_round(&matches.data);

    let rounds_label = if round > 0 {
        format!("{round}/{TOTAL_ROUNDS}")
    } else {
        TOTAL_ROUNDS.to_string()
    };

    let tournament_banner = if live > 0 {
        Some(format!("{live} matches currently in progress"))
    } else if completed > 0 {
        Some(format!("Round {round} completed - {upcoming} matches remaining"))
    } else {
        None
    };

    let leader = leaderboard
        .data
        .iter()
        .find(|entry| entry.rank == 1)
        .and_then(|entry| entry.player.as_ref())
        .map(Player::full_name);

    HomeView {
        registered_players: players.data.len(),
        completed_matches: completed,
        live_matches: live,
        upcoming_matches: upcoming,
        current_round: round,
        rounds_label,
        tournament_banner,
        leader,
        status: Status::merge(&[
            Status::of(players),
            Status::of(matches),
            Status::of(leaderboard),
        ]),
    }
}
