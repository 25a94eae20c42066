use serde::Serialize;

use crate::domain::{Match, MatchStatus, Player};
use crate::sync::ViewState;
use crate::views::{Status, country_flag, current_round};

const DECISIVE_EDGE: f64 = 0.5;

/// Which side the engine evaluation favours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationTone {
    White,
    Black,
    Balanced,
}

pub fn evaluation_tone(evaluation: &str) -> EvaluationTone {
    match evaluation.trim().parse::<f64>() {
        Ok(value) if value > DECISIVE_EDGE => EvaluationTone::White,
        Ok(value) if value < -DECISIVE_EDGE => EvaluationTone::Black,
        _ => EvaluationTone::Balanced,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Side {
    pub name: String,
    pub title: Option<String>,
    pub rating: Option<i32>,
    pub flag: &'static str,
}

impl Side {
    fn from_player(player: Option<&Player>) -> Self {
        match player {
            Some(p) => Self {
                name: p.full_name(),
                title: p.title.clone(),
                rating: Some(p.rating),
                flag: country_flag(&p.country),
            },
            None => Self {
                name: "TBD".to_string(),
                title: None,
                rating: None,
                flag: country_flag(""),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub id: String,
    pub round: i32,
    pub board: i32,
    pub white: Side,
    pub black: Side,
    pub result: String,
    pub moves: i32,
    pub last_move: String,
    pub evaluation: String,
    pub tone: EvaluationTone,
    pub viewers: i64,
}

impl From<&Match> for BoardCard {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id.clone(),
            round: m.round,
            board: m.board,
            white: Side::from_player(m.white_player.as_ref()),
            black: Side::from_player(m.black_player.as_ref()),
            result: m.result.clone(),
            moves: m.moves,
            last_move: m.last_move.clone(),
            evaluation: m.evaluation.clone(),
            tone: evaluation_tone(&m.evaluation),
            viewers: m.viewers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatchesView {
    pub current_round: i32,
    pub total_viewers: i64,
    pub live: Vec<BoardCard>,
    pub upcoming: Vec<BoardCard>,
    pub completed: Vec<BoardCard>,
    pub no_matches: bool,
    #[serde(flatten)]
    pub status: Status,
}

pub fn build_live_matches(matches: &ViewState<Match>) -> LiveMatchesView {
    let cards = |status: MatchStatus| -> Vec<BoardCard> {
        matches
            .data
            .iter()
            .filter(|m| m.status == status)
            .map(BoardCard::from)
            .collect()
    };
    let live = cards(MatchStatus::Live);

    LiveMatchesView {
        current_round: current_round(&matches.data),
        total_viewers: live.iter().map(|c| c.viewers).sum(),
        upcoming: cards(MatchStatus::Upcoming),
        completed: cards(MatchStatus::Completed),
        live,
        no_matches: matches.data.is_empty(),
        status: Status::of(matches),
    }
}
