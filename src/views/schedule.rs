use serde::Serialize;

use crate::config::{SideEvent, TournamentDay, get_tournament_days, round_start_time};
use crate::domain::{Match, MatchStatus};
use crate::sync::ViewState;
use crate::views::{Status, count_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Upcoming,
    Live,
    Completed,
}

/// No pairings yet or anything unfinished without a live board is upcoming
pub fn round_status(matches: &[Match], round: i32) -> RoundStatus {
    let in_round: Vec<&Match> = matches.iter().filter(|m| m.round == round).collect();
    if in_round.is_empty() {
        return RoundStatus::Upcoming;
    }
    if in_round.iter().all(|m| m.status == MatchStatus::Completed) {
        return RoundStatus::Completed;
    }
    if in_round.iter().any(|m| m.status == MatchStatus::Live) {
        return RoundStatus::Live;
    }
    RoundStatus::Upcoming
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSlot {
    pub round: i32,
    pub start_time: Option<&'static str>,
    pub status: RoundStatus,
    pub scheduled_matches: usize,
    pub live_matches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSlot {
    pub time: &'static str,
    pub name: &'static str,
    pub location: &'static str,
}

impl From<&SideEvent> for EventSlot {
    fn from(event: &SideEvent) -> Self {
        Self {
            time: event.time,
            name: event.name,
            location: event.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTab {
    pub number: u32,
    pub date: &'static str,
    pub weekday: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTotals {
    pub completed: usize,
    pub live: usize,
    pub upcoming: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub days: Vec<DayTab>,
    pub selected_day: u32,
    pub date: &'static str,
    pub weekday: &'static str,
    pub rounds: Vec<RoundSlot>,
    pub events: Vec<EventSlot>,
    pub totals: MatchTotals,
    #[serde(flatten)]
    pub status: Status,
}

/// Unknown day numbers fall back to the first day
pub fn build_schedule(matches: &ViewState<Match>, selected_day: u32) -> ScheduleView {
    let days = get_tournament_days();
    let day = days
        .iter()
        .find(|d| d.number == selected_day)
        .or_else(|| days.first())
        .cloned()
        .unwrap_or_else(empty_day);

    let rounds = day
        .rounds
        .iter()
        .map(|&round| RoundSlot {
            round,
            start_time: round_start_time(round),
            status: round_status(&matches.data, round),
            scheduled_matches: matches.data.iter().filter(|m| m.round == round).count(),
            live_matches: matches
                .data
                .iter()
                .filter(|m| m.round == round && m.status == MatchStatus::Live)
                .count(),
        })
        .collect();

    ScheduleView {
        days: days
            .iter()
            .map(|d| DayTab {
                number: d.number,
                date: d.date,
                weekday: d.weekday,
            })
            .collect(),
        selected_day: day.number,
        date: day.date,
        weekday: day.weekday,
        rounds,
        events: day.events.iter().map(EventSlot::from).collect(),
        totals: MatchTotals {
            completed: count_status(&matches.data, MatchStatus::Completed),
            live: count_status(&matches.data, MatchStatus::Live),
            upcoming: count_status(&matches.data, MatchStatus::Upcoming),
        },
        status: Status::of(matches),
    }
}

fn empty_day() -> TournamentDay {
    TournamentDay {
        number: 0,
        date: "",
        weekday: "",
        rounds: Vec::new(),
        events: Vec::new(),
    }
}
