use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{ContactMessage, LeaderboardEntry, Match, NewContactMessage, NewPlayer, Player};
use crate::remote::{OrderBy, SelectQuery};

/// A remote table with a fixed read shape and sort order
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Insert shape, without server-generated fields
    type Draft: Serialize + Send + Sync;

    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const ORDER: &'static [OrderBy];

    fn query() -> SelectQuery {
        SelectQuery {
            table: Self::TABLE,
            columns: Self::COLUMNS,
            order: Self::ORDER,
        }
    }
}

/// Tables that publish row-change notifications
pub trait LiveEntity: Entity {}

impl Entity for Player {
    type Draft = NewPlayer;

    const TABLE: &'static str = "players";
    const COLUMNS: &'static str = "*";
    const ORDER: &'static [OrderBy] = &[OrderBy::desc("created_at")];
}

impl Entity for Match {
    // written by the tournament management process only
    type Draft = serde_json::Value;

    const TABLE: &'static str = "matches";
    const COLUMNS: &'static str = "*,\
        white_player:players!white_player_id(*),\
        black_player:players!black_player_id(*)";
    const ORDER: &'static [OrderBy] = &[OrderBy::asc("round"), OrderBy::asc("board")];
}

impl LiveEntity for Match {}

impl Entity for LeaderboardEntry {
    type Draft = serde_json::Value;

    const TABLE: &'static str = "leaderboard";
    const COLUMNS: &'static str = "*,player:players(*)";
    const ORDER: &'static [OrderBy] = &[OrderBy::asc("rank")];
}

impl LiveEntity for LeaderboardEntry {}

impl Entity for ContactMessage {
    type Draft = NewContactMessage;

    const TABLE: &'static str = "contact_messages";
    const COLUMNS: &'static str = "*";
    const ORDER: &'static [OrderBy] = &[OrderBy::desc("created_at")];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_queries() {
        assert_eq!(
            Player::query().to_query_string(),
            "select=%2A&order=created_at.desc"
        );
        assert_eq!(
            Match::query().to_query_string(),
            "select=%2A%2Cwhite_player%3Aplayers%21white_player_id%28%2A%29%2Cblack_player%3Aplayers%21black_player_id%28%2A%29&order=round.asc,board.asc"
        );
        assert_eq!(LeaderboardEntry::query().table, "leaderboard");
        assert_eq!(
            LeaderboardEntry::query().to_query_string(),
            "select=%2A%2Cplayer%3Aplayers%28%2A%29&order=rank.asc"
        );
        assert_eq!(ContactMessage::query().table, "contact_messages");
    }
}
