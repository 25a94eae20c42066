pub mod forms;
pub mod models;

pub use forms::FormFields;
pub use models::{
    ContactMessage, LeaderboardEntry, Match, MatchStatus, NewContactMessage, NewPlayer, Player,
    Trend,
};
