use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Registered tournament participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emergency_contact: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emergency_phone: String,
    #[serde(default)]
    pub registration_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn has_title(&self, title: &str) -> bool {
        self.title.as_deref() == Some(title)
    }
}

/// Insert shape for a registration; id, created_at and registration_date are server side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub rating: i32,
    pub title: Option<String>,
    pub birth_date: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub payment_status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
    #[serde(other)]
    Unknown,
}

/// A board pairing; written by the external tournament process, read-only here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub round: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub board: i32,
    #[serde(default)]
    pub white_player_id: Option<String>,
    #[serde(default)]
    pub black_player_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub moves: i32,
    pub status: MatchStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_move: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub evaluation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub viewers: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub white_player: Option<Player>,
    #[serde(default)]
    pub black_player: Option<Player>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    #[serde(other)]
    Same,
}

/// Standings row; derived and written externally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub games_played: i32,
    pub rank: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tiebreak: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub performance_rating: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trend: Trend,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub player: Option<Player>,
}

/// Contact form submission as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert shape for a contact message; id, created_at and status are server side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category: String,
    pub message: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|title| !title.trim().is_empty()))
}

// numeric columns come back as JSON numbers
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
