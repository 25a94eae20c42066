pub mod schedule;
pub mod settings;

pub use schedule::{get_tournament_days, round_start_time, SideEvent, TournamentDay};
pub use settings::{AppConfig, RemoteSettings, ServerSettings};
