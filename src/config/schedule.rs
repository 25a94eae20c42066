/// A side event on a tournament day (breaks, ceremonies)
#[derive(Debug, Clone, PartialEq)]
pub struct SideEvent {
    pub time: &'static str,
    pub name: &'static str,
    pub location: &'static str,
}

impl SideEvent {
    pub fn new(time: &'static str, name: &'static str, location: &'static str) -> Self {
        Self { time, name, location }
    }
}

/// One day of the tournament with the rounds played on it
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentDay {
    pub number: u32,
    pub date: &'static str,
    pub weekday: &'static str,
    pub rounds: Vec<i32>,
    pub events: Vec<SideEvent>,
}

/// Get the fixed tournament programme
pub fn get_tournament_days() -> Vec<TournamentDay> {
    vec![
        TournamentDay {
            number: 1,
            date: "March 15, 2025",
            weekday: "Friday",
            rounds: vec![1, 2, 3],
            events: vec![
                SideEvent::new("9:00 AM", "Registration & Check-in", "Lobby"),
                SideEvent::new("12:00 PM", "Lunch Break", "Cafeteria"),
                SideEvent::new("4:30 PM", "Coffee Break", "Lounge"),
            ],
        },
        TournamentDay {
            number: 2,
            date: "March 16, 2025",
            weekday: "Saturday",
            rounds: vec![4, 5, 6, 7],
            events: vec![
                SideEvent::new("8:30 AM", "Morning Coffee", "Lounge"),
                SideEvent::new("11:00 AM", "Short Break", "Lounge"),
                SideEvent::new("2:00 PM", "Lunch Break", "Cafeteria"),
                SideEvent::new("6:00 PM", "Dinner Break", "Cafeteria"),
            ],
        },
        TournamentDay {
            number: 3,
            date: "March 17, 2025",
            weekday: "Sunday",
            rounds: vec![8, 9],
            events: vec![
                SideEvent::new("9:30 AM", "Morning Coffee", "Lounge"),
                SideEvent::new("12:00 PM", "Lunch Break", "Cafeteria"),
                SideEvent::new("4:30 PM", "Closing Ceremony", "Main Hall A"),
                SideEvent::new("5:30 PM", "Prize Distribution", "Main Hall A"),
            ],
        },
    ]
}

/// Scheduled start time of a round
pub fn round_start_time(round: i32) -> Option<&'static str> {
    match round {
        1 => Some("10:00 AM"),
        2 => Some("2:00 PM"),
        3 => Some("6:00 PM"),
        4 => Some("9:00 AM"),
        5 => Some("12:30 PM"),
        6 => Some("4:00 PM"),
        7 => Some("7:30 PM"),
        8 => Some("10:00 AM"),
        9 => Some("2:00 PM"),
        _ => None,
    }
}
