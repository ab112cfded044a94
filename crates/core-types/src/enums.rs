use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Returns the opposite direction of the trade
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinLossResult {
    Win,
    Loss,
}

/// The three fixed trading sessions, partitioning the UTC day into
/// 8-hour buckets: Asia [0,8), London [8,16), New York [16,24).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSession {
    Asia,
    London,
    NewYork,
}

impl TradeSession {
    /// The deterministic display/reporting order of the sessions.
    pub const ALL: [TradeSession; 3] = [
        TradeSession::Asia,
        TradeSession::London,
        TradeSession::NewYork,
    ];

    /// Maps a UTC hour-of-day onto its session bucket.
    pub fn from_utc_hour(hour: u32) -> Self {
        match hour {
            0..=7 => TradeSession::Asia,
            8..=15 => TradeSession::London,
            _ => TradeSession::NewYork,
        }
    }
}

impl std::fmt::Display for TradeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSession::Asia => write!(f, "Asia"),
            TradeSession::London => write!(f, "London"),
            TradeSession::NewYork => write!(f, "New York"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_buckets_cover_the_utc_day() {
        assert_eq!(TradeSession::from_utc_hour(0), TradeSession::Asia);
        assert_eq!(TradeSession::from_utc_hour(7), TradeSession::Asia);
        assert_eq!(TradeSession::from_utc_hour(8), TradeSession::London);
        assert_eq!(TradeSession::from_utc_hour(15), TradeSession::London);
        assert_eq!(TradeSession::from_utc_hour(16), TradeSession::NewYork);
        assert_eq!(TradeSession::from_utc_hour(23), TradeSession::NewYork);
    }

    #[test]
    fn direction_opposite() {
        assert_eq!(Direction::Buy.opposite(), Direction::Sell);
        assert_eq!(Direction::Sell.opposite(), Direction::Buy);
    }
}
