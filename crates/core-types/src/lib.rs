pub mod enums;
pub mod error;
pub mod ratio;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, TradeSession, WinLossResult};
pub use error::CoreError;
pub use ratio::Ratio;
pub use structs::{Settings, Trade, UserProfile, Violation};
