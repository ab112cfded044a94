use crate::enums::{Direction, WinLossResult};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single journaled trade.
///
/// Trades are owned by the backend and replaced whole on save; the client
/// never mutates a saved trade in place. A `profit_loss_amount` of exactly
/// zero means the outcome has not been recorded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub pair: String,
    pub direction: Direction,
    /// Nanosecond-precision entry time; the monotonic ordering key for
    /// equity curves and streaks.
    pub entry_timestamp: DateTime<Utc>,
    pub exit_timestamp: Option<DateTime<Utc>>,
    pub entry_price: Decimal,
    pub stop_loss_price: Decimal,
    pub take_profit_price: Decimal,
    pub position_size: Decimal,
    pub account_size: Decimal,
    pub risk_amount: Decimal,
    /// Signed outcome in account currency; zero while the trade is open.
    pub profit_loss_amount: Decimal,
    pub win_loss_result: Option<WinLossResult>,
    pub risk_reward: Option<Decimal>,
    pub result_pips: Option<Decimal>,
    /// Checklist/rule adherence at entry, 0-100.
    pub discipline_score: Decimal,
    pub violations: Vec<Violation>,
    pub grade: Option<String>,
    pub emotions: String,
    pub screenshot_url: Option<String>,
}

impl Trade {
    /// A trade is completed once its outcome amount is recorded (non-zero).
    pub fn is_completed(&self) -> bool {
        !self.profit_loss_amount.is_zero()
    }

    /// Validates the journal-side invariants before a save is attempted.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.pair.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "pair".to_string(),
                "currency pair must not be empty".to_string(),
            ));
        }
        if self.discipline_score < Decimal::ZERO || self.discipline_score > dec!(100) {
            return Err(CoreError::InvalidInput(
                "discipline_score".to_string(),
                format!("must be within 0-100, got {}", self.discipline_score),
            ));
        }
        if self.risk_amount < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "risk_amount".to_string(),
                format!("must not be negative, got {}", self.risk_amount),
            ));
        }
        Ok(())
    }
}

/// A single rule breach recorded against a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// The caller's profile; absent until first-run setup has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

/// Per-user journal preferences, stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub base_currency: String,
    pub theme: String,
    pub default_account: Decimal,
    pub default_risk_percent: Decimal,
    pub strategy_presets: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> Trade {
        Trade {
            id: Uuid::new_v4(),
            pair: "EURUSD".to_string(),
            direction: Direction::Buy,
            entry_timestamp: Utc::now(),
            exit_timestamp: None,
            entry_price: dec!(1.0850),
            stop_loss_price: dec!(1.0800),
            take_profit_price: dec!(1.0950),
            position_size: dec!(0.5),
            account_size: dec!(10000),
            risk_amount: dec!(100),
            profit_loss_amount: Decimal::ZERO,
            win_loss_result: None,
            risk_reward: Some(dec!(2)),
            result_pips: None,
            discipline_score: dec!(80),
            violations: Vec::new(),
            grade: None,
            emotions: "calm".to_string(),
            screenshot_url: None,
        }
    }

    #[test]
    fn open_trade_is_not_completed() {
        let trade = sample_trade();
        assert!(!trade.is_completed());

        let mut closed = trade;
        closed.profit_loss_amount = dec!(-50);
        assert!(closed.is_completed());
    }

    #[test]
    fn validate_rejects_out_of_range_discipline() {
        let mut trade = sample_trade();
        trade.discipline_score = dec!(120);
        assert!(trade.validate().is_err());

        trade.discipline_score = dec!(100);
        assert!(trade.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_pair() {
        let mut trade = sample_trade();
        trade.pair = "  ".to_string();
        assert!(trade.validate().is_err());
    }
}
