use crate::error::ClientError;
use chrono::DateTime;
use core_types::{Direction, Trade, Violation, WinLossResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured rejection body returned by the backend when a call cannot be
/// taken (service stopped, not deployed, trapped).
#[derive(Debug, Clone, Deserialize)]
pub struct RejectResponse {
    pub code: i32,
    pub message: String,
}

/// Wire representation of a trade. Timestamps travel as nanosecond epochs
/// and every not-yet-recorded numeric field is explicitly optional; the
/// domain mapping never coerces an absent value into a fake zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDto {
    pub id: Uuid,
    pub pair: String,
    pub direction: Direction,
    pub entry_timestamp: i64,
    pub exit_timestamp: Option<i64>,
    pub entry_price: Decimal,
    pub stop_loss_price: Decimal,
    pub take_profit_price: Decimal,
    pub position_size: Decimal,
    pub account_size: Decimal,
    pub risk_amount: Decimal,
    pub profit_loss_amount: Decimal,
    pub win_loss_result: Option<WinLossResult>,
    pub risk_reward: Option<Decimal>,
    pub result_pips: Option<Decimal>,
    pub discipline_score: Decimal,
    pub violations: Vec<ViolationDto>,
    pub grade: Option<String>,
    pub emotions: String,
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDto {
    pub rule: String,
    pub description: String,
    pub timestamp: i64,
}

impl TradeDto {
    pub fn into_domain(self) -> Trade {
        Trade {
            id: self.id,
            pair: self.pair,
            direction: self.direction,
            entry_timestamp: DateTime::from_timestamp_nanos(self.entry_timestamp),
            exit_timestamp: self.exit_timestamp.map(DateTime::from_timestamp_nanos),
            entry_price: self.entry_price,
            stop_loss_price: self.stop_loss_price,
            take_profit_price: self.take_profit_price,
            position_size: self.position_size,
            account_size: self.account_size,
            risk_amount: self.risk_amount,
            profit_loss_amount: self.profit_loss_amount,
            win_loss_result: self.win_loss_result,
            risk_reward: self.risk_reward,
            result_pips: self.result_pips,
            discipline_score: self.discipline_score,
            violations: self
                .violations
                .into_iter()
                .map(|v| Violation {
                    rule: v.rule,
                    description: v.description,
                    timestamp: DateTime::from_timestamp_nanos(v.timestamp),
                })
                .collect(),
            grade: self.grade,
            emotions: self.emotions,
            screenshot_url: self.screenshot_url,
        }
    }

    pub fn from_domain(trade: &Trade) -> Result<Self, ClientError> {
        Ok(Self {
            id: trade.id,
            pair: trade.pair.clone(),
            direction: trade.direction,
            entry_timestamp: nanos(trade.entry_timestamp)?,
            exit_timestamp: trade.exit_timestamp.map(nanos).transpose()?,
            entry_price: trade.entry_price,
            stop_loss_price: trade.stop_loss_price,
            take_profit_price: trade.take_profit_price,
            position_size: trade.position_size,
            account_size: trade.account_size,
            risk_amount: trade.risk_amount,
            profit_loss_amount: trade.profit_loss_amount,
            win_loss_result: trade.win_loss_result,
            risk_reward: trade.risk_reward,
            result_pips: trade.result_pips,
            discipline_score: trade.discipline_score,
            violations: trade
                .violations
                .iter()
                .map(|v| {
                    Ok(ViolationDto {
                        rule: v.rule.clone(),
                        description: v.description.clone(),
                        timestamp: nanos(v.timestamp)?,
                    })
                })
                .collect::<Result<Vec<_>, ClientError>>()?,
            grade: trade.grade.clone(),
            emotions: trade.emotions.clone(),
            screenshot_url: trade.screenshot_url.clone(),
        })
    }
}

fn nanos(timestamp: chrono::DateTime<chrono::Utc>) -> Result<i64, ClientError> {
    timestamp.timestamp_nanos_opt().ok_or_else(|| {
        ClientError::InvalidData(format!(
            "Timestamp {} is outside the nanosecond-epoch range",
            timestamp
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn trade_survives_the_wire_mapping() {
        let entry = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let trade = Trade {
            id: Uuid::new_v4(),
            pair: "GBPUSD".to_string(),
            direction: Direction::Sell,
            entry_timestamp: entry,
            exit_timestamp: None,
            entry_price: dec!(1.27),
            stop_loss_price: dec!(1.28),
            take_profit_price: dec!(1.25),
            position_size: dec!(0.3),
            account_size: dec!(5000),
            risk_amount: dec!(50),
            profit_loss_amount: dec!(-50),
            win_loss_result: Some(WinLossResult::Loss),
            risk_reward: Some(dec!(2)),
            result_pips: None,
            discipline_score: dec!(90),
            violations: vec![Violation {
                rule: "no-news-entries".to_string(),
                description: "entered during CPI".to_string(),
                timestamp: entry,
            }],
            grade: Some("B".to_string()),
            emotions: "rushed".to_string(),
            screenshot_url: None,
        };

        let dto = TradeDto::from_domain(&trade).unwrap();
        assert_eq!(dto.entry_timestamp, entry.timestamp_nanos_opt().unwrap());

        let roundtrip = dto.into_domain();
        assert_eq!(roundtrip, trade);
    }

    #[test]
    fn absent_optionals_stay_absent() {
        let json = r#"{
            "id": "5f2b0e9e-7a31-4f24-9e1c-111111111111",
            "pair": "EURUSD",
            "direction": "Buy",
            "entryTimestamp": 1748770200000000000,
            "entryPrice": "1.08",
            "stopLossPrice": "1.07",
            "takeProfitPrice": "1.10",
            "positionSize": "1",
            "accountSize": "10000",
            "riskAmount": "100",
            "profitLossAmount": "0",
            "disciplineScore": "75",
            "violations": [],
            "emotions": ""
        }"#;

        let dto: TradeDto = serde_json::from_str(json).unwrap();
        assert!(dto.risk_reward.is_none());
        assert!(dto.win_loss_result.is_none());

        let trade = dto.into_domain();
        assert!(!trade.is_completed());
        assert!(trade.risk_reward.is_none());
    }
}
