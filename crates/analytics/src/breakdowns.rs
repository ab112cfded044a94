use crate::engine::AnalyticsEngine;
use chrono::{Datelike, Timelike};
use core_types::{Trade, TradeSession};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trade count and summed outcome for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    /// Calendar month key, `YYYY-MM`.
    pub month: String,
    pub trades: usize,
    pub profit: Decimal,
}

/// Trade count and summed outcome for one currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDistribution {
    pub pair: String,
    pub trades: usize,
    pub profit: Decimal,
}

/// Trade count, win rate, and summed outcome for one trading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPerformance {
    pub session: TradeSession,
    pub trades: usize,
    pub win_rate_pct: Decimal,
    pub profit: Decimal,
}

impl AnalyticsEngine {
    /// Groups trades by calendar month, sorted chronologically. Pending
    /// trades count toward the month's total with a zero outcome.
    pub fn monthly_performance(&self, trades: &[Trade]) -> Vec<MonthlyPerformance> {
        let mut months: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();

        for trade in trades {
            let key = format!(
                "{:04}-{:02}",
                trade.entry_timestamp.year(),
                trade.entry_timestamp.month()
            );
            let entry = months.entry(key).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += trade.profit_loss_amount;
        }

        // BTreeMap iteration is already chronological for zero-padded keys.
        months
            .into_iter()
            .map(|(month, (trades, profit))| MonthlyPerformance {
                month,
                trades,
                profit,
            })
            .collect()
    }

    /// Groups trades by currency pair, sorted by descending trade count
    /// (ties broken alphabetically so the output never depends on map
    /// iteration order).
    pub fn pair_distribution(&self, trades: &[Trade]) -> Vec<PairDistribution> {
        let mut pairs: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();

        for trade in trades {
            let entry = pairs
                .entry(trade.pair.clone())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += trade.profit_loss_amount;
        }

        let mut distribution: Vec<PairDistribution> = pairs
            .into_iter()
            .map(|(pair, (trades, profit))| PairDistribution {
                pair,
                trades,
                profit,
            })
            .collect();
        distribution.sort_by(|a, b| b.trades.cmp(&a.trades).then(a.pair.cmp(&b.pair)));
        distribution
    }

    /// Buckets trades into the three fixed UTC sessions, always emitting
    /// all three in their display order.
    pub fn session_performance(&self, trades: &[Trade]) -> Vec<SessionPerformance> {
        TradeSession::ALL
            .iter()
            .map(|&session| {
                let in_session: Vec<&Trade> = trades
                    .iter()
                    .filter(|t| {
                        TradeSession::from_utc_hour(t.entry_timestamp.hour()) == session
                    })
                    .collect();

                let wins = in_session
                    .iter()
                    .filter(|t| t.profit_loss_amount > Decimal::ZERO)
                    .count();
                let win_rate_pct = if in_session.is_empty() {
                    Decimal::ZERO
                } else {
                    Decimal::from(wins) / Decimal::from(in_session.len()) * dec!(100)
                };
                let profit = in_session
                    .iter()
                    .map(|t| t.profit_loss_amount)
                    .sum::<Decimal>();

                SessionPerformance {
                    session,
                    trades: in_session.len(),
                    win_rate_pct,
                    profit,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::Direction;
    use uuid::Uuid;

    fn trade(pair: &str, year: i32, month: u32, hour: u32, profit_loss: Decimal) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            pair: pair.to_string(),
            direction: Direction::Buy,
            entry_timestamp: Utc.with_ymd_and_hms(year, month, 10, hour, 0, 0).unwrap(),
            exit_timestamp: None,
            entry_price: dec!(1.08),
            stop_loss_price: dec!(1.07),
            take_profit_price: dec!(1.10),
            position_size: dec!(1),
            account_size: dec!(10000),
            risk_amount: dec!(100),
            profit_loss_amount: profit_loss,
            win_loss_result: None,
            risk_reward: None,
            result_pips: None,
            discipline_score: dec!(80),
            violations: Vec::new(),
            grade: None,
            emotions: String::new(),
            screenshot_url: None,
        }
    }

    #[test]
    fn monthly_grouping_is_chronological() {
        let trades = vec![
            trade("EURUSD", 2025, 3, 9, dec!(50)),
            trade("EURUSD", 2025, 1, 9, dec!(-20)),
            trade("GBPUSD", 2025, 1, 9, dec!(30)),
        ];
        let months = AnalyticsEngine::new().monthly_performance(&trades);

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2025-01");
        assert_eq!(months[0].trades, 2);
        assert_eq!(months[0].profit, dec!(10));
        assert_eq!(months[1].month, "2025-03");
    }

    #[test]
    fn pair_distribution_sorts_by_count_then_pair() {
        let trades = vec![
            trade("GBPUSD", 2025, 1, 9, dec!(10)),
            trade("EURUSD", 2025, 1, 9, dec!(10)),
            trade("USDJPY", 2025, 1, 9, dec!(10)),
            trade("USDJPY", 2025, 2, 9, dec!(-5)),
        ];
        let pairs = AnalyticsEngine::new().pair_distribution(&trades);

        assert_eq!(pairs[0].pair, "USDJPY");
        assert_eq!(pairs[0].trades, 2);
        assert_eq!(pairs[0].profit, dec!(5));
        // Tie between EURUSD and GBPUSD resolves alphabetically.
        assert_eq!(pairs[1].pair, "EURUSD");
        assert_eq!(pairs[2].pair, "GBPUSD");
    }

    #[test]
    fn session_buckets_follow_the_utc_partition() {
        let trades = vec![
            trade("EURUSD", 2025, 1, 3, dec!(40)),   // Asia
            trade("EURUSD", 2025, 1, 9, dec!(-10)),  // London
            trade("EURUSD", 2025, 1, 15, dec!(20)),  // London
            trade("EURUSD", 2025, 1, 22, dec!(-30)), // New York
        ];
        let sessions = AnalyticsEngine::new().session_performance(&trades);

        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].session, TradeSession::Asia);
        assert_eq!(sessions[0].trades, 1);
        assert_eq!(sessions[0].win_rate_pct, dec!(100));

        assert_eq!(sessions[1].session, TradeSession::London);
        assert_eq!(sessions[1].trades, 2);
        assert_eq!(sessions[1].win_rate_pct, dec!(50));
        assert_eq!(sessions[1].profit, dec!(10));

        assert_eq!(sessions[2].session, TradeSession::NewYork);
        assert_eq!(sessions[2].profit, dec!(-30));
    }

    #[test]
    fn empty_input_still_emits_all_sessions() {
        let sessions = AnalyticsEngine::new().session_performance(&[]);
        assert_eq!(sessions.len(), 3);
        assert!(sessions.iter().all(|s| s.trades == 0));
        assert!(sessions.iter().all(|s| s.win_rate_pct.is_zero()));
    }
}
