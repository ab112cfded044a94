use crate::report::{EquityPoint, PerformanceMetrics, Streak};
use chrono::{DateTime, Utc};
use core_types::{Ratio, Trade, WinLossResult};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const HUNDRED: Decimal = dec!(100);

/// A stateless calculator for deriving performance metrics from a trade
/// snapshot.
///
/// "Completed" means the trade's outcome amount is recorded and non-zero.
/// Every method sorts a copy of its input where ordering matters; the input
/// slice is never reordered or mutated, so repeated invocations on the same
/// snapshot are bit-identical.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    default_starting_balance: Decimal,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self {
            default_starting_balance: dec!(10000),
        }
    }

    /// Overrides the synthetic starting balance used when no trade carries
    /// an account size.
    pub fn with_starting_balance(starting_balance: Decimal) -> Self {
        Self {
            default_starting_balance: starting_balance,
        }
    }

    /// The main entry point: derives the full KPI report from a trade
    /// snapshot. An empty snapshot yields the zeroed report.
    pub fn compute_metrics(&self, trades: &[Trade]) -> PerformanceMetrics {
        if trades.is_empty() {
            return PerformanceMetrics::new();
        }

        let completed: Vec<&Trade> = trades.iter().filter(|t| t.is_completed()).collect();
        let wins: Vec<&Trade> = completed
            .iter()
            .copied()
            .filter(|t| t.profit_loss_amount > Decimal::ZERO)
            .collect();
        let losses: Vec<&Trade> = completed
            .iter()
            .copied()
            .filter(|t| t.profit_loss_amount < Decimal::ZERO)
            .collect();

        let total_trades = completed.len();
        let (win_rate_pct, loss_rate_pct) = if total_trades > 0 {
            let win_rate =
                Decimal::from(wins.len()) / Decimal::from(total_trades) * HUNDRED;
            (win_rate, HUNDRED - win_rate)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let total_profit: Decimal = wins.iter().map(|t| t.profit_loss_amount).sum();
        let total_loss: Decimal = losses
            .iter()
            .map(|t| t.profit_loss_amount)
            .sum::<Decimal>()
            .abs();
        let net_profit_loss = total_profit - total_loss;

        let profit_factor = Ratio::from_parts(total_profit, total_loss);
        let win_loss_ratio =
            Ratio::from_parts(Decimal::from(wins.len()), Decimal::from(losses.len()));

        let average_win = if wins.is_empty() {
            Decimal::ZERO
        } else {
            total_profit / Decimal::from(wins.len())
        };
        let average_loss = if losses.is_empty() {
            Decimal::ZERO
        } else {
            total_loss / Decimal::from(losses.len())
        };
        let expectancy =
            win_rate_pct / HUNDRED * average_win - loss_rate_pct / HUNDRED * average_loss;

        // Planned risk-reward averages over the FULL set, pending trades
        // included, with a missing ratio counted as zero.
        let average_rr = trades
            .iter()
            .map(|t| t.risk_reward.unwrap_or(Decimal::ZERO))
            .sum::<Decimal>()
            / Decimal::from(trades.len());

        let equity = self.equity_curve(trades);
        let max_drawdown_pct = Self::max_drawdown(&equity);

        let current_streak = Self::current_streak(&completed);

        let best_trade = completed
            .iter()
            .map(|t| t.profit_loss_amount)
            .fold(Decimal::ZERO, |best, pl| best.max(pl));
        let worst_trade = completed
            .iter()
            .map(|t| t.profit_loss_amount)
            .fold(Decimal::ZERO, |worst, pl| worst.min(pl));

        let risk_consistency_score = Self::risk_consistency(trades);
        let discipline_score = trades
            .iter()
            .map(|t| t.discipline_score)
            .sum::<Decimal>()
            / Decimal::from(trades.len());

        PerformanceMetrics {
            total_trades,
            total_wins: wins.len(),
            total_losses: losses.len(),
            win_rate_pct,
            loss_rate_pct,
            total_profit,
            total_loss,
            net_profit_loss,
            profit_factor,
            win_loss_ratio,
            expectancy,
            best_trade,
            worst_trade,
            average_rr,
            max_drawdown_pct,
            risk_consistency_score,
            current_streak,
            discipline_score,
        }
    }

    /// Builds the equity curve: a synthetic starting-balance point seeded
    /// from the earliest trade's account size (or the default), then one
    /// point per completed trade in entry-time order.
    pub fn equity_curve(&self, trades: &[Trade]) -> Vec<EquityPoint> {
        if trades.is_empty() {
            return vec![EquityPoint {
                date: DateTime::<Utc>::UNIX_EPOCH,
                balance: self.default_starting_balance,
            }];
        }

        let mut sorted: Vec<&Trade> = trades.iter().collect();
        sorted.sort_by_key(|t| t.entry_timestamp);

        let mut balance = if sorted[0].account_size.is_zero() {
            self.default_starting_balance
        } else {
            sorted[0].account_size
        };

        let mut equity = Vec::with_capacity(1 + sorted.len());
        equity.push(EquityPoint {
            date: sorted[0].entry_timestamp,
            balance,
        });

        for trade in sorted {
            if trade.is_completed() {
                balance += trade.profit_loss_amount;
                equity.push(EquityPoint {
                    date: trade.entry_timestamp,
                    balance,
                });
            }
        }

        equity
    }

    /// Maximum peak-to-trough percentage decline along the curve. Zero for
    /// a single-point or non-decreasing curve.
    pub fn max_drawdown(equity: &[EquityPoint]) -> Decimal {
        let mut max_drawdown = Decimal::ZERO;
        let Some(first) = equity.first() else {
            return max_drawdown;
        };

        let mut peak = first.balance;
        for point in equity {
            if point.balance > peak {
                peak = point.balance;
            }
            if peak > Decimal::ZERO {
                let drawdown = (peak - point.balance) / peak * HUNDRED;
                if drawdown > max_drawdown {
                    max_drawdown = drawdown;
                }
            }
        }

        max_drawdown
    }

    /// The most recent run of consecutive completed trades sharing the same
    /// outcome sign as the latest one, ordered by entry time descending.
    fn current_streak(completed: &[&Trade]) -> Streak {
        let mut sorted: Vec<&Trade> = completed.to_vec();
        sorted.sort_by_key(|t| std::cmp::Reverse(t.entry_timestamp));

        let Some(latest) = sorted.first() else {
            return Streak::default();
        };

        let outcome = if latest.profit_loss_amount > Decimal::ZERO {
            WinLossResult::Win
        } else {
            WinLossResult::Loss
        };

        let mut count = 0;
        for trade in sorted {
            let is_win = trade.profit_loss_amount > Decimal::ZERO;
            if is_win == (outcome == WinLossResult::Win) {
                count += 1;
            } else {
                break;
            }
        }

        Streak { outcome, count }
    }

    /// `max(0, 100 - CoV)` over the full set's risk amounts, where CoV is
    /// the coefficient of variation in percent. A zero mean risk (or no
    /// trades) scores a perfect 100.
    fn risk_consistency(trades: &[Trade]) -> Decimal {
        if trades.is_empty() {
            return HUNDRED;
        }

        let count = Decimal::from(trades.len());
        let mean = trades.iter().map(|t| t.risk_amount).sum::<Decimal>() / count;
        if mean.is_zero() {
            return HUNDRED;
        }

        let variance = trades
            .iter()
            .map(|t| {
                let diff = t.risk_amount - mean;
                diff * diff
            })
            .sum::<Decimal>()
            / count;
        let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);

        let coefficient_of_variation = std_dev / mean * HUNDRED;
        (HUNDRED - coefficient_of_variation).max(Decimal::ZERO)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::Direction;
    use uuid::Uuid;

    fn trade_at(hour_offset: i64, profit_loss: Decimal) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            pair: "EURUSD".to_string(),
            direction: Direction::Buy,
            entry_timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::hours(hour_offset),
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
    fn empty_snapshot_yields_zeroed_metrics_and_seed_only_curve() {
        let engine = AnalyticsEngine::new();
        let metrics = engine.compute_metrics(&[]);

        assert_eq!(metrics, PerformanceMetrics::new());

        let equity = engine.equity_curve(&[]);
        assert_eq!(equity.len(), 1);
        assert_eq!(equity[0].balance, dec!(10000));
    }

    #[test]
    fn mixed_outcomes_scenario() {
        // One +100 win and one -50 loss.
        let trades = vec![trade_at(0, dec!(100)), trade_at(1, dec!(-50))];
        let metrics = AnalyticsEngine::new().compute_metrics(&trades);

        assert_eq!(metrics.total_trades, 2);
        assert_eq!(metrics.total_profit, dec!(100));
        assert_eq!(metrics.total_loss, dec!(50));
        assert_eq!(metrics.net_profit_loss, dec!(50));
        assert_eq!(metrics.profit_factor, Ratio::Finite(dec!(2)));
        assert_eq!(metrics.win_rate_pct, dec!(50));
        assert_eq!(metrics.loss_rate_pct, dec!(50));
    }

    #[test]
    fn all_wins_produce_the_infinite_sentinel() {
        let trades = vec![trade_at(0, dec!(100))];
        let metrics = AnalyticsEngine::new().compute_metrics(&trades);

        assert!(metrics.profit_factor.is_infinite());
        assert!(metrics.win_loss_ratio.is_infinite());
        assert_eq!(metrics.win_rate_pct, dec!(100));
        assert_eq!(metrics.loss_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn all_pending_set_has_zero_rates() {
        let trades = vec![trade_at(0, Decimal::ZERO), trade_at(1, Decimal::ZERO)];
        let metrics = AnalyticsEngine::new().compute_metrics(&trades);

        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.win_rate_pct, Decimal::ZERO);
        assert_eq!(metrics.loss_rate_pct, Decimal::ZERO);
        assert_eq!(metrics.profit_factor, Ratio::ZERO);
        assert_eq!(metrics.current_streak, Streak::default());
    }

    #[test]
    fn win_and_loss_rates_sum_to_one_hundred() {
        let trades = vec![
            trade_at(0, dec!(30)),
            trade_at(1, dec!(-20)),
            trade_at(2, dec!(15)),
        ];
        let metrics = AnalyticsEngine::new().compute_metrics(&trades);
        assert_eq!(metrics.win_rate_pct + metrics.loss_rate_pct, dec!(100));
        assert_eq!(
            metrics.net_profit_loss,
            metrics.total_profit - metrics.total_loss
        );
    }

    #[test]
    fn equity_curve_has_one_point_per_completed_trade_plus_seed() {
        let trades = vec![
            trade_at(2, dec!(-50)),
            trade_at(0, dec!(100)),
            trade_at(1, Decimal::ZERO), // pending, no point
        ];
        let equity = AnalyticsEngine::new().equity_curve(&trades);

        assert_eq!(equity.len(), 3);
        // Seeded from the earliest trade's account size.
        assert_eq!(equity[0].balance, dec!(10000));
        assert_eq!(equity[1].balance, dec!(10100));
        assert_eq!(equity[2].balance, dec!(10050));
        assert!(equity.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn drawdown_is_zero_for_non_decreasing_curve() {
        let trades = vec![trade_at(0, dec!(10)), trade_at(1, dec!(20))];
        let engine = AnalyticsEngine::new();
        let equity = engine.equity_curve(&trades);
        assert_eq!(AnalyticsEngine::max_drawdown(&equity), Decimal::ZERO);
    }

    #[test]
    fn drawdown_measures_peak_to_trough_percent() {
        // 10000 -> 11000 (peak) -> 9900: decline of 1100/11000 = 10%.
        let trades = vec![trade_at(0, dec!(1000)), trade_at(1, dec!(-1100))];
        let engine = AnalyticsEngine::new();
        let equity = engine.equity_curve(&trades);
        assert_eq!(AnalyticsEngine::max_drawdown(&equity), dec!(10));
    }

    #[test]
    fn streak_counts_most_recent_consecutive_outcomes() {
        let trades = vec![
            trade_at(0, dec!(-10)),
            trade_at(1, dec!(25)),
            trade_at(2, dec!(40)),
        ];
        let metrics = AnalyticsEngine::new().compute_metrics(&trades);
        assert_eq!(
            metrics.current_streak,
            Streak {
                outcome: WinLossResult::Win,
                count: 2
            }
        );
    }

    #[test]
    fn average_rr_spans_pending_trades_with_missing_treated_as_zero() {
        let mut with_rr = trade_at(0, dec!(100));
        with_rr.risk_reward = Some(dec!(3));
        let pending = trade_at(1, Decimal::ZERO); // no ratio recorded

        let metrics = AnalyticsEngine::new().compute_metrics(&[with_rr, pending]);
        assert_eq!(metrics.average_rr, dec!(1.5));
    }

    #[test]
    fn uniform_risk_scores_perfect_consistency() {
        let trades = vec![trade_at(0, dec!(10)), trade_at(1, dec!(-10))];
        let metrics = AnalyticsEngine::new().compute_metrics(&trades);
        assert_eq!(metrics.risk_consistency_score, dec!(100));
    }

    #[test]
    fn dispersed_risk_lowers_the_consistency_score() {
        let mut small = trade_at(0, dec!(10));
        small.risk_amount = dec!(50);
        let mut large = trade_at(1, dec!(10));
        large.risk_amount = dec!(150);

        let metrics = AnalyticsEngine::new().compute_metrics(&[small, large]);
        // mean 100, stddev 50, CoV 50% -> score 50.
        assert_eq!(metrics.risk_consistency_score.round_dp(6), dec!(50));
    }

    #[test]
    fn best_and_worst_are_floored_at_zero() {
        let trades = vec![trade_at(0, dec!(100)), trade_at(1, dec!(40))];
        let metrics = AnalyticsEngine::new().compute_metrics(&trades);
        assert_eq!(metrics.best_trade, dec!(100));
        assert_eq!(metrics.worst_trade, Decimal::ZERO);
    }

    #[test]
    fn compute_metrics_is_idempotent_and_does_not_mutate_input() {
        let trades = vec![
            trade_at(3, dec!(-20)),
            trade_at(0, dec!(50)),
            trade_at(1, Decimal::ZERO),
        ];
        let before = trades.clone();
        let engine = AnalyticsEngine::new();

        let first = engine.compute_metrics(&trades);
        let second = engine.compute_metrics(&trades);

        assert_eq!(first, second);
        assert_eq!(trades, before);
    }
}
