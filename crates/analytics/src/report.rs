use chrono::{DateTime, Utc};
use core_types::{Ratio, WinLossResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The most recent run of consecutive same-outcome completed trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub outcome: WinLossResult,
    pub count: usize,
}

impl Default for Streak {
    fn default() -> Self {
        Self {
            outcome: WinLossResult::Win,
            count: 0,
        }
    }
}

/// A single point of the equity curve. The curve is strictly non-decreasing
/// in `date`; the first point is the synthetic starting balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: DateTime<Utc>,
    pub balance: Decimal,
}

/// The full KPI report derived from a trade snapshot.
///
/// Recomputed on every invocation and never persisted. Counting
/// conventions: `total_trades`, the win/loss rates, profit factor, streak,
/// and best/worst trade consider completed trades only, while
/// `average_rr`, `risk_consistency_score`, and `discipline_score` average
/// over the full trade set including pending trades. That asymmetry is
/// deliberate: planned risk and entry discipline are scored before an
/// outcome exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    // I. Trade counts
    pub total_trades: usize,
    pub total_wins: usize,
    pub total_losses: usize,
    pub win_rate_pct: Decimal,
    pub loss_rate_pct: Decimal,

    // II. Profitability
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub net_profit_loss: Decimal,
    pub profit_factor: Ratio,
    pub win_loss_ratio: Ratio,
    pub expectancy: Decimal,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,

    // III. Risk and drawdown
    pub average_rr: Decimal,
    pub max_drawdown_pct: Decimal,
    pub risk_consistency_score: Decimal,

    // IV. Behaviour
    pub current_streak: Streak,
    pub discipline_score: Decimal,
}

impl PerformanceMetrics {
    /// Creates a new, zeroed-out report. This is the defined result for an
    /// empty trade set.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            total_wins: 0,
            total_losses: 0,
            win_rate_pct: Decimal::ZERO,
            loss_rate_pct: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            total_loss: Decimal::ZERO,
            net_profit_loss: Decimal::ZERO,
            profit_factor: Ratio::ZERO,
            win_loss_ratio: Ratio::ZERO,
            expectancy: Decimal::ZERO,
            best_trade: Decimal::ZERO,
            worst_trade: Decimal::ZERO,
            average_rr: Decimal::ZERO,
            max_drawdown_pct: Decimal::ZERO,
            risk_consistency_score: Decimal::ZERO,
            current_streak: Streak::default(),
            discipline_score: Decimal::ZERO,
        }
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
