use core_types::Ratio;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = dec!(100);

/// One month of a compounding projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub month: u32,
    pub balance: Decimal,
}

/// Projects an account balance compounding at `monthly_return_pct` per
/// month. The result always starts at month zero with the initial balance,
/// so it contains `months + 1` points.
pub fn compound_growth(
    initial_balance: Decimal,
    monthly_return_pct: Decimal,
    months: u32,
) -> Vec<GrowthPoint> {
    let mut points = Vec::with_capacity(months as usize + 1);
    points.push(GrowthPoint {
        month: 0,
        balance: initial_balance,
    });

    let factor = Decimal::ONE + monthly_return_pct / HUNDRED;
    let mut balance = initial_balance;
    for month in 1..=months {
        balance *= factor;
        points.push(GrowthPoint { month, balance });
    }

    points
}

/// The gain (in percent) required to recover from a drawdown of the given
/// percent. A 100% drawdown has no finite recovery.
pub fn drawdown_recovery(drawdown_pct: Decimal) -> Ratio {
    if drawdown_pct >= HUNDRED {
        return Ratio::Infinite;
    }
    Ratio::Finite(drawdown_pct / (HUNDRED - drawdown_pct) * HUNDRED)
}

/// Classical gambler's-ruin estimate of the probability (in percent) of
/// losing the account, given a win rate, average win/loss, and the percent
/// of the account risked per trade. Clamped to [0, 100].
pub fn risk_of_ruin(
    win_rate_pct: Decimal,
    average_win: Decimal,
    average_loss: Decimal,
    risk_per_trade_pct: Decimal,
) -> Decimal {
    if win_rate_pct >= HUNDRED || risk_per_trade_pct >= HUNDRED {
        return Decimal::ZERO;
    }
    if win_rate_pct <= Decimal::ZERO {
        return HUNDRED;
    }
    if risk_per_trade_pct <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    // Losses that cost nothing cannot ruin the account.
    if average_loss <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let p = win_rate_pct / HUNDRED;
    let q = Decimal::ONE - p;
    let payoff_ratio = average_win / average_loss;

    // Expected value per unit risked on the winning side.
    let edge = p * payoff_ratio;
    if edge <= Decimal::ZERO {
        return HUNDRED;
    }
    if edge == q {
        // Break-even system.
        return dec!(50);
    }

    let ratio = q / edge;
    if ratio >= Decimal::ONE {
        // Negative expectancy: ruin is certain over enough trades.
        return HUNDRED;
    }

    // Units of risk between the account and zero.
    let exponent = HUNDRED / risk_per_trade_pct;
    let ruin = ratio.checked_powd(exponent).unwrap_or(Decimal::ZERO) * HUNDRED;
    ruin.min(HUNDRED)
}
