use core_types::Direction;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Account currency to risk for a given percentage of the account.
pub fn risk_amount(account_size: Decimal, risk_percent: Decimal) -> Decimal {
    account_size * risk_percent / dec!(100)
}

/// The inverse: what percentage of the account a given risk amount is.
pub fn risk_percent(account_size: Decimal, risk_amount: Decimal) -> Decimal {
    if account_size.is_zero() {
        return Decimal::ZERO;
    }
    risk_amount / account_size * dec!(100)
}

/// Absolute price distance between entry and stop.
pub fn stop_distance(entry_price: Decimal, stop_loss: Decimal) -> Decimal {
    (entry_price - stop_loss).abs()
}

/// Lot size that risks exactly `risk_amount` over the given stop distance.
pub fn lot_size(risk_amount: Decimal, stop_distance: Decimal, pip_value: Decimal) -> Decimal {
    if stop_distance.is_zero() || pip_value.is_zero() {
        return Decimal::ZERO;
    }
    risk_amount / (stop_distance * pip_value)
}

/// Planned reward distance divided by risk distance.
pub fn risk_reward(entry_price: Decimal, stop_loss: Decimal, take_profit: Decimal) -> Decimal {
    let risk = (entry_price - stop_loss).abs();
    let reward = (take_profit - entry_price).abs();
    if risk.is_zero() {
        return Decimal::ZERO;
    }
    reward / risk
}

/// Realized profit or loss for a closed position, signed by direction.
pub fn profit_loss(
    direction: Direction,
    entry_price: Decimal,
    exit_price: Decimal,
    lot_size: Decimal,
    pip_value: Decimal,
) -> Decimal {
    if pip_value.is_zero() {
        return Decimal::ZERO;
    }
    let price_diff = match direction {
        Direction::Buy => exit_price - entry_price,
        Direction::Sell => entry_price - exit_price,
    };
    let pips = price_diff / pip_value;
    // Standard lot contract size.
    pips * lot_size * pip_value * dec!(100000)
}

/// Profit or loss expressed as a percentage of the account.
pub fn percent_gain_loss(profit_loss: Decimal, account_size: Decimal) -> Decimal {
    if account_size.is_zero() {
        return Decimal::ZERO;
    }
    profit_loss / account_size * dec!(100)
}

/// Pip size for a pair quoted against the account currency.
/// JPY crosses tick in hundredths; everything else in ten-thousandths.
pub fn pip_value(pair: &str) -> Decimal {
    if pair.contains("JPY") {
        dec!(0.01)
    } else {
        dec!(0.0001)
    }
}
