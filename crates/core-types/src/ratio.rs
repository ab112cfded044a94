use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A ratio that may be genuinely infinite (e.g. a profit factor with zero
/// losses, or the recovery from a full drawdown). The infinite case is a
/// distinguished sentinel for display, never a clamped large number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Finite(Decimal),
    Infinite,
}

impl Ratio {
    pub const ZERO: Ratio = Ratio::Finite(Decimal::ZERO);

    /// Builds the ratio `numerator / denominator` under the journal's
    /// convention: a positive numerator over a zero denominator is
    /// infinite, zero over zero is zero.
    pub fn from_parts(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator > Decimal::ZERO {
            Ratio::Finite(numerator / denominator)
        } else if numerator > Decimal::ZERO {
            Ratio::Infinite
        } else {
            Ratio::ZERO
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Ratio::Infinite)
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::ZERO
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ratio::Finite(value) => write!(f, "{}", value.round_dp(2)),
            Ratio::Infinite => write!(f, "inf"),
        }
    }
}
