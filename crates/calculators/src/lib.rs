//! # Fxjournal Calculators
//!
//! Standalone planning tools: position sizing, risk-reward, pip math, and
//! the account-level projections (compound growth, drawdown recovery, risk
//! of ruin).
//!
//! Like the analytics crate, this is a pure Layer 1 crate: every function
//! is total and side-effect free. Degenerate inputs (zero account, zero
//! stop distance) yield zero rather than an error, matching how the
//! journal's forms treat half-filled calculator fields.

pub mod position;
pub mod projections;

pub use position::{
    lot_size, percent_gain_loss, pip_value, profit_loss, risk_amount, risk_percent,
    risk_reward, stop_distance,
};
pub use projections::{compound_growth, drawdown_recovery, risk_of_ruin, GrowthPoint};
