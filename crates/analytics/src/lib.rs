//! # Fxjournal Analytics Engine
//!
//! This crate derives every number the journal displays from a snapshot of
//! trades: performance KPIs, the equity curve, drawdown, streaks, and the
//! monthly/pair/session breakdowns.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless
//!   calculator. It takes a trade snapshot as input and produces reports as
//!   output, never mutating its inputs. Because every report is derived from
//!   the same ordered snapshot, the equity curve and the drawdown shown next
//!   to it can never disagree.
//! - **Total Functions:** Empty input, all-pending input, and all-winning
//!   input are defined results (zeroed metrics, a seed-only curve, the
//!   infinite profit-factor sentinel), never a panic or a division by zero.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `PerformanceMetrics`: The standardized KPI report.
//! - `EquityPoint`, `Ratio`, `Streak`: report building blocks.
//! - `MonthlyPerformance`, `PairDistribution`, `SessionPerformance`: the
//!   categorical breakdowns.

// Declare the modules that constitute this crate.
pub mod breakdowns;
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use breakdowns::{MonthlyPerformance, PairDistribution, SessionPerformance};
pub use core_types::Ratio;
pub use engine::AnalyticsEngine;
pub use report::{EquityPoint, PerformanceMetrics, Streak};
