//! # Fxjournal Session
//!
//! The startup orchestrator: everything between "the app launched" and "the
//! journal is usable" lives here.
//!
//! - [`ActorSession`] owns construction of the remote backend client,
//!   bounded by a hard timeout, with automatic backoff retries while the
//!   backend is transiently unavailable and an epoch counter that keys
//!   every retry so stale in-flight results can never clobber a fresh
//!   client.
//! - [`StartupGate`] sequences client readiness and the first profile
//!   fetch into a single forward-moving [`StartupStatus`], applies the
//!   overall startup deadline on top of the per-step timeouts, and exposes
//!   the one retry action the error screens need.
//! - [`classify`] and [`reject`] turn raw failures into fixed,
//!   user-facing categories; both are total and never panic.
//! - [`JournalStore`] is the epoch-keyed cache for profile, trades, and
//!   settings, invalidated whenever the client handle changes or a
//!   mutation succeeds.

pub mod actor;
pub mod classify;
pub mod error;
pub mod gate;
pub mod reject;
pub mod store;

// Re-export the core types to provide a clean public API.
pub use actor::{ActorSession, SessionPhase, SessionSnapshot};
pub use classify::{classify_startup_error, ClassifiedError, ErrorCategory, ErrorContext};
pub use error::SessionError;
pub use gate::{GateSnapshot, StartupGate, StartupStatus};
pub use reject::{is_backend_unavailable, reject_summary};
pub use store::JournalStore;
