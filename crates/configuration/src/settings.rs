use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendSettings,
    #[serde(default)]
    pub startup: StartupSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub journal: JournalSettings,
}

impl Config {
    /// Checks the cross-field invariants that a plain deserialize cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "backend.url must not be empty".to_string(),
            ));
        }
        if self.startup.actor_timeout_secs >= self.startup.overall_deadline_secs {
            return Err(ConfigError::ValidationError(format!(
                "startup.actor_timeout_secs ({}) must be below startup.overall_deadline_secs ({})",
                self.startup.actor_timeout_secs, self.startup.overall_deadline_secs
            )));
        }
        if self.journal.starting_balance <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "journal.starting_balance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection parameters for the remote journal backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the backend service, e.g. "https://journal.example.com".
    pub url: String,
    /// Per-request timeout applied to every backend call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Timing and retry parameters for the startup sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupSettings {
    /// Hard bound on a single client-construction attempt.
    #[serde(default = "default_actor_timeout_secs")]
    pub actor_timeout_secs: u64,
    /// Shorter bound for the best-effort privileged initialization call.
    #[serde(default = "default_admin_init_timeout_secs")]
    pub admin_init_timeout_secs: u64,
    /// Overall startup deadline, independent of the per-step timeouts.
    #[serde(default = "default_overall_deadline_secs")]
    pub overall_deadline_secs: u64,
    /// Pause after a manual retry to let a fresh client settle.
    #[serde(default = "default_retry_settle_ms")]
    pub retry_settle_ms: u64,
    /// Automatic re-construction budget for transient backend outages.
    #[serde(default = "default_max_auto_retries")]
    pub max_auto_retries: u32,
    /// Ceiling on the exponential backoff between automatic retries.
    #[serde(default = "default_auto_retry_cap_secs")]
    pub auto_retry_cap_secs: u64,
}

impl StartupSettings {
    pub fn actor_timeout(&self) -> Duration {
        Duration::from_secs(self.actor_timeout_secs)
    }

    pub fn admin_init_timeout(&self) -> Duration {
        Duration::from_secs(self.admin_init_timeout_secs)
    }

    pub fn overall_deadline(&self) -> Duration {
        Duration::from_secs(self.overall_deadline_secs)
    }

    pub fn retry_settle(&self) -> Duration {
        Duration::from_millis(self.retry_settle_ms)
    }

    /// Backoff delay before the given automatic retry attempt (1-based):
    /// 1s, 2s, 3s, then capped.
    pub fn auto_retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs(u64::from(attempt).min(self.auto_retry_cap_secs))
    }
}

impl Default for StartupSettings {
    fn default() -> Self {
        Self {
            actor_timeout_secs: default_actor_timeout_secs(),
            admin_init_timeout_secs: default_admin_init_timeout_secs(),
            overall_deadline_secs: default_overall_deadline_secs(),
            retry_settle_ms: default_retry_settle_ms(),
            max_auto_retries: default_max_auto_retries(),
            auto_retry_cap_secs: default_auto_retry_cap_secs(),
        }
    }
}

/// Caller identity forwarded to the backend; absent means anonymous.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    pub token: Option<String>,
}

/// One-time privileged bootstrap parameters. The secret is injected here
/// rather than read from ambient global state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSettings {
    pub init_secret: Option<String>,
}

/// Journal-level defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalSettings {
    /// Synthetic starting balance used when no trade carries an account size.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: Decimal,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_actor_timeout_secs() -> u64 {
    10
}

fn default_admin_init_timeout_secs() -> u64 {
    3
}

fn default_overall_deadline_secs() -> u64 {
    20
}

fn default_retry_settle_ms() -> u64 {
    500
}

fn default_max_auto_retries() -> u32 {
    3
}

fn default_auto_retry_cap_secs() -> u64 {
    3
}

fn default_starting_balance() -> Decimal {
    dec!(10000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            backend: BackendSettings {
                url: "https://journal.example.com".to_string(),
                request_timeout_secs: default_request_timeout_secs(),
            },
            startup: StartupSettings::default(),
            auth: AuthSettings::default(),
            admin: AdminSettings::default(),
            journal: JournalSettings::default(),
        }
    }

    #[test]
    fn default_startup_timings_match_contract() {
        let startup = StartupSettings::default();
        assert_eq!(startup.actor_timeout(), Duration::from_secs(10));
        assert_eq!(startup.admin_init_timeout(), Duration::from_secs(3));
        assert_eq!(startup.overall_deadline(), Duration::from_secs(20));
        assert_eq!(startup.retry_settle(), Duration::from_millis(500));
        assert_eq!(startup.max_auto_retries, 3);
    }

    #[test]
    fn auto_retry_delay_is_linear_then_capped() {
        let startup = StartupSettings::default();
        assert_eq!(startup.auto_retry_delay(1), Duration::from_secs(1));
        assert_eq!(startup.auto_retry_delay(2), Duration::from_secs(2));
        assert_eq!(startup.auto_retry_delay(3), Duration::from_secs(3));
        assert_eq!(startup.auto_retry_delay(7), Duration::from_secs(3));
    }

    #[test]
    fn validate_rejects_inverted_deadlines() {
        let mut config = base_config();
        config.startup.actor_timeout_secs = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }
}
