use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AdminSettings, AuthSettings, BackendSettings, Config, JournalSettings, StartupSettings,
};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, layers `FXJOURNAL_*` environment variables on top,
/// deserializes the result into our strongly-typed `Config` struct, and
/// validates the timeout ordering before returning it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        // Environment variables override the file, e.g. FXJOURNAL_ADMIN__INIT_SECRET.
        .add_source(config::Environment::with_prefix("FXJOURNAL").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
