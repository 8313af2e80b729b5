use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{LoaderSettings, ServerSettings, Settings};

/// Loads the application configuration.
///
/// Values come from `config.toml` when it exists, overridden by
/// `MARKETPULSE_*` environment variables (e.g. `MARKETPULSE_SERVER__PORT`),
/// on top of coded defaults. The database connection string is NOT part of
/// this tree; it stays in `DATABASE_URL`, which the database crate reads
/// directly.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("loader.data_dir", "data")?
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("MARKETPULSE").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let settings = load_settings().expect("defaults should deserialize");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.loader.data_dir, "data");
    }
}
