//! Configuration loading and validation.
//!
//! The client takes a single YAML configuration file naming the venue
//! endpoint, the login credentials, and the tradable instrument table.
//! Missing or malformed configuration is a startup-time fatal error; nothing
//! touches the network until the file validates.
//!
//! # Example
//!
//! ```yaml
//! venue:
//!   address: 127.0.0.1
//!   port: 4000
//!   username: trader1
//!   password: hunter2
//! instruments:
//!   - name: FOO
//!   - name: BAR
//!     id: BAR.X
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the YAML configuration.
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Venue endpoint and credentials.
    pub venue: VenueConfig,
    /// Tradable instrument table.
    pub instruments: Vec<InstrumentConfig>,
}

/// Venue endpoint and login credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Venue host name or IP address.
    pub address: String,
    /// Venue order-entry port.
    pub port: u16,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl VenueConfig {
    /// The `host:port` endpoint string for the transport.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl fmt::Debug for VenueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VenueConfig")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// One entry in the instrument table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Operator-facing instrument name.
    pub name: String,
    /// Venue identifier; defaults to the upper-cased name.
    #[serde(default)]
    pub id: Option<String>,
}

/// Load and validate the configuration file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or if any
/// required field is missing or empty.
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    let settings: Settings = serde_yaml_bw::from_str(&contents)?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.venue.address.is_empty() {
        return Err(ConfigError::ValidationError(
            "venue.address must not be empty".to_string(),
        ));
    }
    if settings.venue.port == 0 {
        return Err(ConfigError::ValidationError(
            "venue.port must not be zero".to_string(),
        ));
    }
    if settings.venue.username.is_empty() {
        return Err(ConfigError::ValidationError(
            "venue.username must not be empty".to_string(),
        ));
    }
    if settings.venue.password.is_empty() {
        return Err(ConfigError::ValidationError(
            "venue.password must not be empty".to_string(),
        ));
    }
    if settings.instruments.is_empty() {
        return Err(ConfigError::ValidationError(
            "instruments table must not be empty".to_string(),
        ));
    }
    for instrument in &settings.instruments {
        if instrument.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "instrument name must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = "\
venue:
  address: 127.0.0.1
  port: 4000
  username: trader1
  password: hunter2
instruments:
  - name: FOO
  - name: BAR
    id: BAR.X
";

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_config() {
        let file = write_config(VALID);
        let settings = load_settings(file.path().to_str().unwrap()).unwrap();

        assert_eq!(settings.venue.endpoint(), "127.0.0.1:4000");
        assert_eq!(settings.venue.username, "trader1");
        assert_eq!(settings.instruments.len(), 2);
        assert_eq!(settings.instruments[1].id.as_deref(), Some("BAR.X"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = load_settings("/nonexistent/config.yaml");
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let file = write_config("venue: [not a mapping");
        let result = load_settings(file.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn empty_credentials_fail_validation() {
        let contents = VALID.replace("password: hunter2", "password: \"\"");
        let file = write_config(&contents);
        let result = load_settings(file.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn empty_instrument_table_fails_validation() {
        let contents = "\
venue:
  address: 127.0.0.1
  port: 4000
  username: trader1
  password: hunter2
instruments: []
";
        let file = write_config(contents);
        let result = load_settings(file.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn debug_redacts_password() {
        let file = write_config(VALID);
        let settings = load_settings(file.path().to_str().unwrap()).unwrap();

        let debug = format!("{:?}", settings.venue);
        assert!(debug.contains("trader1"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
