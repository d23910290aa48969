//! Instrument name resolution.
//!
//! Maps operator-facing instrument names to venue identifiers. The table is
//! loaded from configuration at startup and never changes afterwards.

use std::collections::HashMap;

use crate::config::{ConfigError, InstrumentConfig};
use crate::models::InstrumentId;

/// Reference-data table mapping instrument names to venue identifiers.
#[derive(Debug, Clone)]
pub struct Instruments {
    by_name: HashMap<String, InstrumentId>,
    names: Vec<String>,
}

impl Instruments {
    /// Build the table from configuration entries.
    ///
    /// Names are matched case-insensitively; the venue identifier defaults
    /// to the upper-cased name when not configured.
    ///
    /// # Errors
    ///
    /// Returns a validation error on duplicate instrument names.
    pub fn from_config(entries: &[InstrumentConfig]) -> Result<Self, ConfigError> {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut names = Vec::with_capacity(entries.len());

        for entry in entries {
            let name = entry.name.to_ascii_uppercase();
            let id = InstrumentId::new(entry.id.clone().unwrap_or_else(|| name.clone()));

            if by_name.insert(name.clone(), id).is_some() {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate instrument name '{name}'"
                )));
            }
            names.push(name);
        }

        Ok(Self { by_name, names })
    }

    /// Resolve an instrument name to its venue identifier.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&InstrumentId> {
        self.by_name.get(&name.to_ascii_uppercase())
    }

    /// Configured instrument names, in configuration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of configured instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if no instruments are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
