//! Configuration for the core crate
//!
//! This module provides configuration options for the core crate: the
//! metadata schema commitments are computed against, batch settings, and
//! logging.

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::codec::FieldType;
use crate::error::{CoreError, Result};
use crate::schema::{Field, Schema};

/// Batch commitment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of threads used to commit one batch
    pub max_parallelism: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            max_parallelism: 4,
        }
    }
}

/// Core configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Ordered metadata schema
    pub schema: Schema,

    /// Batch configuration
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CoreConfig {
    /// Create a new configuration for a schema with default settings
    pub fn new(schema: Schema) -> Self {
        CoreConfig {
            schema,
            batch: BatchConfig::default(),
            log_level: default_log_level(),
        }
    }

    /// Check settings that the schema type itself cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.batch.max_parallelism == 0 {
            return Err(CoreError::ConfigError(
                "batch.max_parallelism must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: CoreConfig = serde_json::from_reader(file)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;

        Ok(())
    }

    /// Create a development configuration
    pub fn development(schema: Schema) -> Self {
        let mut config = Self::new(schema);
        config.log_level = "debug".to_string();
        config
    }

    /// Create a testing configuration with a small sample schema
    pub fn testing() -> Self {
        let schema = Schema::new(vec![
            Field::new("name", FieldType::String),
            Field::new("rarity", FieldType::UInt8),
        ])
        .unwrap_or_else(|_| Schema::edition());

        let mut config = Self::new(schema);
        config.log_level = "debug".to_string();
        config.batch.max_parallelism = 1;
        config
    }
}
