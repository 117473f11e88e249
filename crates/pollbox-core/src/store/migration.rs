//! Data file format and schema migration

use super::dataset::Dataset;
use crate::error::{PollboxError, Result};
use crate::types::ProtocolVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// On-disk envelope around the dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    /// Schema version for migration
    pub schema_version: String,
    /// The stored rows
    pub dataset: Dataset,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DatasetFile {
    /// Wrap a dataset with the current schema version
    pub fn new(dataset: Dataset) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            dataset,
            extra: HashMap::new(),
        }
    }

    /// Get the dataset, consuming the file
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Parse schema version
    pub fn parse_version(&self) -> Option<ProtocolVersion> {
        ProtocolVersion::parse(&self.schema_version)
    }
}

/// Dataset schema migrator
pub struct DatasetMigrator;

impl DatasetMigrator {
    /// Migrate a data file to the current schema version
    pub fn migrate(file: DatasetFile) -> Result<DatasetFile> {
        let version = file.parse_version().ok_or_else(|| {
            PollboxError::UnsupportedSchemaVersion(file.schema_version.clone())
        })?;

        let current = ProtocolVersion::V1_0;
        if !version.is_compatible(&current) {
            return Err(PollboxError::UnsupportedSchemaVersion(format!(
                "{} (expected {}.x)",
                file.schema_version, current.major
            )));
        }

        // Only 1.x exists; minor versions share one layout.
        Ok(DatasetFile {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            ..file
        })
    }

    /// Check if a file needs migration
    pub fn needs_migration(file: &DatasetFile) -> bool {
        file.schema_version != CURRENT_SCHEMA_VERSION
    }
}
