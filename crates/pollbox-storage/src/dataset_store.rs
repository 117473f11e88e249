//! File system storage for the poll dataset

use pollbox_core::error::{PollboxError, Result};
use pollbox_core::store::{Dataset, DatasetFile, DatasetMigrator, Storage, CURRENT_SCHEMA_VERSION};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Name of the data file inside the base directory
pub const DATA_FILE: &str = "pollbox.json";

/// File system based storage.
///
/// The whole dataset lives in one JSON file. Every transaction rewrites it
/// through a temp file and a rename, so readers never see a half-written file.
pub struct FileSystemStorage {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Path of the data file
    data_path: PathBuf,
    /// Committed state; the lock also serializes writers
    data: Mutex<Dataset>,
}

impl FileSystemStorage {
    /// Open storage in `base_dir`, loading the data file if present
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let data_path = base_dir.join(DATA_FILE);

        ensure_dir(&base_dir)?;
        let data = if data_path.exists() {
            read_dataset(&data_path)?
        } else {
            debug!("No data file at {:?}, starting empty", data_path);
            Dataset::new()
        };

        Ok(Self {
            base_dir,
            data_path,
            data: Mutex::new(data),
        })
    }

    /// Create storage with default directory (~/.pollbox)
    pub fn default_location() -> Result<Self> {
        let base_dir = directories::ProjectDirs::from("com", "pollbox", "pollbox")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".pollbox")
            });

        Self::new(base_dir)
    }

    /// Get base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get data file path
    pub fn data_path(&self) -> &PathBuf {
        &self.data_path
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self) -> PathBuf {
        self.base_dir.join(format!(".{}.tmp", DATA_FILE))
    }

    /// Write dataset atomically (write to temp, then rename)
    fn atomic_write(&self, dataset: &Dataset) -> Result<()> {
        let temp_path = self.temp_path();
        let file = DatasetFile::new(dataset.clone());

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            PollboxError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;

        fs::rename(&temp_path, &self.data_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PollboxError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved dataset to {:?}", self.data_path);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dataset>> {
        self.data
            .lock()
            .map_err(|_| PollboxError::Storage("storage lock poisoned".to_string()))
    }
}

impl Storage for FileSystemStorage {
    fn snapshot(&self) -> Result<Dataset> {
        Ok(self.lock()?.clone())
    }

    fn transact(&self, change: &mut dyn FnMut(&mut Dataset) -> Result<()>) -> Result<()> {
        let mut data = self.lock()?;
        let mut working = data.clone();
        change(&mut working)?;

        if working != *data {
            self.atomic_write(&working)?;
            *data = working;
        }
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            PollboxError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;
        debug!("Created data directory: {:?}", dir);
    }
    Ok(())
}

/// Read, parse and migrate a data file
fn read_dataset(path: &Path) -> Result<Dataset> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let data_file: DatasetFile = serde_json::from_reader(reader)?;

    let migrated = if DatasetMigrator::needs_migration(&data_file) {
        info!(
            "Migrating data file from version {} to {}",
            data_file.schema_version, CURRENT_SCHEMA_VERSION
        );
        DatasetMigrator::migrate(data_file)?
    } else {
        data_file
    };

    Ok(migrated.into_dataset())
}
