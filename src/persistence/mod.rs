//! File-backed persistence
//!
//! Save slots, the currency wallet, level records and settings are small JSON
//! documents under a storage root. Every record carries a `version` string.
//!
//! Loaders never fail: a missing or corrupt file is logged, replaced by the
//! default template and read back. Writes go to a temp file first and are
//! renamed over the target so a crash never leaves a half-written record.
//!
//! Persistence runs at screen boundaries only (init/unload), never mid-frame.

pub mod records;
pub mod wallet;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use records::{LevelRecord, SaveSlot};
pub use wallet::{CurrencyBalance, CurrencyWallet};

/// Version string written into every record
pub const RECORD_VERSION: &str = "1.0";

/// Environment variable overriding the storage root
pub const STORAGE_ENV: &str = "DELVE_STORAGE_DIR";

/// Storage root used when neither the CLI nor the environment names one
pub const DEFAULT_STORAGE_DIR: &str = "storage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A directory of JSON records
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Pick the storage root: CLI argument, then `DELVE_STORAGE_DIR`, then `storage`
    pub fn resolve_root(cli_arg: Option<String>) -> PathBuf {
        cli_arg
            .or_else(|| std::env::var(STORAGE_ENV).ok())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string())
            .into()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Read and parse one record
    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, StorageError> {
        let path = self.path(name);
        let json = fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| StorageError::Parse { path, source })
    }

    /// Serialize and write one record (temp file, then rename)
    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path(name);
        let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize {
            path: path.clone(),
            source,
        })?;

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StorageError::Io { path, source }
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Load a record, regenerating it from `template` when missing or corrupt
    pub fn load_or_else<T, F>(&self, name: &str, template: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.read(name) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("{}; writing default template", err);
                let fallback = template();
                if let Err(err) = self.write(name, &fallback) {
                    log::warn!("{}", err);
                    return fallback;
                }
                match self.read(name) {
                    Ok(value) => value,
                    Err(err) => {
                        log::warn!("{}; using in-memory default", err);
                        fallback
                    }
                }
            }
        }
    }

    pub fn load_or_default<T>(&self, name: &str) -> T
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.load_or_else(name, T::default)
    }

    pub fn load_slot(&self, id: u32) -> SaveSlot {
        self.load_or_else(&SaveSlot::file_name(id), || SaveSlot::new(id))
    }

    pub fn save_slot(&self, slot: &SaveSlot) -> Result<(), StorageError> {
        self.write(&SaveSlot::file_name(slot.id), slot)
    }

    pub fn load_wallet(&self) -> CurrencyWallet {
        self.load_or_default(CurrencyWallet::FILE_NAME)
    }

    pub fn save_wallet(&self, wallet: &CurrencyWallet) -> Result<(), StorageError> {
        self.write(CurrencyWallet::FILE_NAME, wallet)
    }

    pub fn load_level(&self, id: u32) -> LevelRecord {
        self.load_or_else(&LevelRecord::file_name(id), || LevelRecord::new(id))
    }

    pub fn save_level(&self, record: &LevelRecord) -> Result<(), StorageError> {
        self.write(&LevelRecord::file_name(record.id), record)
    }
}
