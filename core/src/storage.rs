//! Persistent storage for the credential token.
//!
//! # Design
//! Exactly one value is persisted, under the fixed key `TOKEN_KEY`. The
//! `TokenStore` trait is the only way to reach it, and only `SessionStore`
//! and `ApiClient` hold one. `FileStore` is the terminal analogue of browser
//! local storage: one file named after the key inside a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Storage key of the credential token.
pub const TOKEN_KEY: &str = "token";

/// Persistent slot holding the credential token.
pub trait TokenStore: Send {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&mut self, token: &str) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory store used by tests and embedders without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    token: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl TokenStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<(), StorageError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.token = None;
        Ok(())
    }
}

/// Token persisted as `<dir>/token`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
