//! Identity Registry
//!
//! Append-only store binding a file's path (relative to the build directory)
//! to the GUID used for its component. Regenerating the manifest must reuse
//! the same GUID for the same path, otherwise Windows Installer treats the
//! file as a different component on upgrade.
//!
//! The whole store is loaded into memory when the registry is opened. Each
//! newly minted token is appended to the backend before it is handed out.

pub mod persistence;

pub use persistence::{FileRegistryBackend, MemoryRegistryBackend};

use crate::error::RegistryError;
use crate::tree::path::registry_key;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// One `"<token> <relativePath>"` line of the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRecord {
    pub token: String,
    pub path: String,
}

impl RegistryRecord {
    /// Parse one line without its `\n`. A trailing `\r` is dropped; the path is
    /// everything after the first space, kept byte for byte.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (token, path) = line.split_once(' ')?;
        if token.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
            path: path.to_string(),
        })
    }

    pub fn to_line(&self) -> String {
        format!("{} {}", self.token, self.path)
    }
}

/// Storage behind an [`IdentityRegistry`]
pub trait RegistryBackend {
    /// Read every record, in insertion order.
    fn load(&self) -> Result<Vec<RegistryRecord>, RegistryError>;

    /// Persist one new record. Must be durable when this returns.
    fn append(&mut self, record: &RegistryRecord) -> Result<(), RegistryError>;
}

/// Produces fresh, globally unique tokens
pub type TokenMinter = Box<dyn FnMut() -> String>;

/// Time-ordered random UUID, hyphenated lowercase
pub fn mint_token() -> String {
    Uuid::now_v7().to_string()
}

/// Path-keyed token registry
pub struct IdentityRegistry<B: RegistryBackend> {
    backend: B,
    tokens: HashMap<String, String>,
    minter: TokenMinter,
    minted: usize,
}

impl<B: RegistryBackend> IdentityRegistry<B> {
    /// Open a registry, loading every existing record from the backend.
    pub fn open(backend: B) -> Result<Self, RegistryError> {
        Self::with_minter(backend, Box::new(mint_token))
    }

    /// Open a registry that mints new tokens with `minter`.
    pub fn with_minter(backend: B, minter: TokenMinter) -> Result<Self, RegistryError> {
        let mut tokens = HashMap::new();
        for record in backend.load()? {
            // First occurrence wins
            tokens.entry(record.path).or_insert(record.token);
        }
        debug!(records = tokens.len(), "Identity registry loaded");

        Ok(Self {
            backend,
            tokens,
            minter,
            minted: 0,
        })
    }

    /// Token for `relative_path`, minting and persisting one if the path is new.
    pub fn resolve_stable_id(&mut self, relative_path: &Path) -> Result<String, RegistryError> {
        let key = registry_key(relative_path);
        if let Some(token) = self.tokens.get(&key) {
            return Ok(token.clone());
        }
        if key.contains(|c| c == '\n' || c == '\r') {
            return Err(RegistryError::UnrepresentablePath { path: key });
        }

        let record = RegistryRecord {
            token: (self.minter)(),
            path: key,
        };
        self.backend.append(&record)?;
        debug!(path = %record.path, token = %record.token, "Minted stable id");

        self.minted += 1;
        self.tokens.insert(record.path, record.token.clone());
        Ok(record.token)
    }

    /// Tokens minted since the registry was opened.
    pub fn minted(&self) -> usize {
        self.minted
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
