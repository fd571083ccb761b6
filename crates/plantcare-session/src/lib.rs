#![warn(missing_docs)]
//! # plantcare-session
//!
//! ## Purpose
//! Holds the single bearer token that proves an authenticated session.
//!
//! ## Responsibilities
//! - Define the [`SessionStore`] contract: `get`, `set`, `clear`.
//! - Provide an in-memory store for tests and embedded use.
//! - Provide a file-backed store that persists the token between runs.
//!
//! ## Data flow
//! Login success -> [`SessionStore::set`] -> every authenticated request reads
//! [`SessionStore::get`] -> logout or auth denial -> [`SessionStore::clear`].
//!
//! ## Ownership and lifetimes
//! Stores are shared behind `Arc<dyn SessionStore>` and injected into the API
//! client and page controllers; tokens are handed out as owned `String`s.
//!
//! ## Error model
//! Storage I/O and encode failures surface as [`SessionError`]. A session file
//! that no longer parses reads as signed out and is overwritten by the next
//! `set` or `clear`. The store does not validate expiry; the server is the
//! only authority on token validity.
//!
//! ## Security and privacy notes
//! Token values are never logged. Only presence transitions are traced. On
//! unix the session file is kept at mode `0600`.
//!
//! ## Example
//! ```rust
//! use plantcare_session::{MemorySessionStore, SessionStore};
//!
//! let store = MemorySessionStore::new();
//! store.set("abc").unwrap();
//! assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
//! store.clear().unwrap();
//! assert!(store.get().unwrap().is_none());
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Well-known storage key under which the bearer token is kept.
pub const SESSION_TOKEN_KEY: &str = "token";

/// Persistent holder of the one bearer token per profile.
pub trait SessionStore: Send + Sync {
    /// Returns the stored token, or `None` when no session exists.
    ///
    /// # Errors
    /// Returns [`SessionError`] when backing storage cannot be read.
    fn get(&self) -> Result<Option<String>, SessionError>;

    /// Replaces the stored token.
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyToken`] for blank tokens and storage
    /// errors when the token cannot be persisted.
    fn set(&self, token: &str) -> Result<(), SessionError>;

    /// Removes the stored token. Clearing an absent token is a no-op.
    ///
    /// # Errors
    /// Returns [`SessionError`] when backing storage cannot be updated.
    fn clear(&self) -> Result<(), SessionError>;

    /// Returns `true` when a token is present and readable.
    fn has_token(&self) -> bool {
        matches!(self.get(), Ok(Some(_)))
    }
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        let guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(token.to_string());
        tracing::debug!(stage = "session", action = "set", "token stored in memory");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        tracing::debug!(stage = "session", action = "clear", "memory session cleared");
        Ok(())
    }
}

/// Session store persisted as a small JSON key/value document.
///
/// Other keys present in the document are preserved across writes.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates a store backed by `path`. The file is created lazily on `set`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Document, SessionError> {
        match std::fs::read(&self.path) {
            Ok(raw) if raw.iter().all(u8::is_ascii_whitespace) => Ok(Document::default()),
            Ok(raw) => match serde_json::from_slice(&raw) {
                Ok(entries) => Ok(Document {
                    entries,
                    corrupt: false,
                }),
                Err(error) => {
                    tracing::warn!(
                        stage = "session",
                        action = "corrupt_reset",
                        path = %self.path.display(),
                        %error,
                        "unreadable session file treated as signed out"
                    );
                    Ok(Document {
                        entries: BTreeMap::new(),
                        corrupt: true,
                    })
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let encoded = serde_json::to_vec_pretty(entries).map_err(|source| SessionError::Codec {
            path: self.path.clone(),
            source,
        })?;
        write_private(&self.path, &encoded).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Decoded session document. `corrupt` marks a file that failed to parse and
/// must be rewritten on the next mutation.
#[derive(Debug, Default)]
struct Document {
    entries: BTreeMap<String, String>,
    corrupt: bool,
}

/// Writes `bytes` to `path`, readable and writable by the owner only on unix.
#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten files left by older runs.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        let document = self.read_entries()?;
        Ok(document
            .entries
            .get(SESSION_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
            .cloned())
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut document = self.read_entries()?;
        document
            .entries
            .insert(SESSION_TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&document.entries)?;
        tracing::info!(
            stage = "session",
            action = "set",
            path = %self.path.display(),
            "session token persisted"
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut document = self.read_entries()?;
        if document.entries.remove(SESSION_TOKEN_KEY).is_none() && !document.corrupt {
            return Ok(());
        }
        self.write_entries(&document.entries)?;
        tracing::info!(
            stage = "session",
            action = "clear",
            path = %self.path.display(),
            "session token removed"
        );
        Ok(())
    }
}

/// Errors produced by session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Refused to store a blank token.
    #[error("session token must be non-empty")]
    EmptyToken,
    /// Backing file could not be read or written.
    #[error("session storage i/o failure at {path}: {source}")]
    Io {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Session entries could not be encoded for writing.
    #[error("session storage at {path} could not be encoded: {source}")]
    Codec {
        /// Target file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A previous holder of the store lock panicked.
    #[error("session store lock poisoned")]
    Poisoned,
}
