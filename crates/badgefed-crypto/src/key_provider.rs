//! # Issuer Key Providers
//!
//! The capability through which a signer obtains an issuer's private key.
//! A provider hands out PEM text for one signing call; the caller parses,
//! signs, and drops it. Nothing is cached by the signer.
//!
//! Two implementations:
//!
//! - [`InMemoryKeyProvider`]: PEM text held in process memory, keyed by
//!   issuer. Used by tests and for keys hydrated from storage.
//! - [`KeyDirectoryProvider`]: one `<issuer_id>.pem` file per issuer in a
//!   directory, read on demand.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use badgefed_core::IssuerId;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Supplies issuer private keys as PEM text.
pub trait IssuerKeyProvider: Send + Sync {
    /// Return the PEM-encoded private key for `issuer`.
    ///
    /// # Errors
    ///
    /// [`CryptoError::KeyNotFound`] when the provider has no key for the
    /// issuer; [`CryptoError::Io`] when key storage cannot be read.
    fn private_key_pem(&self, issuer: IssuerId) -> Result<Zeroizing<String>, CryptoError>;

    /// Human-readable name for this provider (for diagnostics/logging).
    fn provider_name(&self) -> &str;
}

impl<P: IssuerKeyProvider + ?Sized> IssuerKeyProvider for Arc<P> {
    fn private_key_pem(&self, issuer: IssuerId) -> Result<Zeroizing<String>, CryptoError> {
        (**self).private_key_pem(issuer)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

// ---------------------------------------------------------------------------
// InMemoryKeyProvider
// ---------------------------------------------------------------------------

/// Issuer keys held in process memory.
#[derive(Default)]
pub struct InMemoryKeyProvider {
    keys: HashMap<IssuerId, Zeroizing<String>>,
}

impl InMemoryKeyProvider {
    /// An empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the key for `issuer`.
    pub fn insert(&mut self, issuer: IssuerId, pem: impl Into<String>) {
        self.keys.insert(issuer, Zeroizing::new(pem.into()));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_key(mut self, issuer: IssuerId, pem: impl Into<String>) -> Self {
        self.insert(issuer, pem);
        self
    }

    /// Number of registered issuers.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl IssuerKeyProvider for InMemoryKeyProvider {
    fn private_key_pem(&self, issuer: IssuerId) -> Result<Zeroizing<String>, CryptoError> {
        self.keys
            .get(&issuer)
            .cloned()
            .ok_or(CryptoError::KeyNotFound(issuer))
    }

    fn provider_name(&self) -> &str {
        "InMemoryKeyProvider"
    }
}

// ---------------------------------------------------------------------------
// KeyDirectoryProvider
// ---------------------------------------------------------------------------

/// Reads `<dir>/<issuer_id>.pem` on each request.
///
/// ```text
/// keys/
///   42.pem     # private key of issuer 42
///   43.pem
/// ```
pub struct KeyDirectoryProvider {
    dir: PathBuf,
}

impl KeyDirectoryProvider {
    /// Provider rooted at `dir`. The directory is not checked until a key
    /// is requested.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The key directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the key file for `issuer`.
    pub fn key_path(&self, issuer: IssuerId) -> PathBuf {
        self.dir.join(format!("{}.pem", issuer.get()))
    }
}

impl IssuerKeyProvider for KeyDirectoryProvider {
    fn private_key_pem(&self, issuer: IssuerId) -> Result<Zeroizing<String>, CryptoError> {
        match std::fs::read_to_string(self.key_path(issuer)) {
            Ok(pem) => Ok(Zeroizing::new(pem)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CryptoError::KeyNotFound(issuer)),
            Err(e) => Err(CryptoError::Io(e)),
        }
    }

    fn provider_name(&self) -> &str {
        "KeyDirectoryProvider"
    }
}
