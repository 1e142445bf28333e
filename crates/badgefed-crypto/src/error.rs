//! # Cryptographic Error Types
//!
//! Structured errors for fingerprinting and key loading. Each variant maps
//! onto one condition of the core [`BadgeError`] taxonomy.

use badgefed_core::{BadgeError, IssuerId};
use thiserror::Error;

/// Errors from cryptographic operations in `badgefed-crypto`.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Private key material is malformed or cannot be parsed.
    #[error("malformed private key: {0}")]
    KeyError(String),

    /// The RSA signing operation failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The key provider holds no private key for the issuer.
    #[error("no private key for {0}")]
    KeyNotFound(IssuerId),

    /// A stored fingerprint is not 64 lowercase hex characters.
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// Key material could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CryptoError> for BadgeError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::KeyError(msg) => BadgeError::KeyError(msg),
            CryptoError::SigningFailed(msg) => BadgeError::Crypto(msg),
            CryptoError::KeyNotFound(issuer) => {
                BadgeError::NotFound(format!("private key for {issuer}"))
            }
            CryptoError::InvalidFingerprint(msg) => BadgeError::CorruptRecord(msg),
            CryptoError::Io(e) => BadgeError::KeyError(format!("unreadable key material: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_error_maps_to_key_error() {
        let err: BadgeError = CryptoError::KeyError("bad pem".into()).into();
        assert!(matches!(err, BadgeError::KeyError(m) if m == "bad pem"));
    }

    #[test]
    fn signing_failure_maps_to_crypto() {
        let err: BadgeError = CryptoError::SigningFailed("boom".into()).into();
        assert!(matches!(err, BadgeError::Crypto(_)));
    }

    #[test]
    fn missing_key_maps_to_not_found() {
        let err: BadgeError = CryptoError::KeyNotFound(IssuerId(42)).into();
        match err {
            BadgeError::NotFound(msg) => assert!(msg.contains("issuer:42")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn io_error_maps_to_key_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BadgeError = CryptoError::from(io).into();
        assert!(matches!(err, BadgeError::KeyError(_)));
    }
}
