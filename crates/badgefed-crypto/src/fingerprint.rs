//! # Credential Fingerprint
//!
//! ```text
//! input     = "SHA-256=" + base64(SHA-256(serialized))
//! signature = RSASSA-PKCS1-v1_5(SHA-256, issuer private key, UTF-8(input))
//! fp        = lowercase_hex(SHA-256(signature))
//! ```
//!
//! The fingerprint is a hash of a signature, not a signature. Nothing here
//! verifies it; it serves as an opaque issuer-bound tag stored on the
//! record.
//!
//! ## Key Encoding
//!
//! Private keys are accepted as PEM, either PKCS#1 (`BEGIN RSA PRIVATE KEY`)
//! or PKCS#8 (`BEGIN PRIVATE KEY`). Keys copied out of JSON or environment
//! variables often carry escaped `\n` sequences; these are turned back into
//! line breaks and surrounding whitespace is trimmed before parsing.

use std::fmt;

use badgefed_core::SerializedMessage;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::digest::{sha256_hex, signing_input};
use crate::error::CryptoError;

const PKCS1_LABEL: &str = "BEGIN RSA PRIVATE KEY";

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// A credential fingerprint: 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse a stored fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidFingerprint`] unless the value is
    /// exactly 64 lowercase hex characters.
    pub fn parse(value: &str) -> Result<Self, CryptoError> {
        let ok = value.len() == 64
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if ok {
            Ok(Self(value.to_string()))
        } else {
            Err(CryptoError::InvalidFingerprint(format!(
                "expected 64 lowercase hex characters, got {:?}",
                value
            )))
        }
    }

    /// The hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned hex string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

// ---------------------------------------------------------------------------
// IssuerPrivateKey
// ---------------------------------------------------------------------------

/// An issuer's RSA private key, ready to sign with PKCS#1 v1.5 / SHA-256.
///
/// The underlying `RsaPrivateKey` zeroizes its components on drop.
pub struct IssuerPrivateKey {
    signing_key: SigningKey<Sha256>,
}

impl IssuerPrivateKey {
    /// Parse a PEM-encoded RSA private key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyError`] if the cleaned text is empty or is
    /// not a PKCS#1 or unencrypted PKCS#8 RSA private key.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let cleaned = clean_pem(pem);
        if cleaned.is_empty() {
            return Err(CryptoError::KeyError("empty key material".to_string()));
        }

        let key = if cleaned.contains(PKCS1_LABEL) {
            RsaPrivateKey::from_pkcs1_pem(&cleaned)
                .map_err(|e| CryptoError::KeyError(format!("PKCS#1: {e}")))?
        } else {
            RsaPrivateKey::from_pkcs8_pem(&cleaned)
                .map_err(|e| CryptoError::KeyError(format!("PKCS#8: {e}")))?
        };

        Ok(Self {
            signing_key: SigningKey::<Sha256>::new(key),
        })
    }

    /// Compute the fingerprint of `message` under this key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SigningFailed`] if the RSA operation fails.
    pub fn fingerprint(&self, message: &SerializedMessage) -> Result<Fingerprint, CryptoError> {
        let input = signing_input(message);
        let signature = self
            .signing_key
            .try_sign_with_rng(&mut rand_core::OsRng, input.as_bytes())
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(Fingerprint(sha256_hex(&signature.to_bytes())))
    }
}

impl fmt::Debug for IssuerPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IssuerPrivateKey(<redacted>)")
    }
}

/// One-shot fingerprint computation from PEM text.
///
/// The parsed key is dropped (and zeroized) before returning.
pub fn compute_fingerprint(
    message: &SerializedMessage,
    private_key_pem: &str,
) -> Result<Fingerprint, CryptoError> {
    IssuerPrivateKey::from_pem(private_key_pem)?.fingerprint(message)
}

fn clean_pem(pem: &str) -> Zeroizing<String> {
    Zeroizing::new(pem.replace("\\n", "\n").trim().to_string())
}
