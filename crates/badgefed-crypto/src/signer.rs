//! # Fingerprint Signer
//!
//! Computes record fingerprints for a given issuer, fetching the issuer's
//! key from an injected [`IssuerKeyProvider`] on every call.

use badgefed_core::{IssuerId, SerializedMessage};

use crate::error::CryptoError;
use crate::fingerprint::{Fingerprint, IssuerPrivateKey};
use crate::key_provider::IssuerKeyProvider;

/// Signs serialized messages on behalf of issuers.
pub struct FingerprintSigner<P> {
    provider: P,
}

impl<P: IssuerKeyProvider> FingerprintSigner<P> {
    /// Signer backed by `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The key provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fingerprint `message` with `issuer`'s private key.
    ///
    /// # Errors
    ///
    /// [`CryptoError::KeyNotFound`] if the provider has no key for the
    /// issuer, [`CryptoError::KeyError`] if the key is malformed, and
    /// [`CryptoError::SigningFailed`] if the RSA operation fails.
    pub fn fingerprint(
        &self,
        issuer: IssuerId,
        message: &SerializedMessage,
    ) -> Result<Fingerprint, CryptoError> {
        let pem = self.provider.private_key_pem(issuer)?;
        let key = IssuerPrivateKey::from_pem(&pem)?;
        key.fingerprint(message)
    }
}
