//! # badgefed-crypto — Fingerprint Binding for Issued Credentials
//!
//! Provides the cryptographic building blocks that bind an issued credential
//! to its issuer's key:
//!
//! - **Content digest** (`digest.rs`): `base64(SHA-256(serialized))` and the
//!   `SHA-256=<digest>` signing input, in the HTTP-signature digest header
//!   convention.
//! - **Fingerprint** (`fingerprint.rs`): RSASSA-PKCS1-v1_5/SHA-256 signature
//!   over the signing input, then SHA-256 of the raw signature rendered as
//!   lowercase hex. The stored fingerprint is this hash-of-signature.
//! - **Key providers** (`key_provider.rs`): the capability through which a
//!   signer obtains an issuer's private key for a single signing call.
//! - **Signer** (`signer.rs`): `FingerprintSigner`, constructed with an
//!   injected key provider.
//!
//! ## Crate Policy
//!
//! - Depends only on `badgefed-core` internally.
//! - Signing input must be `&SerializedMessage`; raw strings are not accepted.
//! - Private key material is held in zeroizing buffers and never logged or
//!   serialized.
//! - No mocking of cryptographic operations in tests: tests sign with real
//!   RSA keys from `testdata/`.

pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod key_provider;
pub mod signer;

// Re-export primary types.
pub use digest::{content_digest, signing_input, DIGEST_PREFIX};
pub use error::CryptoError;
pub use fingerprint::{compute_fingerprint, Fingerprint, IssuerPrivateKey};
pub use key_provider::{InMemoryKeyProvider, IssuerKeyProvider, KeyDirectoryProvider};
pub use signer::FingerprintSigner;
