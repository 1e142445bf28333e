//! # Content Digest
//!
//! Computes the content digest of a serialized message and the signing
//! input derived from it:
//!
//! ```text
//! digest        = base64(SHA-256(UTF-8(serialized)))
//! signing input = "SHA-256=" + digest
//! ```
//!
//! The literal `SHA-256=` prefix follows the HTTP-signature `Digest` header
//! convention. Fingerprints stored by other implementations were computed
//! over exactly this string, so it is reproduced verbatim.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use badgefed_core::SerializedMessage;
use sha2::{Digest, Sha256};

/// Prefix of the signing input.
pub const DIGEST_PREFIX: &str = "SHA-256=";

/// `base64(SHA-256(serialized))`, standard alphabet with padding.
pub fn content_digest(message: &SerializedMessage) -> String {
    STANDARD.encode(Sha256::digest(message.as_bytes()))
}

/// The string that is signed: `"SHA-256=" + content_digest(message)`.
pub fn signing_input(message: &SerializedMessage) -> String {
    format!("{DIGEST_PREFIX}{}", content_digest(message))
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_digest_of_empty_message() {
        // openssl dgst -sha256 -binary < /dev/null | base64
        let msg = SerializedMessage::from_external("");
        assert_eq!(
            content_digest(&msg),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }

    #[test]
    fn known_digest_of_note() {
        let msg = SerializedMessage::from_external(r#"{"type":"Note","content":"Go Certified"}"#);
        assert_eq!(
            content_digest(&msg),
            "t6uPolfdP/aPglA5MNiNSrdaHGrFvfkoaqqFCwNJnGg="
        );
        assert_eq!(
            signing_input(&msg),
            "SHA-256=t6uPolfdP/aPglA5MNiNSrdaHGrFvfkoaqqFCwNJnGg="
        );
    }

    #[test]
    fn sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"{}"),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn whitespace_changes_digest() {
        let a = SerializedMessage::from_external(r#"{"a":1}"#);
        let b = SerializedMessage::from_external(r#"{"a": 1}"#);
        assert_ne!(content_digest(&a), content_digest(&b));
    }

    proptest! {
        #[test]
        fn digest_is_reproducible(s in "\\PC{0,256}") {
            let msg = SerializedMessage::from_external(s.clone());
            let again = SerializedMessage::from_external(s);
            prop_assert_eq!(content_digest(&msg), content_digest(&again));
        }

        #[test]
        fn signing_input_shape(s in "\\PC{0,256}") {
            let input = signing_input(&SerializedMessage::from_external(s));
            prop_assert!(input.starts_with(DIGEST_PREFIX));
            // 32 bytes of SHA-256 encode to 44 base64 characters.
            prop_assert_eq!(input.len(), DIGEST_PREFIX.len() + 44);
        }
    }
}
