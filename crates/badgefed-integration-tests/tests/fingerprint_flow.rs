//! # Fingerprint Binding
//!
//! Known-answer and reproducibility checks for the two-step fingerprint,
//! and fingerprinting of stored records through the issuer's key.

use badgefed_core::{BadgeError, IssuerId, Recipient, SerializedMessage};
use badgefed_crypto::{
    compute_fingerprint, content_digest, signing_input, Fingerprint, FingerprintSigner,
    InMemoryKeyProvider,
};
use badgefed_issuance::{
    BadgeNote, InMemoryIssuerDirectory, InMemoryRecipientDirectory, InMemoryRecordStore,
    InMemoryTemplateStore, IssuanceEngine, Issuer, RecordSigner, RecordStore, TemplateDraft,
    TemplateStore,
};
use proptest::prelude::*;

const PKCS1: &str = include_str!("../../badgefed-crypto/testdata/issuer_pkcs1.pem");
const PKCS8: &str = include_str!("../../badgefed-crypto/testdata/issuer_pkcs8.pem");
const NOTE: &str = r#"{"type":"Note","content":"Go Certified"}"#;
const NOTE_FINGERPRINT: &str = "48fc8779d58e813bb42d6d3f63c266ac877043048eac849c18a7c7ad70fd8a8c";

fn is_lower_hex_64(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

// ---------------------------------------------------------------------------
// Known answers
// ---------------------------------------------------------------------------

#[test]
fn note_known_answer() {
    let msg = SerializedMessage::from_external(NOTE);
    assert_eq!(
        content_digest(&msg),
        "t6uPolfdP/aPglA5MNiNSrdaHGrFvfkoaqqFCwNJnGg="
    );
    assert_eq!(
        signing_input(&msg),
        "SHA-256=t6uPolfdP/aPglA5MNiNSrdaHGrFvfkoaqqFCwNJnGg="
    );
    assert_eq!(compute_fingerprint(&msg, PKCS8).unwrap().as_str(), NOTE_FINGERPRINT);
    assert_eq!(compute_fingerprint(&msg, PKCS1).unwrap().as_str(), NOTE_FINGERPRINT);
}

#[test]
fn empty_message_digest() {
    let msg = SerializedMessage::from_external("");
    assert_eq!(
        content_digest(&msg),
        "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
    );
    assert!(is_lower_hex_64(compute_fingerprint(&msg, PKCS8).unwrap().as_str()));
}

#[test]
fn escaped_newline_key_matches_known_answer() {
    let escaped = PKCS8.trim().replace('\n', "\\n");
    let msg = SerializedMessage::from_external(NOTE);
    assert_eq!(compute_fingerprint(&msg, &escaped).unwrap().as_str(), NOTE_FINGERPRINT);
}

#[test]
fn provider_signer_matches_direct_computation() {
    let signer = FingerprintSigner::new(InMemoryKeyProvider::new().with_key(IssuerId(42), PKCS8));
    let msg = SerializedMessage::from_external(NOTE);
    assert_eq!(
        signer.fingerprint(IssuerId(42), &msg).unwrap().as_str(),
        NOTE_FINGERPRINT
    );
    assert!(signer.fingerprint(IssuerId(7), &msg).is_err());
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[test]
fn stored_record_fingerprint_is_reproducible() {
    let issuers = InMemoryIssuerDirectory::new();
    issuers.insert(Issuer {
        id: IssuerId(42),
        name: "Go Academy".into(),
        uri: "https://academy.example/actors/42".into(),
        domain: "academy.example".into(),
        public_key_pem: None,
    });
    let templates = InMemoryTemplateStore::new();
    let recipients = InMemoryRecipientDirectory::new();
    let records = InMemoryRecordStore::new();

    let template = templates
        .upsert(None, TemplateDraft::new("Go Certified", IssuerId(42)))
        .unwrap();
    let record = IssuanceEngine::new(&issuers, &templates, &recipients)
        .grant(&template, Some(&Recipient::with_email("a@b.com")))
        .unwrap();
    let id = records.insert(record).unwrap();
    let stored = records.get(id).unwrap();

    let signer = FingerprintSigner::new(InMemoryKeyProvider::new().with_key(IssuerId(42), PKCS8));
    let record_signer = RecordSigner::new(&signer, &issuers);
    let first = record_signer.sign(stored.clone()).unwrap();
    let second = record_signer.sign(stored.clone()).unwrap();
    let fingerprint = first.fingerprint.clone().unwrap();
    assert_eq!(first.fingerprint, second.fingerprint);
    assert!(is_lower_hex_64(fingerprint.as_str()));

    let note_id = BadgeNote::id_for(&stored).unwrap();
    assert_eq!(note_id, format!("https://academy.example/actors/42/grants/{}", id.get()));
    let message = BadgeNote::from_record(&stored, note_id).to_message().unwrap();
    assert_eq!(compute_fingerprint(&message, PKCS1).unwrap(), fingerprint);

    records.set_fingerprint(id, &fingerprint).unwrap();
    assert_eq!(records.get(id).unwrap().fingerprint, Some(fingerprint));
}

#[test]
fn unknown_issuer_cannot_sign() {
    let issuers = InMemoryIssuerDirectory::new();
    let signer = FingerprintSigner::new(InMemoryKeyProvider::new());
    let records = InMemoryRecordStore::new();
    let templates = InMemoryTemplateStore::new();
    let recipients = InMemoryRecipientDirectory::new();

    issuers.insert(Issuer {
        id: IssuerId(1),
        name: "A".into(),
        uri: "https://a.example/actors/1".into(),
        domain: "a.example".into(),
        public_key_pem: None,
    });
    let template = templates.upsert(None, TemplateDraft::new("T", IssuerId(1))).unwrap();
    let record = IssuanceEngine::new(&issuers, &templates, &recipients)
        .grant(&template, None)
        .unwrap();
    let id = records.insert(record).unwrap();

    // Issuer known, key missing.
    let err = RecordSigner::new(&signer, &issuers)
        .sign(records.get(id).unwrap())
        .unwrap_err();
    assert!(matches!(err, BadgeError::NotFound(_)));
}

#[test]
fn fingerprint_rejects_non_hex() {
    assert!(Fingerprint::parse(&"A".repeat(64)).is_err());
    assert!(Fingerprint::parse("abc").is_err());
    assert!(Fingerprint::parse(NOTE_FINGERPRINT).is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn fingerprint_shape_and_determinism(content in ".{0,64}") {
        let msg = SerializedMessage::new(&serde_json::json!({"type": "Note", "content": content})).unwrap();
        let a = compute_fingerprint(&msg, PKCS8).unwrap();
        let b = compute_fingerprint(&msg, PKCS8).unwrap();
        prop_assert!(is_lower_hex_64(a.as_str()));
        prop_assert_eq!(a, b);
    }
}
