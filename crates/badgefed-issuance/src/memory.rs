//! # In-Memory Stores
//!
//! Thread-safe implementations of the store interfaces over a generic
//! [`Store`]. Used by tests, and by the CLI as the working set hydrated from
//! SQLite for a single command.
//!
//! All locks are `parking_lot` (non-poisoning) and are never held across
//! calls back into user code other than the closures passed to
//! [`Store::try_update()`] and [`Store::modify()`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use badgefed_core::{
    BadgeError, IssuerId, Recipient, RecipientId, RecipientKind, RecordId, TemplateId, Timestamp,
};
use badgefed_crypto::Fingerprint;

use crate::record::{CredentialRecord, RecordFilter};
use crate::store::{IssuerDirectory, RecipientDirectory, RecordStore, TemplateStore};
use crate::template::{CredentialTemplate, Issuer, TemplateDraft};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// Clones share the same underlying map.
#[derive(Debug)]
pub struct Store<K, T> {
    data: Arc<RwLock<HashMap<K, T>>>,
}

impl<K, T> Clone for Store<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K, T> Default for Store<K, T> {
    fn default() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Ord + Copy, T: Clone> Store<K, T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value if the key existed.
    pub fn insert(&self, id: K, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a value by key.
    pub fn get(&self, id: &K) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// All values, ordered by key.
    pub fn list(&self) -> Vec<T> {
        let guard = self.data.read();
        let mut keys: Vec<&K> = guard.keys().collect();
        keys.sort();
        keys.into_iter().filter_map(|k| guard.get(k).cloned()).collect()
    }

    /// Atomically read-validate-update a value.
    ///
    /// The closure runs under the write lock, so the read of the current
    /// value and the update cannot be interleaved with another writer.
    /// Returns `None` if the key is absent, or `Some` with the closure's
    /// result.
    pub fn try_update<R, E>(
        &self,
        id: &K,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Run `f` against the whole map under the write lock.
    pub fn modify<R>(&self, f: impl FnOnce(&mut HashMap<K, T>) -> R) -> R {
        f(&mut self.data.write())
    }

    /// Remove a value by key.
    pub fn remove(&self, id: &K) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Monotonic id allocator shared between clones.
#[derive(Debug, Clone)]
struct IdSequence(Arc<AtomicI64>);

impl IdSequence {
    fn new() -> Self {
        Self(Arc::new(AtomicI64::new(1)))
    }

    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Ensure later allocations are greater than `seen`.
    fn observe(&self, seen: i64) {
        self.0.fetch_max(seen + 1, Ordering::Relaxed);
    }
}

// -- Templates ----------------------------------------------------------------

/// In-memory [`TemplateStore`].
#[derive(Debug, Clone)]
pub struct InMemoryTemplateStore {
    templates: Store<TemplateId, CredentialTemplate>,
    ids: IdSequence,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self {
            templates: Store::new(),
            ids: IdSequence::new(),
        }
    }

    /// Load an already-stored template, keeping its id and timestamps.
    pub fn hydrate(&self, template: CredentialTemplate) {
        self.ids.observe(template.id.get());
        self.templates.insert(template.id, template);
    }
}

impl Default for InMemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn template(&self, id: TemplateId) -> Result<CredentialTemplate, BadgeError> {
        self.templates
            .get(&id)
            .ok_or_else(|| BadgeError::NotFound(id.to_string()))
    }

    fn upsert(
        &self,
        id: Option<TemplateId>,
        draft: TemplateDraft,
    ) -> Result<CredentialTemplate, BadgeError> {
        let now = Timestamp::now();
        match id {
            None => {
                let id = TemplateId(self.ids.next());
                let template = CredentialTemplate::from_draft(id, draft, now);
                self.templates.insert(id, template.clone());
                Ok(template)
            }
            Some(id) => self
                .templates
                .try_update(&id, |t| {
                    t.apply(draft, now);
                    Ok(t.clone())
                })
                .unwrap_or_else(|| Err(BadgeError::NotFound(id.to_string()))),
        }
    }

    fn delete(&self, id: TemplateId) -> Result<(), BadgeError> {
        self.templates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BadgeError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<CredentialTemplate>, BadgeError> {
        Ok(self.templates.list())
    }
}

// -- Issuers ------------------------------------------------------------------

/// In-memory [`IssuerDirectory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssuerDirectory {
    issuers: Store<IssuerId, Issuer>,
}

impl InMemoryIssuerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an issuer.
    pub fn insert(&self, issuer: Issuer) {
        self.issuers.insert(issuer.id, issuer);
    }
}

impl IssuerDirectory for InMemoryIssuerDirectory {
    fn issuer(&self, id: IssuerId) -> Result<Issuer, BadgeError> {
        self.issuers
            .get(&id)
            .ok_or_else(|| BadgeError::NotFound(id.to_string()))
    }

    fn issuer_by_uri(&self, uri: &str) -> Result<Issuer, BadgeError> {
        self.issuers
            .list()
            .into_iter()
            .find(|i| i.uri == uri)
            .ok_or_else(|| BadgeError::NotFound(format!("issuer with uri {uri}")))
    }
}

// -- Records ------------------------------------------------------------------

/// In-memory [`RecordStore`].
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore {
    records: Store<RecordId, CredentialRecord>,
    ids: IdSequence,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Store::new(),
            ids: IdSequence::new(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, mut record: CredentialRecord) -> Result<RecordId, BadgeError> {
        self.records.modify(|map| {
            if let Some(token) = record.acceptance.accept_key() {
                let clash = map
                    .values()
                    .filter_map(|r| r.acceptance.accept_key())
                    .any(|other| other == token);
                if clash {
                    return Err(BadgeError::InvalidState(
                        "accept key already in use".to_string(),
                    ));
                }
            }
            let id = RecordId(self.ids.next());
            record.id = Some(id);
            map.insert(id, record);
            Ok(id)
        })
    }

    fn get(&self, id: RecordId) -> Result<CredentialRecord, BadgeError> {
        self.records
            .get(&id)
            .ok_or_else(|| BadgeError::NotFound(id.to_string()))
    }

    fn conditional_accept(
        &self,
        id: RecordId,
        expected_token: &str,
        claimant: &str,
        now: Timestamp,
    ) -> Result<bool, BadgeError> {
        let outcome = self.records.try_update(&id, |record| {
            if !record.acceptance.admits(expected_token) {
                return Ok(false);
            }
            record.acceptance.accept(now)?;
            record.issued_to = claimant.to_string();
            Ok::<bool, BadgeError>(true)
        });
        outcome.unwrap_or(Ok(false))
    }

    fn set_fingerprint(&self, id: RecordId, fingerprint: &Fingerprint) -> Result<(), BadgeError> {
        self.records
            .try_update(&id, |record| {
                record.fingerprint = Some(fingerprint.clone());
                Ok(())
            })
            .unwrap_or_else(|| Err(BadgeError::NotFound(id.to_string())))
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<CredentialRecord>, BadgeError> {
        Ok(self
            .records
            .list()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }
}

// -- Recipients ---------------------------------------------------------------

/// In-memory [`RecipientDirectory`].
#[derive(Debug, Clone)]
pub struct InMemoryRecipientDirectory {
    recipients: Store<RecipientId, Recipient>,
    ids: IdSequence,
}

impl InMemoryRecipientDirectory {
    pub fn new() -> Self {
        Self {
            recipients: Store::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryRecipientDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipientDirectory for InMemoryRecipientDirectory {
    fn find(
        &self,
        kind: RecipientKind,
        identifier: &str,
    ) -> Result<Option<Recipient>, BadgeError> {
        Ok(self
            .recipients
            .list()
            .into_iter()
            .find(|r| r.identifier(kind) == Some(identifier)))
    }

    fn insert(&self, mut recipient: Recipient) -> Result<RecipientId, BadgeError> {
        let id = match recipient.id {
            Some(id) => {
                self.ids.observe(id.get());
                id
            }
            None => RecipientId(self.ids.next()),
        };
        recipient.id = Some(id);
        self.recipients.insert(id, recipient);
        Ok(id)
    }
}
