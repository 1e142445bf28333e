//! # Single-Use Acceptance
//!
//! Redemption runs in two steps. [`AcceptanceService::find_claimable()`]
//! checks a presented token against a pending record and returns a
//! [`Claim`]; [`AcceptanceService::accept()`] consumes it through the
//! store's atomic conditional accept. A claim can only be obtained from a
//! successful lookup, and replaying one after the record was accepted fails.
//!
//! Every lookup failure (unknown id, wrong token, already accepted) is the
//! same `NotFound`, so callers cannot probe which part was wrong. Accept
//! failures are `InvalidState`.

use badgefed_core::{BadgeError, RecordId, Timestamp};

use crate::record::CredentialRecord;
use crate::store::RecordStore;

/// Proof that a token matched a pending record at lookup time.
#[derive(Clone)]
pub struct Claim {
    record: CredentialRecord,
    token: String,
}

impl Claim {
    /// The record as it was when the claim was made.
    pub fn record(&self) -> &CredentialRecord {
        &self.record
    }

    fn record_id(&self) -> Result<RecordId, BadgeError> {
        self.record
            .id
            .ok_or_else(|| BadgeError::CorruptRecord("stored record without id".to_string()))
    }
}

impl std::fmt::Debug for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Claim")
            .field("record_id", &self.record.id)
            .finish_non_exhaustive()
    }
}

/// Redeems accept tokens against a record store.
pub struct AcceptanceService<'a> {
    records: &'a dyn RecordStore,
}

impl<'a> AcceptanceService<'a> {
    pub fn new(records: &'a dyn RecordStore) -> Self {
        Self { records }
    }

    /// Look up a pending record by id and exact token.
    ///
    /// # Errors
    ///
    /// [`BadgeError::NotFound`] for an unknown id, a wrong token, or a record
    /// that is no longer pending.
    pub fn find_claimable(&self, id: RecordId, presented: &str) -> Result<Claim, BadgeError> {
        let unclaimable = || BadgeError::NotFound(format!("no claimable {id}"));
        let record = match self.records.get(id) {
            Ok(record) => record,
            Err(BadgeError::NotFound(_)) => return Err(unclaimable()),
            Err(e) => return Err(e),
        };
        if !record.acceptance.admits(presented) {
            tracing::debug!(record_id = %id, "accept token rejected");
            return Err(unclaimable());
        }
        Ok(Claim {
            record,
            token: presented.to_string(),
        })
    }

    /// Accept a claimed record on behalf of `claimant`.
    ///
    /// # Errors
    ///
    /// [`BadgeError::InvalidState`] if the record was accepted since the
    /// claim was made (including by a replay of this claim).
    pub fn accept(&self, claim: &Claim, claimant: &str) -> Result<CredentialRecord, BadgeError> {
        let id = claim.record_id()?;
        let now = Timestamp::now();
        if !self
            .records
            .conditional_accept(id, &claim.token, claimant, now)?
        {
            tracing::debug!(record_id = %id, "claim no longer pending");
            return Err(BadgeError::InvalidState(format!("{id} is not pending")));
        }
        tracing::info!(record_id = %id, "credential accepted");
        self.records.get(id)
    }

    /// [`find_claimable`](Self::find_claimable) followed by
    /// [`accept`](Self::accept).
    pub fn redeem(
        &self,
        id: RecordId,
        presented: &str,
        claimant: &str,
    ) -> Result<CredentialRecord, BadgeError> {
        let claim = self.find_claimable(id, presented)?;
        self.accept(&claim, claimant)
    }
}
