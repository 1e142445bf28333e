//! Credential record persistence operations on the `badge_records` table.
//!
//! The acceptance state is stored as two nullable columns, `accept_key` and
//! `accepted_on`. They are only ever written together: by
//! [`insert`] (pending) and by [`conditional_accept`] (accepted). Reading a
//! row back goes through `AcceptanceState::from_columns`, which rejects a
//! row holding both or neither as corrupt.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use badgefed_core::{RecordId, TemplateId, Timestamp};
use badgefed_crypto::Fingerprint;
use badgefed_issuance::{CredentialRecord, RecordFilter};
use badgefed_state::AcceptanceState;

use super::decode_error;

const COLUMNS: &str = "id, badge_id, title, description, image, image_alt_text, earning_criteria, \
                       issued_by, issued_on, accept_key, accepted_on, fingerprint, \
                       issued_to_name, issued_to_email, issued_to_subject_uri, issued_to, \
                       issued_using";

/// Insert a record and return its assigned id. The record's own `id` is
/// ignored.
pub async fn insert(pool: &SqlitePool, record: &CredentialRecord) -> Result<RecordId, sqlx::Error> {
    let (accept_key, accepted_on) = record.acceptance.to_columns();

    let result = sqlx::query(
        "INSERT INTO badge_records (badge_id, title, description, image, image_alt_text,
                earning_criteria, issued_by, issued_on, accept_key, accepted_on, fingerprint,
                issued_to_name, issued_to_email, issued_to_subject_uri, issued_to, issued_using)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
    )
    .bind(record.template_id.get())
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.image)
    .bind(&record.image_alt_text)
    .bind(&record.earning_criteria)
    .bind(&record.issued_by)
    .bind(*record.issued_on.as_datetime())
    .bind(accept_key)
    .bind(accepted_on.map(|t| *t.as_datetime()))
    .bind(record.fingerprint.as_ref().map(Fingerprint::as_str))
    .bind(&record.issued_to_name)
    .bind(&record.issued_to_email)
    .bind(&record.issued_to_subject_uri)
    .bind(&record.issued_to)
    .bind(&record.issued_using)
    .execute(pool)
    .await?;

    let id = RecordId(result.last_insert_rowid());
    tracing::debug!(record_id = %id, template_id = %record.template_id, "record stored");
    Ok(id)
}

/// Fetch a record by id.
pub async fn get_by_id(
    pool: &SqlitePool,
    id: RecordId,
) -> Result<Option<CredentialRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, RecordRow>(&format!(
        "SELECT {COLUMNS} FROM badge_records WHERE id = ?1"
    ))
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    row.map(RecordRow::into_record).transpose()
}

/// Atomically accept record `id` if it is still pending with `expected_token`.
///
/// Clears the token, stamps `accepted_on = now` and records `claimant` as
/// the issued-to identity. Returns whether the row was updated; `false`
/// covers an unknown id, a wrong token, and an already accepted record.
pub async fn conditional_accept(
    pool: &SqlitePool,
    id: RecordId,
    expected_token: &str,
    claimant: &str,
    now: Timestamp,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE badge_records
         SET accepted_on = ?1, accept_key = NULL, issued_to = ?2
         WHERE id = ?3 AND accept_key = ?4 AND accepted_on IS NULL",
    )
    .bind(*now.as_datetime())
    .bind(claimant)
    .bind(id.get())
    .bind(expected_token)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Store the fingerprint of record `id`. Returns whether the record exists.
pub async fn set_fingerprint(
    pool: &SqlitePool,
    id: RecordId,
    fingerprint: &Fingerprint,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE badge_records SET fingerprint = ?1 WHERE id = ?2")
        .bind(fingerprint.as_str())
        .bind(id.get())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Records matching `filter`, ordered by id.
pub async fn list(
    pool: &SqlitePool,
    filter: &RecordFilter,
) -> Result<Vec<CredentialRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RecordRow>(&format!(
        "SELECT {COLUMNS} FROM badge_records
         WHERE (?1 IS NULL OR issued_to = ?1) AND (?2 IS NULL OR badge_id = ?2)
         ORDER BY id"
    ))
    .bind(filter.issued_to.as_deref())
    .bind(filter.template_id.map(|t| t.get()))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(RecordRow::into_record).collect()
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: i64,
    badge_id: i64,
    title: String,
    description: String,
    image: String,
    image_alt_text: String,
    earning_criteria: String,
    issued_by: String,
    issued_on: DateTime<Utc>,
    accept_key: Option<String>,
    accepted_on: Option<DateTime<Utc>>,
    fingerprint: Option<String>,
    issued_to_name: String,
    issued_to_email: String,
    issued_to_subject_uri: String,
    issued_to: String,
    issued_using: Option<String>,
}

impl RecordRow {
    fn into_record(self) -> Result<CredentialRecord, sqlx::Error> {
        let acceptance =
            AcceptanceState::from_columns(self.accept_key, self.accepted_on.map(Timestamp::from_utc))
                .map_err(|e| {
                    tracing::error!(record_id = self.id, error = %e, "corrupt acceptance columns");
                    decode_error(e)
                })?;

        let fingerprint = self
            .fingerprint
            .as_deref()
            .map(Fingerprint::parse)
            .transpose()
            .map_err(|e| {
                tracing::error!(record_id = self.id, error = %e, "corrupt fingerprint column");
                decode_error(e)
            })?;

        Ok(CredentialRecord {
            id: Some(RecordId(self.id)),
            template_id: TemplateId(self.badge_id),
            title: self.title,
            description: self.description,
            image: self.image,
            image_alt_text: self.image_alt_text,
            earning_criteria: self.earning_criteria,
            issued_by: self.issued_by,
            issued_on: Timestamp::from_utc(self.issued_on),
            acceptance,
            fingerprint,
            issued_to_name: self.issued_to_name,
            issued_to_email: self.issued_to_email,
            issued_to_subject_uri: self.issued_to_subject_uri,
            issued_to: self.issued_to,
            issued_using: self.issued_using,
        })
    }
}
