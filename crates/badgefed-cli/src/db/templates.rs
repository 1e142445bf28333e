//! Credential template persistence operations on the `badges` table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use badgefed_core::{IssuerId, TemplateId, Timestamp};
use badgefed_issuance::{CredentialTemplate, TemplateDraft};

const COLUMNS: &str = "id, title, description, image, image_alt_text, earning_criteria, \
                       issued_by, badge_type, created_at, updated_at";

/// Insert a template created at `now`.
pub async fn insert(
    pool: &SqlitePool,
    draft: &TemplateDraft,
    now: Timestamp,
) -> Result<CredentialTemplate, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO badges (title, description, image, image_alt_text, earning_criteria,
                             issued_by, badge_type, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(&draft.image)
    .bind(&draft.image_alt_text)
    .bind(&draft.earning_criteria)
    .bind(draft.issued_by.get())
    .bind(&draft.badge_type)
    .bind(*now.as_datetime())
    .bind(*now.as_datetime())
    .execute(pool)
    .await?;

    let id = TemplateId(result.last_insert_rowid());
    Ok(CredentialTemplate::from_draft(id, draft.clone(), now))
}

/// Replace the editable fields of template `id`. Returns the updated
/// template, or `None` if no such template exists.
pub async fn update(
    pool: &SqlitePool,
    id: TemplateId,
    draft: &TemplateDraft,
    now: Timestamp,
) -> Result<Option<CredentialTemplate>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE badges SET title = ?1, description = ?2, image = ?3, image_alt_text = ?4,
                earning_criteria = ?5, issued_by = ?6, badge_type = ?7, updated_at = ?8
         WHERE id = ?9",
    )
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(&draft.image)
    .bind(&draft.image_alt_text)
    .bind(&draft.earning_criteria)
    .bind(draft.issued_by.get())
    .bind(&draft.badge_type)
    .bind(*now.as_datetime())
    .bind(id.get())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_by_id(pool, id).await
}

/// Fetch a template by id.
pub async fn get_by_id(
    pool: &SqlitePool,
    id: TemplateId,
) -> Result<Option<CredentialTemplate>, sqlx::Error> {
    let row = sqlx::query_as::<_, TemplateRow>(&format!(
        "SELECT {COLUMNS} FROM badges WHERE id = ?1"
    ))
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(TemplateRow::into_template))
}

/// All templates, ordered by id.
pub async fn list(pool: &SqlitePool) -> Result<Vec<CredentialTemplate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TemplateRow>(&format!("SELECT {COLUMNS} FROM badges ORDER BY id"))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(TemplateRow::into_template).collect())
}

/// Delete template `id`. Returns whether a row was removed. Records granted
/// from the template are kept.
pub async fn delete(pool: &SqlitePool, id: TemplateId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM badges WHERE id = ?1")
        .bind(id.get())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: i64,
    title: String,
    description: String,
    image: String,
    image_alt_text: String,
    earning_criteria: String,
    issued_by: i64,
    badge_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TemplateRow {
    fn into_template(self) -> CredentialTemplate {
        CredentialTemplate {
            id: TemplateId(self.id),
            title: self.title,
            description: self.description,
            image: self.image,
            image_alt_text: self.image_alt_text,
            earning_criteria: self.earning_criteria,
            issued_by: IssuerId(self.issued_by),
            badge_type: self.badge_type,
            created_at: Timestamp::from_utc(self.created_at),
            updated_at: Timestamp::from_utc(self.updated_at),
        }
    }
}
