//! Recipient persistence operations on the `recipients` table.

use sqlx::SqlitePool;

use badgefed_core::{Recipient, RecipientId, RecipientKind};

/// Insert a recipient and return its assigned id. The recipient's own `id`
/// is ignored.
pub async fn insert(pool: &SqlitePool, recipient: &Recipient) -> Result<RecipientId, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO recipients (name, email, fediverse_handle, profile_uri)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&recipient.name)
    .bind(&recipient.email)
    .bind(&recipient.fediverse_handle)
    .bind(&recipient.profile_uri)
    .execute(pool)
    .await?;

    Ok(RecipientId(result.last_insert_rowid()))
}

/// The first recipient whose `kind` column equals `identifier`.
///
/// Name-only lookups always return `None`.
pub async fn find(
    pool: &SqlitePool,
    kind: RecipientKind,
    identifier: &str,
) -> Result<Option<Recipient>, sqlx::Error> {
    let sql = match kind {
        RecipientKind::Email => {
            "SELECT id, name, email, fediverse_handle, profile_uri FROM recipients
             WHERE email = ?1 ORDER BY id LIMIT 1"
        }
        RecipientKind::FediverseHandle => {
            "SELECT id, name, email, fediverse_handle, profile_uri FROM recipients
             WHERE fediverse_handle = ?1 ORDER BY id LIMIT 1"
        }
        RecipientKind::ProfileUri => {
            "SELECT id, name, email, fediverse_handle, profile_uri FROM recipients
             WHERE profile_uri = ?1 ORDER BY id LIMIT 1"
        }
        RecipientKind::NameOnly => return Ok(None),
    };

    let row = sqlx::query_as::<_, RecipientRow>(sql)
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(RecipientRow::into_recipient))
}

/// All recipients, ordered by id.
pub async fn load_all(pool: &SqlitePool) -> Result<Vec<Recipient>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RecipientRow>(
        "SELECT id, name, email, fediverse_handle, profile_uri FROM recipients ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(RecipientRow::into_recipient).collect())
}

#[derive(sqlx::FromRow)]
struct RecipientRow {
    id: i64,
    name: Option<String>,
    email: Option<String>,
    fediverse_handle: Option<String>,
    profile_uri: Option<String>,
}

impl RecipientRow {
    fn into_recipient(self) -> Recipient {
        Recipient {
            id: Some(RecipientId(self.id)),
            name: self.name,
            email: self.email,
            fediverse_handle: self.fediverse_handle,
            profile_uri: self.profile_uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    fn jane() -> Recipient {
        Recipient {
            id: None,
            name: Some("Jane".into()),
            email: Some("jane@intranet".into()),
            fediverse_handle: Some("@jane@example.social".into()),
            profile_uri: Some("https://example.social/@jane".into()),
        }
    }

    #[tokio::test]
    async fn find_by_each_kind() {
        let (pool, _dir) = testing::pool().await;
        let id = insert(&pool, &jane()).await.unwrap();

        for (kind, value) in [
            (RecipientKind::Email, "jane@intranet"),
            (RecipientKind::FediverseHandle, "@jane@example.social"),
            (RecipientKind::ProfileUri, "https://example.social/@jane"),
        ] {
            let found = find(&pool, kind, value).await.unwrap().unwrap();
            assert_eq!(found.id, Some(id));
            assert_eq!(found.name.as_deref(), Some("Jane"));
        }
    }

    #[tokio::test]
    async fn name_lookup_never_matches() {
        let (pool, _dir) = testing::pool().await;
        insert(&pool, &jane()).await.unwrap();
        assert!(find(&pool, RecipientKind::NameOnly, "Jane").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_identifier_is_none() {
        let (pool, _dir) = testing::pool().await;
        insert(&pool, &jane()).await.unwrap();
        assert!(find(&pool, RecipientKind::Email, "bob@intranet")
            .await
            .unwrap()
            .is_none());
        assert_eq!(load_all(&pool).await.unwrap().len(), 1);
    }
}
