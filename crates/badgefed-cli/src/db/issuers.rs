//! Issuer persistence operations on the `issuers` table.

use sqlx::SqlitePool;

use badgefed_core::IssuerId;
use badgefed_issuance::Issuer;

/// Fields of an issuer before it is assigned an id.
#[derive(Debug, Clone)]
pub struct NewIssuer {
    pub name: String,
    pub uri: String,
    pub domain: String,
    pub public_key_pem: Option<String>,
}

/// Insert an issuer and return it with its assigned id.
pub async fn insert(pool: &SqlitePool, issuer: &NewIssuer) -> Result<Issuer, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO issuers (name, uri, domain, public_key_pem) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&issuer.name)
    .bind(&issuer.uri)
    .bind(&issuer.domain)
    .bind(&issuer.public_key_pem)
    .execute(pool)
    .await?;

    Ok(Issuer {
        id: IssuerId(result.last_insert_rowid()),
        name: issuer.name.clone(),
        uri: issuer.uri.clone(),
        domain: issuer.domain.clone(),
        public_key_pem: issuer.public_key_pem.clone(),
    })
}

/// Fetch an issuer by id.
pub async fn get_by_id(pool: &SqlitePool, id: IssuerId) -> Result<Option<Issuer>, sqlx::Error> {
    let row = sqlx::query_as::<_, IssuerRow>(
        "SELECT id, name, uri, domain, public_key_pem FROM issuers WHERE id = ?1",
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(IssuerRow::into_issuer))
}

/// Load all issuers, ordered by id.
pub async fn load_all(pool: &SqlitePool) -> Result<Vec<Issuer>, sqlx::Error> {
    let rows = sqlx::query_as::<_, IssuerRow>(
        "SELECT id, name, uri, domain, public_key_pem FROM issuers ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(IssuerRow::into_issuer).collect())
}

#[derive(sqlx::FromRow)]
struct IssuerRow {
    id: i64,
    name: String,
    uri: String,
    domain: String,
    public_key_pem: Option<String>,
}

impl IssuerRow {
    fn into_issuer(self) -> Issuer {
        Issuer {
            id: IssuerId(self.id),
            name: self.name,
            uri: self.uri,
            domain: self.domain,
            public_key_pem: self.public_key_pem,
        }
    }
}
