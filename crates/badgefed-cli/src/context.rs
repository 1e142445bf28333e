//! Shared handler state.
//!
//! The issuance engine and record signer work against the synchronous
//! directory interfaces. Handlers that need them load the current issuers,
//! templates and recipients from the database into in-memory directories
//! once per invocation with [`Directories::load()`].

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use badgefed_issuance::{
    InMemoryIssuerDirectory, InMemoryRecipientDirectory, InMemoryTemplateStore,
    RecipientDirectory,
};

use crate::config::CliConfig;
use crate::db;

/// Database pool and resolved configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub pool: SqlitePool,
    pub config: CliConfig,
}

impl CliContext {
    pub fn new(pool: SqlitePool, config: CliConfig) -> Self {
        Self { pool, config }
    }
}

/// Snapshot of the issuer, template and recipient tables.
#[derive(Clone, Default)]
pub struct Directories {
    pub issuers: InMemoryIssuerDirectory,
    pub templates: InMemoryTemplateStore,
    pub recipients: InMemoryRecipientDirectory,
}

impl Directories {
    /// Load every issuer, template and recipient from the database.
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let dirs = Self::default();

        let issuers = db::issuers::load_all(pool)
            .await
            .context("failed to load issuers")?;
        for issuer in issuers {
            dirs.issuers.insert(issuer);
        }

        let templates = db::templates::list(pool)
            .await
            .context("failed to load templates")?;
        for template in templates {
            dirs.templates.hydrate(template);
        }

        let recipients = db::recipients::load_all(pool)
            .await
            .context("failed to load recipients")?;
        for recipient in recipients {
            dirs.recipients.insert(recipient)?;
        }

        tracing::debug!("directories loaded");
        Ok(dirs)
    }
}
