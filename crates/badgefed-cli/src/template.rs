//! # Template Subcommand
//!
//! Manages credential templates. `update` replaces every editable field,
//! so omitted optional flags reset the field to empty.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use badgefed_core::{IssuerId, TemplateId, Timestamp};
use badgefed_issuance::TemplateDraft;

use crate::context::CliContext;
use crate::db;

/// Arguments for the `badgefed template` subcommand.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

/// Editable template fields.
#[derive(Args, Debug, Clone)]
pub struct TemplateFields {
    /// Credential title.
    #[arg(long)]
    pub title: String,
    /// Id of the issuing actor.
    #[arg(long)]
    pub issuer: i64,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Image URL.
    #[arg(long, default_value = "")]
    pub image: String,
    #[arg(long, default_value = "")]
    pub image_alt_text: String,
    #[arg(long, default_value = "")]
    pub earning_criteria: String,
    #[arg(long, default_value = "Badge")]
    pub badge_type: String,
}

impl TemplateFields {
    fn into_draft(self) -> TemplateDraft {
        TemplateDraft {
            title: self.title,
            description: self.description,
            image: self.image,
            image_alt_text: self.image_alt_text,
            earning_criteria: self.earning_criteria,
            issued_by: IssuerId(self.issuer),
            badge_type: self.badge_type,
        }
    }
}

/// Template subcommands.
#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Create a template.
    Add(TemplateFields),

    /// Replace the fields of an existing template.
    Update {
        /// Template id.
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: TemplateFields,
    },

    /// List templates.
    List,

    /// Delete a template. Records granted from it are kept.
    Delete {
        /// Template id.
        #[arg(long)]
        id: i64,
    },
}

/// Execute a template subcommand.
pub async fn run_template(args: &TemplateArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        TemplateCommand::Add(fields) => {
            let draft = fields.clone().into_draft();
            ensure_issuer(ctx, draft.issued_by).await?;
            let template = db::templates::insert(&ctx.pool, &draft, Timestamp::now())
                .await
                .context("failed to create template")?;
            tracing::info!(template_id = %template.id, issuer = %template.issued_by, "template created");
            println!("OK: created template {} \"{}\"", template.id.get(), template.title);
            Ok(0)
        }

        TemplateCommand::Update { id, fields } => {
            let draft = fields.clone().into_draft();
            ensure_issuer(ctx, draft.issued_by).await?;
            match db::templates::update(&ctx.pool, TemplateId(*id), &draft, Timestamp::now())
                .await
                .context("failed to update template")?
            {
                Some(template) => {
                    println!("OK: updated template {}", template.id.get());
                    Ok(0)
                }
                None => bail!("template {id} not found"),
            }
        }

        TemplateCommand::List => {
            let templates = db::templates::list(&ctx.pool).await?;
            if templates.is_empty() {
                println!("No templates found.");
                return Ok(0);
            }
            println!("Templates ({}):", templates.len());
            for t in templates {
                println!(
                    "  {}: {} [{}] issuer {} (updated {})",
                    t.id.get(),
                    t.title,
                    t.badge_type,
                    t.issued_by.get(),
                    t.updated_at
                );
            }
            Ok(0)
        }

        TemplateCommand::Delete { id } => {
            if !db::templates::delete(&ctx.pool, TemplateId(*id)).await? {
                bail!("template {id} not found");
            }
            tracing::info!(template_id = id, "template deleted");
            println!("OK: deleted template {id}");
            Ok(0)
        }
    }
}

async fn ensure_issuer(ctx: &CliContext, id: IssuerId) -> Result<()> {
    if db::issuers::get_by_id(&ctx.pool, id).await?.is_none() {
        bail!("issuer {} not found", id.get());
    }
    Ok(())
}
