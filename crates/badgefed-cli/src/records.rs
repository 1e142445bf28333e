//! # Records Subcommand
//!
//! Lists issued credential records, optionally filtered by recipient
//! identity or template. Accept tokens are never shown here.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use badgefed_core::TemplateId;
use badgefed_issuance::{CredentialRecord, RecordFilter};

use crate::context::CliContext;
use crate::db;

/// Arguments for the `badgefed records` subcommand.
#[derive(Args, Debug)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

/// Records subcommands.
#[derive(Subcommand, Debug)]
pub enum RecordsCommand {
    /// List records.
    List {
        /// Only records issued to this identity.
        #[arg(long)]
        issued_to: Option<String>,
        /// Only records granted from this template.
        #[arg(long)]
        template: Option<i64>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Execute a records subcommand.
pub async fn run_records(args: &RecordsArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        RecordsCommand::List {
            issued_to,
            template,
            format,
        } => {
            let filter = RecordFilter {
                issued_to: issued_to.clone(),
                template_id: template.map(TemplateId),
            };
            let records = db::records::list(&ctx.pool, &filter).await?;
            match format {
                OutputFormat::Json => {
                    let summaries: Vec<_> = records.iter().map(summary_json).collect();
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                }
                OutputFormat::Text => print_text(&records),
            }
            Ok(0)
        }
    }
}

fn print_text(records: &[CredentialRecord]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }
    println!("Records ({}):", records.len());
    for r in records {
        let id = r.id.map_or(0, |id| id.get());
        println!(
            "  {id}: {} [{}] template {} to {}",
            r.title,
            r.acceptance,
            r.template_id.get(),
            if r.issued_to.is_empty() { "-" } else { &r.issued_to }
        );
        if let Some(fp) = &r.fingerprint {
            println!("      fingerprint {fp}");
        }
    }
}

/// JSON view of a record without its accept token.
fn summary_json(r: &CredentialRecord) -> serde_json::Value {
    serde_json::json!({
        "id": r.id,
        "template_id": r.template_id,
        "title": r.title,
        "issued_by": r.issued_by,
        "issued_on": r.issued_on,
        "issued_to": r.issued_to,
        "state": r.acceptance.to_string(),
        "accepted_on": r.accepted_on(),
        "fingerprint": r.fingerprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use badgefed_core::{RecordId, Timestamp};
    use badgefed_state::AcceptanceState;

    #[test]
    fn json_summary_omits_token() {
        let record = CredentialRecord {
            id: Some(RecordId(3)),
            template_id: TemplateId(1),
            title: "Go Certified".into(),
            description: String::new(),
            image: String::new(),
            image_alt_text: String::new(),
            earning_criteria: String::new(),
            issued_by: "https://badges.example/actors/1".into(),
            issued_on: Timestamp::now(),
            acceptance: AcceptanceState::issue(),
            fingerprint: None,
            issued_to_name: String::new(),
            issued_to_email: String::new(),
            issued_to_subject_uri: String::new(),
            issued_to: "a@b.com".into(),
            issued_using: None,
        };
        let token = record.acceptance.accept_key().unwrap().as_str().to_string();
        let json = summary_json(&record);
        assert_eq!(json["state"], "PENDING");
        assert_eq!(json["id"], 3);
        assert!(!json.to_string().contains(&token));
    }
}
