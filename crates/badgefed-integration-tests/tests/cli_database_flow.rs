//! # CLI Database Flow
//!
//! Drives the CLI handlers against a migrated SQLite database in a
//! temporary directory: register an issuer, create a template, grant,
//! fingerprint and redeem.

use badgefed_cli::accept::{redeem, run_accept, AcceptArgs, EXIT_REDEMPTION_FAILED};
use badgefed_cli::db::{self, issuers::NewIssuer};
use badgefed_cli::grant::{grant, GrantArgs};
use badgefed_cli::sign::sign_record;
use badgefed_cli::{CliConfig, CliContext};
use badgefed_core::{BadgeError, IssuerId, RecordId, Timestamp};
use badgefed_crypto::compute_fingerprint;
use badgefed_issuance::{BadgeNote, TemplateDraft};

const PKCS8: &str = include_str!("../../badgefed-crypto/testdata/issuer_pkcs8.pem");

struct Env {
    ctx: CliContext,
    issuer: IssuerId,
    template: i64,
    _dir: tempfile::TempDir,
}

async fn env() -> Env {
    let dir = tempfile::tempdir().unwrap();
    let config = CliConfig {
        database_url: format!("sqlite://{}", dir.path().join("badgefed.db").display()),
        key_dir: dir.path().join("keys"),
        max_connections: 4,
    };
    let pool = db::init_pool(&config).await.unwrap();

    let issuer = db::issuers::insert(
        &pool,
        &NewIssuer {
            name: "Go Academy".into(),
            uri: "https://academy.example/actors/42".into(),
            domain: "academy.example".into(),
            public_key_pem: None,
        },
    )
    .await
    .unwrap();

    std::fs::create_dir_all(&config.key_dir).unwrap();
    std::fs::write(
        config.key_dir.join(format!("{}.pem", issuer.id.get())),
        PKCS8,
    )
    .unwrap();

    let template = db::templates::insert(
        &pool,
        &TemplateDraft::new("Go Certified", issuer.id),
        Timestamp::now(),
    )
    .await
    .unwrap();

    Env {
        ctx: CliContext::new(pool, config),
        issuer: issuer.id,
        template: template.id.get(),
        _dir: dir,
    }
}

fn grant_to(template: i64, email: &str) -> GrantArgs {
    GrantArgs {
        template,
        email: Some(email.into()),
        ..GrantArgs::default()
    }
}

fn redemption_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<BadgeError>()
        .map_or(false, BadgeError::is_redemption_failure)
}

#[tokio::test]
async fn grant_sign_redeem() {
    let env = env().await;
    let (id, record) = grant(&grant_to(env.template, "a@b.com"), &env.ctx).await.unwrap();
    let token = record.acceptance.accept_key().unwrap().as_str().to_string();
    assert_eq!(token.len(), 36);

    let stored = db::records::get_by_id(&env.ctx.pool, id).await.unwrap().unwrap();
    assert_eq!(stored.issued_to_email, "a@b.com");
    assert_eq!(stored.issued_by, "https://academy.example/actors/42");
    assert!(stored.is_pending());

    let fingerprint = sign_record(id, &env.ctx).await.unwrap();
    let message = BadgeNote::from_record(&stored, BadgeNote::id_for(&stored).unwrap())
        .to_message()
        .unwrap();
    assert_eq!(compute_fingerprint(&message, PKCS8).unwrap(), fingerprint);

    let accepted = redeem(&env.ctx, id, &token, "a@b.com").await.unwrap();
    assert!(accepted.accepted_on().is_some());
    assert!(accepted.acceptance.accept_key().is_none());
    assert_eq!(accepted.fingerprint, Some(fingerprint));

    let again = redeem(&env.ctx, id, &token, "a@b.com").await.unwrap_err();
    assert!(redemption_failure(&again));
}

#[tokio::test]
async fn wrong_token_exits_with_code_two() {
    let env = env().await;
    let (id, _) = grant(&grant_to(env.template, "a@b.com"), &env.ctx).await.unwrap();

    let args = AcceptArgs {
        record: id.get(),
        token: "00000000-0000-0000-0000-000000000000".into(),
        claimant: "a@b.com".into(),
    };
    assert_eq!(run_accept(&args, &env.ctx).await.unwrap(), EXIT_REDEMPTION_FAILED);

    let missing = AcceptArgs {
        record: 9_999,
        ..args
    };
    assert_eq!(run_accept(&missing, &env.ctx).await.unwrap(), EXIT_REDEMPTION_FAILED);

    let stored = db::records::get_by_id(&env.ctx.pool, id).await.unwrap().unwrap();
    assert!(stored.is_pending());
}

#[tokio::test]
async fn concurrent_redeems_accept_once() {
    let env = env().await;
    let (id, record) = grant(&grant_to(env.template, "a@b.com"), &env.ctx).await.unwrap();
    let token = record.acceptance.accept_key().unwrap().as_str().to_string();

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let ctx = env.ctx.clone();
            let token = token.clone();
            tokio::spawn(async move { redeem(&ctx, id, &token, &format!("c{i}")).await })
        })
        .collect();

    let mut ok = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) => assert!(redemption_failure(&e)),
        }
    }
    assert_eq!(ok, 1);
}

#[tokio::test]
async fn sign_without_key_file_fails() {
    let env = env().await;
    let (id, _) = grant(&grant_to(env.template, "a@b.com"), &env.ctx).await.unwrap();
    std::fs::remove_file(
        env.ctx
            .config
            .key_dir
            .join(format!("{}.pem", env.issuer.get())),
    )
    .unwrap();

    let err = sign_record(id, &env.ctx).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BadgeError>(),
        Some(BadgeError::NotFound(_))
    ));
    assert!(sign_record(RecordId(9_999), &env.ctx).await.is_err());
}

#[tokio::test]
async fn grant_from_unknown_template_fails() {
    let env = env().await;
    let err = grant(&grant_to(9_999, "a@b.com"), &env.ctx).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BadgeError>(),
        Some(BadgeError::NotFound(_))
    ));
}
