//! # badgefed-state — Credential Acceptance Lifecycle
//!
//! An issued credential record is either pending (it carries a single-use
//! accept token) or accepted (it carries an acceptance time). The two are
//! mutually exclusive and the transition runs one way:
//!
//! ```text
//! Pending{accept_key} ──accept(now)──▶ Accepted{accepted_on}   (terminal)
//! ```
//!
//! The state is a tagged enum, so a record holding both a token and an
//! acceptance time cannot be constructed. Storage keeps the two as nullable
//! columns; [`AcceptanceState::from_columns()`] is the only way back from
//! that representation, and rejects the inconsistent combinations as
//! corrupt.

pub mod acceptance;

pub use acceptance::{AcceptanceState, LifecycleError};
