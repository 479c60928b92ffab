//! Membership reconciliation engine for the pagesmith platform.
//!
//! The platform provisions publishing access through an external
//! directory organization. Over time the two drift: people leave, stop
//! signing in, or end up in the organization without ever being
//! provisioned. This crate reconciles the drift with four independent,
//! idempotent batch operations, invoked by an external job runner:
//!
//! - [`ReconciliationEngine::refresh_activity`] - sync each roster
//!   entry's active flag with live organization membership.
//! - [`ReconciliationEngine::revoke_stale_members`] - remove access for
//!   entries with no recent sign-in or push.
//! - [`ReconciliationEngine::remove_unknown_members`] - remove
//!   organization members that have no roster entry.
//! - [`ReconciliationEngine::prune_team_members`] - remove team members
//!   who are neither on the reference team nor organization admins.
//!
//! Collaborators are injected as trait objects: the directory gateway
//! ([`pagesmith_directory::DirectoryGateway`]), the roster store
//! ([`pagesmith_roster::RosterStore`]) and the audit sink
//! ([`audit::AuditSink`]). Configuration is loaded once and handed to
//! the engine at construction.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;

pub use audit::{AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, RemovalReason};
pub use config::ReconcilerConfig;
pub use engine::{
    ActivityOutcome, AuditSummary, PruneOutcome, ReconciliationEngine, SweepOutcome,
};
pub use error::{ReconcilerError, Result};
