//! Internal user roster contract.
//!
//! The roster is the authoritative record of who should have access to
//! the platform. This crate carries the entry model, the store contract
//! the membership auditor reads and updates through, and an in-memory
//! implementation for tests. The production backend lives with the host
//! platform.
//!
//! Entry creation and deletion are account-flow concerns and are not
//! part of this contract: the auditor only looks entries up, lists them,
//! and flips their activity flags.

pub mod entry;
pub mod error;
pub mod store;

pub use entry::RosterEntry;
pub use error::{RosterError, RosterResult};
pub use store::{ActivityUpdate, InMemoryRosterStore, RosterStore, SetMembership};
