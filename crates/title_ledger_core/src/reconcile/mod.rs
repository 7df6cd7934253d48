//! Ownership reconciliation for property sales.
//!
//! # Responsibility
//! - Classify a sale's owners against the previous sale's owners.
//! - Rewrite every affected ownership record to match the new sale.
//!
//! # Invariants
//! - After a successful update each new owner holds exactly one stake for
//!   the property and each dropped owner holds none.

pub mod owner_diff;
pub mod ownership_updater;
