//! Repository layer over the ledger store.
//!
//! # Responsibility
//! - Map ledger keys to typed `Property`/`Ownership` records.
//! - Own the error taxonomy shared by services and the invoke API.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Codec`) in addition
//!   to store transport errors.

pub mod record_repo;
