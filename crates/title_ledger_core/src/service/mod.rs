//! Ledger use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and reconciliation calls into use-case APIs.
//! - Keep the invoke API and CLI decoupled from storage details.

pub mod ledger_query;
pub mod property_transaction;
