//! Title ledger domain model.
//!
//! # Responsibility
//! - Define the sale (`Property`) and holder (`Ownership`) records.
//! - Keep one shared stake shape behind two typed API views.
//!
//! # Invariants
//! - An accepted `Property` has at least one owner and percentages summing to 1.
//! - An `Ownership` holds at most one stake per property id after any update.

pub mod ids;
pub mod ownership;
pub mod property;
pub mod stake;
pub mod validation;

/// Record family stored in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Property,
    Ownership,
    /// Untyped value read through the raw passthrough paths.
    Raw,
}

impl RecordKind {
    /// Stable lowercase name used in log events and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Ownership => "ownership",
            Self::Raw => "value",
        }
    }
}
