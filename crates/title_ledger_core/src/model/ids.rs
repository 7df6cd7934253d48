//! Display policy for ids returned by ownership queries.
//!
//! Stored property ids carry a key prefix (`property_1`). Ownership queries
//! return them through an `IdDisplayPolicy` so callers can choose between the
//! stored form and a shortened one.

/// Default prefix stripped from property ids in ownership views.
pub const DEFAULT_PROPERTY_ID_PREFIX: &str = "property_";

/// Maps a stored property id to the id shown to callers.
pub trait IdDisplayPolicy {
    fn display_property_id(&self, stored_id: &str) -> String;
}

impl<P: IdDisplayPolicy + ?Sized> IdDisplayPolicy for &P {
    fn display_property_id(&self, stored_id: &str) -> String {
        (**self).display_property_id(stored_id)
    }
}

/// Strips one leading prefix when present; other ids pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripPrefix {
    prefix: String,
}

impl StripPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for StripPrefix {
    fn default() -> Self {
        Self::new(DEFAULT_PROPERTY_ID_PREFIX)
    }
}

impl IdDisplayPolicy for StripPrefix {
    fn display_property_id(&self, stored_id: &str) -> String {
        stored_id
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(stored_id)
            .to_string()
    }
}

/// Returns stored ids unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerbatimIds;

impl IdDisplayPolicy for VerbatimIds {
    fn display_property_id(&self, stored_id: &str) -> String {
        stored_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{IdDisplayPolicy, StripPrefix, VerbatimIds};

    #[test]
    fn strip_prefix_only_touches_leading_prefix() {
        let policy = StripPrefix::default();
        assert_eq!(policy.display_property_id("property_12"), "12");
        assert_eq!(policy.display_property_id("lot_property_12"), "lot_property_12");
        assert_eq!(policy.display_property_id("parcel-7"), "parcel-7");
    }

    #[test]
    fn verbatim_keeps_stored_id() {
        assert_eq!(VerbatimIds.display_property_id("property_12"), "property_12");
    }
}
