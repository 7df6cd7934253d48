//! JSON codec between ledger bytes and typed records.
//!
//! # Responsibility
//! - Encode/decode `Property` and `Ownership` records.
//! - Encode query views (stake lists, history arrays).
//!
//! # Invariants
//! - Decoding accepts both `percent` and `percentage` stake fields.
//! - Records read back from the store must carry their family's list field
//!   (`owners` / `properties`); caller payloads may omit it.
//! - Encoding always writes `percent`.
//! - Codec functions are pure; they never touch the store.

use crate::model::ownership::Ownership;
use crate::model::property::Property;
use crate::model::RecordKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

/// Record (de)serialization failure.
#[derive(Debug)]
pub enum CodecError {
    Decode {
        kind: RecordKind,
        source: serde_json::Error,
    },
    Encode {
        kind: RecordKind,
        source: serde_json::Error,
    },
}

impl CodecError {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Decode { kind, .. } | Self::Encode { kind, .. } => *kind,
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode { kind, source } => {
                write!(f, "unable to decode {} record: {source}", kind.as_str())
            }
            Self::Encode { kind, source } => {
                write!(f, "unable to encode {} record: {source}", kind.as_str())
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}

pub fn decode_property(bytes: &[u8]) -> CodecResult<Property> {
    decode(RecordKind::Property, bytes)
}

pub fn encode_property(property: &Property) -> CodecResult<Vec<u8>> {
    encode(RecordKind::Property, property)
}

pub fn decode_ownership(bytes: &[u8]) -> CodecResult<Ownership> {
    decode(RecordKind::Ownership, bytes)
}

pub fn encode_ownership(ownership: &Ownership) -> CodecResult<Vec<u8>> {
    encode(RecordKind::Ownership, ownership)
}

/// Decodes a property read from the store.
///
/// Unlike `decode_property`, a missing `owners` field is an error, so an
/// ownership record stored under the same key is never taken for a property.
pub fn decode_stored_property(bytes: &[u8]) -> CodecResult<Property> {
    decode_stored(RecordKind::Property, bytes, "owners")
}

/// Decodes an ownership read from the store; `properties` must be present.
pub fn decode_stored_ownership(bytes: &[u8]) -> CodecResult<Ownership> {
    decode_stored(RecordKind::Ownership, bytes, "properties")
}

/// Encodes any view over one record family as a JSON string.
pub fn encode_view<T: Serialize + ?Sized>(kind: RecordKind, value: &T) -> CodecResult<String> {
    serde_json::to_string(value).map_err(|source| CodecError::Encode { kind, source })
}

fn decode<T: DeserializeOwned>(kind: RecordKind, bytes: &[u8]) -> CodecResult<T> {
    serde_json::from_slice(bytes).map_err(|source| CodecError::Decode { kind, source })
}

fn decode_stored<T: DeserializeOwned>(
    kind: RecordKind,
    bytes: &[u8],
    required_field: &'static str,
) -> CodecResult<T> {
    let value: serde_json::Value = decode(kind, bytes)?;
    if value.get(required_field).is_none() {
        return Err(CodecError::Decode {
            kind,
            source: <serde_json::Error as serde::de::Error>::missing_field(required_field),
        });
    }
    serde_json::from_value(value).map_err(|source| CodecError::Decode { kind, source })
}

fn encode<T: Serialize>(kind: RecordKind, value: &T) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|source| CodecError::Encode { kind, source })
}

#[cfg(test)]
mod tests {
    use super::{
        decode_ownership, decode_property, decode_stored_ownership, decode_stored_property,
        encode_ownership, encode_property, CodecError,
    };
    use crate::model::ownership::Ownership;
    use crate::model::stake::PropertyStake;

    #[test]
    fn decodes_percentage_spelling_and_defaults_missing_fields() {
        let property = decode_property(
            br#"{"salePrice":1000,"owners":[{"id":"ownership_3","percentage":0.45}]}"#,
        )
        .unwrap();

        assert_eq!(property.sale_date, "");
        assert_eq!(property.tx_id, "");
        assert_eq!(property.owners[0].ownership_id(), "ownership_3");
        assert_eq!(property.owners[0].percent(), 0.45);
    }

    #[test]
    fn string_sale_price_is_decode_error() {
        let err = decode_property(
            br#"{"saleDate":"2017-06-28T21:57:16","salePrice":"1000","owners":[]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
        assert!(err.to_string().starts_with("unable to decode property record"));
    }

    #[test]
    fn property_encoding_uses_wire_field_names() {
        let property = decode_property(
            br#"{"txid":"tx-1","id":"property_1","saleDate":"2017-06-28","salePrice":10,
                "owners":[{"id":"ownership_1","percent":1.0,"name":"Ada"}]}"#,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&encode_property(&property).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "txid": "tx-1",
                "id": "property_1",
                "saleDate": "2017-06-28",
                "salePrice": 10.0,
                "owners": [{"id": "ownership_1", "percent": 1.0, "name": "Ada"}]
            })
        );
    }

    #[test]
    fn ownership_omits_empty_sale_date_and_name() {
        let ownership = Ownership {
            properties: vec![
                PropertyStake::new("property_1", 0.45),
                PropertyStake::new("property_2", 0.5).with_sale_date("2017-06-28"),
            ],
        };

        let bytes = encode_ownership(&ownership).unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            r#"{"properties":[{"id":"property_1","percent":0.45},{"id":"property_2","percent":0.5,"saleDate":"2017-06-28"}]}"#
        );
        assert_eq!(decode_ownership(&bytes).unwrap(), ownership);
    }

    #[test]
    fn ownership_without_properties_field_is_empty() {
        assert_eq!(decode_ownership(b"{}").unwrap(), Ownership::default());
    }

    #[test]
    fn stored_records_reject_the_other_family() {
        let ownership = br#"{"properties":[{"id":"property_1","percent":1.0}]}"#;
        let property = br#"{"txid":"tx-1","id":"ownership_1","saleDate":"2017-06-28","salePrice":10,"owners":[]}"#;

        let err = decode_stored_property(ownership).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to decode property record: missing field `owners`"
        );
        let err = decode_stored_ownership(property).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to decode ownership record: missing field `properties`"
        );

        assert_eq!(decode_stored_ownership(ownership).unwrap().properties.len(), 1);
        assert_eq!(decode_stored_property(property).unwrap().property_id, "ownership_1");
    }
}
