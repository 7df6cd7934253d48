//! Property transaction validation.
//!
//! # Responsibility
//! - Reject structurally or numerically invalid sale payloads.
//!
//! # Invariants
//! - Validation is pure and reports the first violation only.
//! - Checks run in a fixed order: sale date, price, owners, percentage
//!   total, then owner ids against the property id.
//! - The percentage total must equal `1.0` exactly (no epsilon).

use crate::model::property::Property;
use crate::model::stake::OwnerStake;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for an incoming property transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    MissingSaleDate,
    InvalidSalePrice(f64),
    NoOwners,
    InvalidPercentageTotal { total: f64 },
    /// An owner id equals the property id; both records would share one key.
    OwnerIsProperty(String),
}

impl Display for TransactionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSaleDate => write!(f, "A sale date is required."),
            Self::InvalidSalePrice(_) => write!(f, "The sale price must be greater than 0."),
            Self::NoOwners => write!(f, "At least one owner is required."),
            Self::InvalidPercentageTotal { total } => write!(
                f,
                "Total Percentage can not be greater than or less than 1. Your total percentage ={total}"
            ),
            Self::OwnerIsProperty(id) => {
                write!(f, "Owner id `{id}` can not be the id of the property being sold.")
            }
        }
    }
}

impl Error for TransactionValidationError {}

/// Validates a candidate sale before any ledger access.
pub fn validate_property(property: &Property) -> Result<(), TransactionValidationError> {
    if property.sale_date.trim().is_empty() {
        return Err(TransactionValidationError::MissingSaleDate);
    }
    // Negated comparison so NaN is rejected as well.
    if !(property.sale_price > 0.0) {
        return Err(TransactionValidationError::InvalidSalePrice(
            property.sale_price,
        ));
    }
    if property.owners.is_empty() {
        return Err(TransactionValidationError::NoOwners);
    }

    let total = total_percentage(&property.owners);
    if total != 1.0 {
        return Err(TransactionValidationError::InvalidPercentageTotal { total });
    }

    // Only checked once the property id has been stamped from the call.
    if !property.property_id.is_empty() && property.owner(&property.property_id).is_some() {
        return Err(TransactionValidationError::OwnerIsProperty(
            property.property_id.clone(),
        ));
    }

    Ok(())
}

/// Sums owner percentages left to right, duplicates included.
pub fn total_percentage(owners: &[OwnerStake]) -> f64 {
    owners.iter().fold(0.0, |total, owner| total + owner.percent())
}

#[cfg(test)]
mod tests {
    use super::{total_percentage, validate_property, TransactionValidationError};
    use crate::model::property::Property;
    use crate::model::stake::OwnerStake;

    fn sale(sale_date: &str, price: f64, owners: Vec<OwnerStake>) -> Property {
        Property::new("property_1", sale_date, price, owners)
    }

    fn two_owners() -> Vec<OwnerStake> {
        vec![
            OwnerStake::new("ownership_1", 0.45),
            OwnerStake::new("ownership_2", 0.55),
        ]
    }

    #[test]
    fn accepts_complete_sale() {
        validate_property(&sale("2017-06-28T21:57:16", 1000.0, two_owners())).unwrap();
    }

    #[test]
    fn whitespace_sale_date_is_missing() {
        let err = validate_property(&sale(" \t ", 1000.0, two_owners())).unwrap_err();
        assert_eq!(err, TransactionValidationError::MissingSaleDate);
    }

    #[test]
    fn rejects_zero_negative_and_nan_prices() {
        for price in [0.0, -1.0, f64::NAN] {
            let err = validate_property(&sale("2017-06-28", price, two_owners())).unwrap_err();
            assert!(matches!(err, TransactionValidationError::InvalidSalePrice(_)));
        }
    }

    #[test]
    fn fractional_positive_price_is_accepted() {
        validate_property(&sale("2017-06-28", 0.5, two_owners())).unwrap();
    }

    #[test]
    fn sale_date_is_checked_before_price_and_owners() {
        let err = validate_property(&sale("", -5.0, Vec::new())).unwrap_err();
        assert_eq!(err, TransactionValidationError::MissingSaleDate);

        let err = validate_property(&sale("2017-06-28", -5.0, Vec::new())).unwrap_err();
        assert!(matches!(err, TransactionValidationError::InvalidSalePrice(_)));
    }

    #[test]
    fn rejects_empty_owner_list() {
        let err = validate_property(&sale("2017-06-28", 10.0, Vec::new())).unwrap_err();
        assert_eq!(err, TransactionValidationError::NoOwners);
    }

    #[test]
    fn percentage_total_message_carries_computed_total() {
        let owners = vec![
            OwnerStake::new("ownership_1", 0.45),
            OwnerStake::new("ownership_2", 0.5),
        ];
        let err = validate_property(&sale("2017-06-28", 10.0, owners)).unwrap_err();

        assert_eq!(
            err,
            TransactionValidationError::InvalidPercentageTotal { total: 0.95 }
        );
        assert_eq!(
            err.to_string(),
            "Total Percentage can not be greater than or less than 1. Your total percentage =0.95"
        );
    }

    #[test]
    fn duplicate_owner_ids_count_towards_total() {
        let owners = vec![
            OwnerStake::new("ownership_1", 0.5),
            OwnerStake::new("ownership_1", 0.5),
        ];
        assert_eq!(total_percentage(&owners), 1.0);
        validate_property(&sale("2017-06-28", 10.0, owners)).unwrap();
    }

    #[test]
    fn owner_may_not_share_the_property_id() {
        let owners = vec![
            OwnerStake::new("ownership_1", 0.5),
            OwnerStake::new("property_1", 0.5),
        ];
        let err = validate_property(&sale("2017-06-28", 10.0, owners)).unwrap_err();
        assert_eq!(
            err,
            TransactionValidationError::OwnerIsProperty("property_1".to_string())
        );
        assert_eq!(
            err.to_string(),
            "Owner id `property_1` can not be the id of the property being sold."
        );
    }
}
