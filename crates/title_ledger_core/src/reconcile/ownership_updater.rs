//! Applies an owner diff to ownership records.
//!
//! # Responsibility
//! - Detach the property from removed owners.
//! - Attach (or refresh) the property stake for added and unchanged owners.
//!
//! # Invariants
//! - Each owner record is read, modified and written back on its own.
//! - Groups run in order removed, added, unchanged; the first failure stops
//!   the update and earlier writes are left to the store boundary.
//! - Absent ownership records are treated as empty.

use crate::model::ownership::Ownership;
use crate::model::property::Property;
use crate::model::stake::{OwnerStake, PropertyStake};
use crate::reconcile::owner_diff::OwnerSetDiff;
use crate::repo::record_repo::{LedgerRepository, LedgerResult};
use crate::store::LedgerStore;
use log::{debug, error};

/// Role an owner plays in one property transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeGroup {
    Removed,
    Added,
    Unchanged,
}

impl StakeGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Removed => "removed",
            Self::Added => "added",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Count of ownership records rewritten per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipUpdateSummary {
    pub removed: usize,
    pub added: usize,
    pub unchanged: usize,
}

/// Rewrites ownership records for one property transaction.
pub struct OwnershipRecordUpdater<'r, S: LedgerStore> {
    repo: &'r LedgerRepository<S>,
}

impl<'r, S: LedgerStore> OwnershipRecordUpdater<'r, S> {
    pub fn new(repo: &'r LedgerRepository<S>) -> Self {
        Self { repo }
    }

    /// Brings every owner named in `diff` in line with `property`.
    ///
    /// `property.property_id` and `property.sale_date` must already hold the
    /// values being committed.
    pub fn apply(
        &self,
        diff: &OwnerSetDiff,
        property: &Property,
    ) -> LedgerResult<OwnershipUpdateSummary> {
        let mut summary = OwnershipUpdateSummary::default();

        for owner in &diff.removed {
            self.update_owner(StakeGroup::Removed, owner, property)?;
            summary.removed += 1;
        }
        for owner in &diff.added {
            self.update_owner(StakeGroup::Added, owner, property)?;
            summary.added += 1;
        }
        for owner in &diff.unchanged {
            self.update_owner(StakeGroup::Unchanged, owner, property)?;
            summary.unchanged += 1;
        }

        Ok(summary)
    }

    fn update_owner(
        &self,
        group: StakeGroup,
        owner: &OwnerStake,
        property: &Property,
    ) -> LedgerResult<()> {
        let ownership_id = owner.ownership_id();
        match self.rewrite(group, owner, property) {
            Ok(ownership) => {
                debug!(
                    "event=ownership_update module=reconcile status=ok group={} ownership_id={} property_id={} stakes={}",
                    group.as_str(),
                    ownership_id,
                    property.property_id,
                    ownership.properties.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=ownership_update module=reconcile status=error group={} ownership_id={} property_id={} error_code={} error={}",
                    group.as_str(),
                    ownership_id,
                    property.property_id,
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn rewrite(
        &self,
        group: StakeGroup,
        owner: &OwnerStake,
        property: &Property,
    ) -> LedgerResult<Ownership> {
        let ownership_id = owner.ownership_id();
        let mut ownership = self
            .repo
            .load_ownership(ownership_id)?
            .unwrap_or_default();

        match group {
            StakeGroup::Removed => {
                ownership.remove_property(&property.property_id);
            }
            StakeGroup::Added | StakeGroup::Unchanged => {
                ownership.upsert(PropertyStake::for_owner(
                    &property.property_id,
                    &property.sale_date,
                    owner,
                ));
            }
        }

        self.repo.save_ownership(ownership_id, &ownership)?;
        Ok(ownership)
    }
}

#[cfg(test)]
mod tests {
    use super::{OwnershipRecordUpdater, OwnershipUpdateSummary};
    use crate::db::open_db_in_memory;
    use crate::model::ownership::Ownership;
    use crate::model::property::Property;
    use crate::model::stake::{OwnerStake, PropertyStake};
    use crate::reconcile::owner_diff::diff_owners;
    use crate::repo::record_repo::LedgerRepository;
    use crate::store::SqliteLedgerStore;

    #[test]
    fn refreshes_stale_stake_and_keeps_other_properties() {
        let conn = open_db_in_memory().unwrap();
        let repo = LedgerRepository::new(SqliteLedgerStore::new(&conn, "tx-1"));
        repo.save_ownership(
            "ownership_1",
            &Ownership {
                properties: vec![
                    PropertyStake::new("property_1", 0.45).with_sale_date("2016-01-01"),
                    PropertyStake::new("property_2", 1.0).with_sale_date("2015-01-01"),
                ],
            },
        )
        .unwrap();

        let old_owners = vec![OwnerStake::new("ownership_1", 1.0)];
        let property = Property::new(
            "property_1",
            "2017-06-28",
            500.0,
            vec![OwnerStake::new("ownership_1", 1.0).with_name("Ada")],
        );
        let diff = diff_owners(&property.owners, &old_owners);

        let summary = OwnershipRecordUpdater::new(&repo)
            .apply(&diff, &property)
            .unwrap();
        assert_eq!(
            summary,
            OwnershipUpdateSummary {
                removed: 0,
                added: 0,
                unchanged: 1,
            }
        );

        let ownership = repo.load_ownership("ownership_1").unwrap().unwrap();
        assert_eq!(
            ownership.properties,
            vec![
                PropertyStake::new("property_2", 1.0).with_sale_date("2015-01-01"),
                PropertyStake::new("property_1", 1.0)
                    .with_sale_date("2017-06-28")
                    .with_name("Ada"),
            ]
        );
    }

    #[test]
    fn removed_owner_without_record_gets_empty_record() {
        let conn = open_db_in_memory().unwrap();
        let repo = LedgerRepository::new(SqliteLedgerStore::new(&conn, "tx-1"));

        let property = Property::new(
            "property_1",
            "2017-06-28",
            500.0,
            vec![OwnerStake::new("ownership_2", 1.0)],
        );
        let diff = diff_owners(&property.owners, &[OwnerStake::new("ghost", 1.0)]);
        OwnershipRecordUpdater::new(&repo)
            .apply(&diff, &property)
            .unwrap();

        assert_eq!(
            repo.load_ownership("ghost").unwrap(),
            Some(Ownership::default())
        );
    }
}
