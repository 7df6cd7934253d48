//! Owner set classification keyed by ownership id.

use crate::model::stake::OwnerStake;
use std::collections::HashSet;

/// Partition of a sale's owners against the previous owners.
///
/// `unchanged` and `added` carry entries from the new list (new percent and
/// name win); `removed` carries entries from the old list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OwnerSetDiff {
    pub unchanged: Vec<OwnerStake>,
    pub added: Vec<OwnerStake>,
    pub removed: Vec<OwnerStake>,
}

impl OwnerSetDiff {
    /// Number of ownership records the diff touches.
    pub fn affected(&self) -> usize {
        self.unchanged.len() + self.added.len() + self.removed.len()
    }
}

/// Classifies `new_owners` against `old_owners` by id.
///
/// Repeated ids are not rejected; each entry is classified on its own and
/// keeps its position relative to its source list.
pub fn diff_owners(new_owners: &[OwnerStake], old_owners: &[OwnerStake]) -> OwnerSetDiff {
    let old_ids = owner_ids(old_owners);
    let new_ids = owner_ids(new_owners);

    let (unchanged, added): (Vec<_>, Vec<_>) = new_owners
        .iter()
        .cloned()
        .partition(|owner| old_ids.contains(owner.ownership_id()));
    let removed = old_owners
        .iter()
        .filter(|owner| !new_ids.contains(owner.ownership_id()))
        .cloned()
        .collect();

    OwnerSetDiff {
        unchanged,
        added,
        removed,
    }
}

fn owner_ids(owners: &[OwnerStake]) -> HashSet<&str> {
    owners.iter().map(OwnerStake::ownership_id).collect()
}

#[cfg(test)]
mod tests {
    use super::diff_owners;
    use crate::model::stake::OwnerStake;

    fn ids(owners: &[OwnerStake]) -> Vec<&str> {
        owners.iter().map(OwnerStake::ownership_id).collect()
    }

    #[test]
    fn first_sale_adds_every_owner() {
        let new_owners = vec![
            OwnerStake::new("ownership_1", 0.45),
            OwnerStake::new("ownership_2", 0.55),
        ];

        let diff = diff_owners(&new_owners, &[]);
        assert!(diff.unchanged.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(ids(&diff.added), vec!["ownership_1", "ownership_2"]);
    }

    #[test]
    fn resale_partitions_owners_and_keeps_new_values() {
        let old_owners = vec![
            OwnerStake::new("ownership_1", 0.45),
            OwnerStake::new("ownership_2", 0.55),
        ];
        let new_owners = vec![
            OwnerStake::new("ownership_1", 0.35),
            OwnerStake::new("ownership_3", 0.65),
        ];

        let diff = diff_owners(&new_owners, &old_owners);
        assert_eq!(diff.unchanged, vec![OwnerStake::new("ownership_1", 0.35)]);
        assert_eq!(diff.added, vec![OwnerStake::new("ownership_3", 0.65)]);
        assert_eq!(diff.removed, vec![OwnerStake::new("ownership_2", 0.55)]);
        assert_eq!(diff.affected(), 3);
    }

    #[test]
    fn shrinking_owner_set_reports_removed_owners() {
        let old_owners = vec![
            OwnerStake::new("ownership_1", 0.25),
            OwnerStake::new("ownership_2", 0.25),
            OwnerStake::new("ownership_3", 0.5),
        ];
        let new_owners = vec![OwnerStake::new("ownership_3", 1.0)];

        let diff = diff_owners(&new_owners, &old_owners);
        assert_eq!(ids(&diff.unchanged), vec!["ownership_3"]);
        assert!(diff.added.is_empty());
        assert_eq!(ids(&diff.removed), vec!["ownership_1", "ownership_2"]);
    }

    #[test]
    fn repeated_ids_are_classified_individually() {
        let old_owners = vec![OwnerStake::new("ownership_1", 1.0)];
        let new_owners = vec![
            OwnerStake::new("ownership_1", 0.5),
            OwnerStake::new("ownership_1", 0.25),
            OwnerStake::new("ownership_2", 0.25),
        ];

        let diff = diff_owners(&new_owners, &old_owners);
        assert_eq!(ids(&diff.unchanged), vec!["ownership_1", "ownership_1"]);
        assert_eq!(ids(&diff.added), vec!["ownership_2"]);
        assert!(diff.removed.is_empty());
    }
}
