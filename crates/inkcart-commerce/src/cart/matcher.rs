//! Configuration matching for cart merges.

use crate::ids::VariantValueId;
use crate::selection::SelectedEntry;
use std::collections::BTreeSet;

/// Extract the catalog-backed IDs of a configuration.
///
/// Only the `CatalogVariant` arm participates; custom dimensions are carried
/// in their own entry variant and can never reach the matched ID set.
pub fn catalog_ids(entries: &[SelectedEntry]) -> BTreeSet<VariantValueId> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            SelectedEntry::CatalogVariant { id, .. } => Some(*id),
            SelectedEntry::CustomDimension { .. } => None,
        })
        .collect()
}

/// Two variant-ID sets represent the same configuration iff they have equal
/// cardinality and identical membership.
///
/// Custom dimensions are deliberately excluded from the comparison, so on a
/// product with continuous sizing but no catalog size group, two adds that
/// differ only in their custom size merge into one cart line. Whether that
/// is the intended product behavior is an open question; it is preserved
/// here rather than silently changed.
pub fn same_configuration(a: &BTreeSet<VariantValueId>, b: &BTreeSet<VariantValueId>) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn ids(raw: &[i64]) -> BTreeSet<VariantValueId> {
        raw.iter().map(|&i| VariantValueId::new(i)).collect()
    }

    #[test]
    fn test_identical_sets_match() {
        assert!(same_configuration(&ids(&[1, 2, 3]), &ids(&[3, 2, 1])));
        assert!(same_configuration(&ids(&[]), &ids(&[])));
    }

    #[test]
    fn test_differing_membership_does_not_match() {
        assert!(!same_configuration(&ids(&[1, 2]), &ids(&[1, 3])));
    }

    #[test]
    fn test_subset_does_not_match() {
        assert!(!same_configuration(&ids(&[1, 2]), &ids(&[1, 2, 3])));
    }

    #[test]
    fn test_custom_dimensions_excluded_from_identity() {
        let a = vec![
            SelectedEntry::CatalogVariant {
                id: VariantValueId::new(1),
                price_delta: Money::zero(Currency::USD),
            },
            SelectedEntry::CustomDimension {
                length: 0.9,
                width: 0.6,
            },
        ];
        let b = vec![
            SelectedEntry::CatalogVariant {
                id: VariantValueId::new(1),
                price_delta: Money::zero(Currency::USD),
            },
            SelectedEntry::CustomDimension {
                length: 2.0,
                width: 1.0,
            },
        ];
        // Different custom sizes, same catalog identity: these merge.
        assert!(same_configuration(&catalog_ids(&a), &catalog_ids(&b)));
    }
}
