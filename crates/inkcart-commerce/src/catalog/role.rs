//! Variant role classification.
//!
//! Catalog group names are free text ("Colour", "printing side", "Base /
//! Stand"); the UI needs to know which group plays which semantic role.
//! Classification happens once per product render pass, replacing the ad hoc
//! per-component regex matching of older storefronts.

use crate::catalog::VariantGroup;
use crate::ids::VariantGroupId;
use serde::{Deserialize, Serialize};

/// Semantic role of a variant group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantRole {
    Printing,
    Technique,
    Color,
    Size,
    Accessories,
    Base,
    Trim,
    /// Unrecognized group; carries the normalized name.
    Other(String),
}

impl VariantRole {
    /// Classify a group name, case- and punctuation-insensitively.
    pub fn classify(group_name: &str) -> VariantRole {
        let name = normalize_name(group_name);
        // Base before color: "base colour" is the base row, not the color row.
        if name.contains("base") || name.contains("stand") {
            VariantRole::Base
        } else if name.contains("trim") {
            VariantRole::Trim
        } else if name.contains("size") {
            VariantRole::Size
        } else if name.contains("accessor") {
            VariantRole::Accessories
        } else if name.contains("print") {
            VariantRole::Printing
        } else if name.contains("technique") || name.contains("finish") {
            VariantRole::Technique
        } else if name.contains("color") || name.contains("colour") {
            VariantRole::Color
        } else {
            VariantRole::Other(name)
        }
    }
}

/// Lowercase and strip everything but letters and digits.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Role assignments for one product render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleMap {
    assignments: Vec<(VariantRole, VariantGroupId)>,
}

impl RoleMap {
    /// The canonical group for a role, if one was assigned.
    pub fn group_for(&self, role: &VariantRole) -> Option<VariantGroupId> {
        self.assignments
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, id)| *id)
    }

    /// The role assigned to a group, if any.
    pub fn role_of(&self, group: VariantGroupId) -> Option<&VariantRole> {
        self.assignments
            .iter()
            .find(|(_, id)| *id == group)
            .map(|(r, _)| r)
    }

    /// Iterate over `(role, group)` assignments in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&VariantRole, VariantGroupId)> {
        self.assignments.iter().map(|(r, id)| (r, *id))
    }
}

/// Resolve roles for a product's groups.
///
/// At most one group wins each role: even if several groups loosely match
/// "color", exactly one is treated as the color row. Ties go to the group
/// earliest in catalog fetch order; later matches are left unassigned.
pub fn assign_roles(groups: &[VariantGroup]) -> RoleMap {
    let mut map = RoleMap::default();
    for group in groups {
        let role = VariantRole::classify(&group.name);
        if map.group_for(&role).is_none() {
            map.assignments.push((role, group.id));
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InputKind, VariantValue};
    use crate::money::{Currency, Money};
    use crate::ids::VariantValueId;

    fn group(id: i64, name: &str) -> VariantGroup {
        VariantGroup {
            id: VariantGroupId::new(id),
            name: name.to_string(),
            input: InputKind::Button,
            values: vec![VariantValue {
                id: VariantValueId::new(id * 10),
                name: "v".to_string(),
                price_delta: Money::zero(Currency::USD),
                is_default: false,
            }],
        }
    }

    #[test]
    fn test_classify_is_case_and_punctuation_insensitive() {
        assert_eq!(VariantRole::classify("Printing Side"), VariantRole::Printing);
        assert_eq!(VariantRole::classify("COLOUR"), VariantRole::Color);
        assert_eq!(VariantRole::classify("print-side"), VariantRole::Printing);
        assert_eq!(VariantRole::classify("Base / Stand"), VariantRole::Base);
        assert_eq!(VariantRole::classify("Accessories"), VariantRole::Accessories);
    }

    #[test]
    fn test_base_color_is_base_not_color() {
        assert_eq!(VariantRole::classify("Base colour"), VariantRole::Base);
    }

    #[test]
    fn test_unrecognized_names_are_other() {
        assert_eq!(
            VariantRole::classify("Gift wrap?"),
            VariantRole::Other("giftwrap".to_string())
        );
    }

    #[test]
    fn test_at_most_one_group_per_role() {
        let groups = vec![group(1, "Color"), group(2, "Frame colour"), group(3, "Size")];
        let map = assign_roles(&groups);
        assert_eq!(
            map.group_for(&VariantRole::Color),
            Some(VariantGroupId::new(1))
        );
        assert_eq!(map.role_of(VariantGroupId::new(2)), None);
        assert_eq!(
            map.group_for(&VariantRole::Size),
            Some(VariantGroupId::new(3))
        );
    }

    #[test]
    fn test_distinct_other_names_get_distinct_roles() {
        let groups = vec![group(1, "Gift wrap"), group(2, "Engraving")];
        let map = assign_roles(&groups);
        assert!(map.role_of(VariantGroupId::new(1)).is_some());
        assert!(map.role_of(VariantGroupId::new(2)).is_some());
    }
}
