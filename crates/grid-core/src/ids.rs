//! ID prefix constants.
//!
//! Every row ID is `{prefix}-{8 hex chars}`, e.g. `ent-a3f8b2c1`. The hex part
//! is generated by the database (`randomblob(4)`).

pub const PREFIX_REGION: &str = "reg";
pub const PREFIX_SECTOR: &str = "sec";
pub const PREFIX_SCHOOL: &str = "sch";
pub const PREFIX_CATEGORY: &str = "cat";
pub const PREFIX_COLUMN: &str = "col";
pub const PREFIX_ENTRY: &str = "ent";
pub const PREFIX_HISTORY: &str = "his";
pub const PREFIX_NOTIFICATION: &str = "ntf";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_REGION,
    PREFIX_SECTOR,
    PREFIX_SCHOOL,
    PREFIX_CATEGORY,
    PREFIX_COLUMN,
    PREFIX_ENTRY,
    PREFIX_HISTORY,
    PREFIX_NOTIFICATION,
];

/// Check that `id` has the shape `{prefix}-{8 lowercase hex}`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| {
            hex.len() == 8 && hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique_and_three_chars() {
        let mut seen = std::collections::HashSet::new();
        for prefix in ALL_PREFIXES {
            assert_eq!(prefix.len(), 3, "{prefix}");
            assert!(seen.insert(*prefix), "duplicate prefix {prefix}");
        }
    }

    #[test]
    fn has_prefix_checks_shape() {
        assert!(has_prefix("ent-a3f8b2c1", PREFIX_ENTRY));
        assert!(!has_prefix("ent-A3F8B2C1", PREFIX_ENTRY));
        assert!(!has_prefix("his-a3f8b2c1", PREFIX_ENTRY));
        assert!(!has_prefix("ent-a3f8", PREFIX_ENTRY));
        assert!(!has_prefix("enta3f8b2c1", PREFIX_ENTRY));
    }
}
