//! Status enums, roles, column kinds, and transitions for Schoolgrid.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `EntryStatus` provides `allowed_next_states()` to enforce valid transitions
//! at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntryStatus
// ---------------------------------------------------------------------------

/// Status of a data entry through its approval lifecycle.
///
/// ```text
/// draft → submitted → approved
///                   → rejected
/// ```
///
/// `approved` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl EntryStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Submitted],
            Self::Submitted => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_next_states().is_empty()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// A named status change requested by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Submit,
    Approve,
    Reject,
}

impl Transition {
    /// The status an entry must be in for this transition to apply.
    #[must_use]
    pub const fn source(self) -> EntryStatus {
        match self {
            Self::Submit => EntryStatus::Draft,
            Self::Approve | Self::Reject => EntryStatus::Submitted,
        }
    }

    /// The status an entry ends up in after this transition.
    #[must_use]
    pub const fn target(self) -> EntryStatus {
        match self {
            Self::Submit => EntryStatus::Submitted,
            Self::Approve => EntryStatus::Approved,
            Self::Reject => EntryStatus::Rejected,
        }
    }

    /// Whether the actor needs approver capability to perform this transition.
    #[must_use]
    pub const fn requires_approver(self) -> bool {
        matches!(self, Self::Approve | Self::Reject)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ColumnKind
// ---------------------------------------------------------------------------

/// Declared value kind of a category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Select,
}

impl ColumnKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Administrative role of a user, scoped by the hierarchy level it covers.
///
/// ```text
/// superadmin   → every school
/// regionadmin  → schools in one region
/// sectoradmin  → schools in one sector
/// schooladmin  → one school (data entry only, cannot approve)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    Regionadmin,
    Sectoradmin,
    Schooladmin,
}

impl Role {
    /// Whether holders of this role may approve or reject submitted entries.
    #[must_use]
    pub const fn can_approve(self) -> bool {
        !matches!(self, Self::Schooladmin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Regionadmin => "regionadmin",
            Self::Sectoradmin => "sectoradmin",
            Self::Schooladmin => "schooladmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(status_draft, EntryStatus, EntryStatus::Draft, "draft");
    test_serde_roundtrip!(
        status_submitted,
        EntryStatus,
        EntryStatus::Submitted,
        "submitted"
    );
    test_serde_roundtrip!(
        transition_reject,
        Transition,
        Transition::Reject,
        "reject"
    );
    test_serde_roundtrip!(kind_select, ColumnKind, ColumnKind::Select, "select");
    test_serde_roundtrip!(
        role_sectoradmin,
        Role,
        Role::Sectoradmin,
        "sectoradmin"
    );

    #[rstest]
    #[case(EntryStatus::Draft, EntryStatus::Submitted, true)]
    #[case(EntryStatus::Draft, EntryStatus::Approved, false)]
    #[case(EntryStatus::Draft, EntryStatus::Rejected, false)]
    #[case(EntryStatus::Submitted, EntryStatus::Approved, true)]
    #[case(EntryStatus::Submitted, EntryStatus::Rejected, true)]
    #[case(EntryStatus::Submitted, EntryStatus::Draft, false)]
    #[case(EntryStatus::Approved, EntryStatus::Submitted, false)]
    #[case(EntryStatus::Approved, EntryStatus::Draft, false)]
    #[case(EntryStatus::Rejected, EntryStatus::Draft, false)]
    #[case(EntryStatus::Rejected, EntryStatus::Submitted, false)]
    fn entry_status_transitions(
        #[case] from: EntryStatus,
        #[case] to: EntryStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn terminal_states() {
        assert!(EntryStatus::Approved.is_terminal());
        assert!(EntryStatus::Rejected.is_terminal());
        assert!(!EntryStatus::Draft.is_terminal());
        assert!(!EntryStatus::Submitted.is_terminal());
    }

    #[test]
    fn transitions_agree_with_status_table() {
        for t in [Transition::Submit, Transition::Approve, Transition::Reject] {
            assert!(t.source().can_transition_to(t.target()), "{t}");
        }
    }

    #[test]
    fn only_school_admins_cannot_approve() {
        assert!(Role::Superadmin.can_approve());
        assert!(Role::Regionadmin.can_approve());
        assert!(Role::Sectoradmin.can_approve());
        assert!(!Role::Schooladmin.can_approve());
    }
}
