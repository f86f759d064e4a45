use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntryStatus, Transition};
use crate::errors::CoreError;
use crate::payload::EntryPayload;

/// One school's submission of values for one category.
///
/// `version` starts at 1 and increases on every write; together with
/// `status` it forms the compare-and-swap key for conditional updates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DataEntry {
    pub id: String,
    pub category_id: String,
    pub school_id: String,
    pub payload: EntryPayload,
    pub status: EntryStatus,
    pub version: u32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl DataEntry {
    /// A fresh draft entry with version 1.
    #[must_use]
    pub fn draft(
        id: impl Into<String>,
        category_id: impl Into<String>,
        school_id: impl Into<String>,
        created_by: impl Into<String>,
        payload: EntryPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
            school_id: school_id.into(),
            payload,
            status: EntryStatus::Draft,
            version: 1,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    /// Compute the entry as it looks after `transition` by `actor_id` at `now`.
    ///
    /// `note` is the rejection reason for [`Transition::Reject`] and is ignored
    /// otherwise. Only the status precondition is checked here; permissions
    /// and reason validation belong to the caller.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the entry is not in
    /// `transition.source()`.
    pub fn transitioned(
        &self,
        transition: Transition,
        actor_id: &str,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if self.status != transition.source() {
            return Err(CoreError::InvalidTransition {
                entity_type: "data_entry".into(),
                id: self.id.clone(),
                from: self.status.to_string(),
                to: transition.target().to_string(),
            });
        }

        let mut next = Self {
            status: transition.target(),
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        };
        match transition {
            Transition::Submit => next.submitted_at = Some(now),
            Transition::Approve => {
                next.approved_by = Some(actor_id.to_string());
                next.approved_at = Some(now);
            }
            Transition::Reject => {
                next.rejected_by = Some(actor_id.to_string());
                next.rejected_at = Some(now);
                next.rejection_reason = note.map(String::from);
            }
        }
        Ok(next)
    }

    /// Check the status/field invariants:
    /// approver fields are set iff approved, rejection fields iff rejected,
    /// and a submission time exists once the entry left draft.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let approved = self.status == EntryStatus::Approved;
        let rejected = self.status == EntryStatus::Rejected;
        approved == (self.approved_by.is_some() && self.approved_at.is_some())
            && (approved || (self.approved_by.is_none() && self.approved_at.is_none()))
            && rejected == self.rejection_reason.is_some()
            && rejected == self.rejected_by.is_some()
            && (self.status == EntryStatus::Draft) == self.submitted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft() -> DataEntry {
        DataEntry::draft(
            "ent-00000001",
            "cat-00000001",
            "sch-00000001",
            "usr-creator",
            EntryPayload::default(),
            Utc::now(),
        )
    }

    #[test]
    fn draft_is_consistent() {
        let entry = draft();
        assert_eq!(entry.status, EntryStatus::Draft);
        assert_eq!(entry.version, 1);
        assert!(entry.is_consistent());
    }

    #[test]
    fn submit_then_approve_sets_fields() {
        let t1 = Utc::now();
        let submitted = draft()
            .transitioned(Transition::Submit, "usr-creator", None, t1)
            .unwrap();
        assert_eq!(submitted.status, EntryStatus::Submitted);
        assert_eq!(submitted.submitted_at, Some(t1));
        assert_eq!(submitted.version, 2);
        assert!(submitted.is_consistent());

        let t2 = Utc::now();
        let approved = submitted
            .transitioned(Transition::Approve, "usr-a", Some("ignored"), t2)
            .unwrap();
        assert_eq!(approved.status, EntryStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("usr-a"));
        assert_eq!(approved.approved_at, Some(t2));
        assert_eq!(approved.rejection_reason, None);
        assert!(approved.is_consistent());
    }

    #[test]
    fn reject_records_reason() {
        let now = Utc::now();
        let rejected = draft()
            .transitioned(Transition::Submit, "usr-creator", None, now)
            .unwrap()
            .transitioned(Transition::Reject, "usr-b", Some("incomplete"), now)
            .unwrap();
        assert_eq!(rejected.status, EntryStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("incomplete"));
        assert_eq!(rejected.rejected_by.as_deref(), Some("usr-b"));
        assert!(rejected.is_consistent());
    }

    #[test]
    fn approve_from_draft_is_invalid() {
        let result = draft().transitioned(Transition::Approve, "usr-a", None, Utc::now());
        assert!(matches!(
            result,
            Err(CoreError::InvalidTransition { ref from, ref to, .. })
                if from == "draft" && to == "approved"
        ));
    }

    #[test]
    fn inconsistent_entry_detected() {
        let mut entry = draft();
        entry.status = EntryStatus::Approved;
        assert!(!entry.is_consistent());
    }
}
