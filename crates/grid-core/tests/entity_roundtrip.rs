//! Serde roundtrip and JsonSchema validation tests for entity types.

use chrono::{NaiveDate, Utc};
use schemars::schema_for;
use grid_core::entities::*;
use grid_core::enums::*;
use grid_core::payload::{EntryPayload, FieldValue};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_payload() -> EntryPayload {
    EntryPayload::new()
        .with("col-pupils", FieldValue::Number(412.0))
        .with("col-head", FieldValue::Text("N. Mammadova".into()))
        .with("col-shift", FieldValue::Select("morning".into()))
        .with(
            "col-opened",
            FieldValue::Date(NaiveDate::from_ymd_opt(1998, 9, 15).unwrap()),
        )
}

roundtrip_and_validate!(
    school_roundtrip,
    School,
    School {
        id: "sch-a3f8b2c1".into(),
        sector_id: "sec-00000001".into(),
        region_id: "reg-00000001".into(),
        name: "School No. 7".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    column_roundtrip,
    ColumnDefinition,
    ColumnDefinition {
        id: "col-00000001".into(),
        category_id: "cat-00000001".into(),
        name: "Shift".into(),
        kind: ColumnKind::Select,
        required: true,
        options: vec!["morning".into(), "evening".into()],
        min: None,
        max: None,
        position: 2,
    }
);

roundtrip_and_validate!(
    entry_roundtrip,
    DataEntry,
    DataEntry {
        rejected_by: Some("usr-b".into()),
        rejected_at: Some(Utc::now()),
        rejection_reason: Some("incomplete".into()),
        status: EntryStatus::Rejected,
        submitted_at: Some(Utc::now()),
        version: 3,
        ..DataEntry::draft(
            "ent-00000001",
            "cat-00000001",
            "sch-00000001",
            "usr-a",
            sample_payload(),
            Utc::now(),
        )
    }
);

roundtrip_and_validate!(
    history_roundtrip,
    DataHistory,
    DataHistory {
        id: "his-00000001".into(),
        entry_id: "ent-00000001".into(),
        actor_id: "usr-a".into(),
        previous_status: EntryStatus::Submitted,
        status: EntryStatus::Approved,
        payload: sample_payload(),
        comment: Some("ok".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    user_role_roundtrip,
    UserRole,
    UserRole {
        user_id: "usr-a".into(),
        role: Role::Sectoradmin,
        region_id: None,
        sector_id: Some("sec-00000001".into()),
        school_id: None,
    }
);

roundtrip_and_validate!(
    inbox_item_roundtrip,
    InboxItem,
    InboxItem {
        id: "ntf-00000001".into(),
        notification: Notification::new(
            "usr-a",
            "Entry approved",
            "Your entry was approved",
            Some("/entries/ent-00000001".into()),
        ),
        is_read: false,
        created_at: Utc::now(),
    }
);
