//! The approval workflow running on the libSQL service.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use grid_config::WorkflowConfig;
use grid_core::entities::UserRole;
use grid_core::enums::{ColumnKind, EntryStatus, Role};
use grid_core::payload::{EntryPayload, FieldValue};
use grid_core::ports::EntryFilter;
use grid_db::repos::catalog::ColumnSpec;
use grid_db::service::GridService;
use grid_workflow::{ApprovalWorkflow, Collaborators, WorkflowError};

struct Setup {
    svc: Arc<GridService>,
    workflow: ApprovalWorkflow,
    category_id: String,
    school_id: String,
    teachers_id: String,
}

async fn setup() -> Setup {
    let svc = Arc::new(GridService::new_local(":memory:").await.unwrap());
    let region = svc.create_region("North").await.unwrap();
    let sector = svc.create_sector(&region.id, "Sector 1").await.unwrap();
    let school = svc.create_school(&sector.id, "School 7").await.unwrap();
    let category = svc.create_category("Staff", None, None).await.unwrap();
    let teachers = svc
        .add_column(
            &category.id,
            &ColumnSpec::new("Teachers", ColumnKind::Number)
                .required()
                .range(Some(0.0), None),
        )
        .await
        .unwrap();

    for (user_id, role, region_id, sector_id) in [
        ("usr-region", Role::Regionadmin, Some(region.id.clone()), None),
        ("usr-sector", Role::Sectoradmin, None, Some(sector.id.clone())),
    ] {
        svc.grant_role(&UserRole {
            user_id: user_id.into(),
            role,
            region_id,
            sector_id,
            school_id: None,
        })
        .await
        .unwrap();
    }

    let workflow =
        ApprovalWorkflow::new(Collaborators::shared(svc.clone()), &WorkflowConfig::default());
    Setup {
        svc,
        workflow,
        category_id: category.id,
        school_id: school.id,
        teachers_id: teachers.id,
    }
}

async fn submitted(s: &Setup) -> String {
    let entry = s
        .workflow
        .create_entry(
            &s.category_id,
            &s.school_id,
            "usr-school",
            EntryPayload::new().with(s.teachers_id.as_str(), FieldValue::Number(14.0)),
        )
        .await
        .unwrap();
    s.workflow.submit(&entry.id, "usr-school").await.unwrap();
    entry.id
}

#[tokio::test]
async fn full_lifecycle_persists_history_and_inbox() {
    let s = setup().await;
    let entry_id = submitted(&s).await;

    let approved = s.workflow.approve(&entry_id, "usr-sector", Some("ok")).await.unwrap();
    assert!(approved.is_consistent());
    assert_eq!(s.svc.get_entry(&entry_id).await.unwrap(), approved);

    let history = s.workflow.history(&entry_id).await.unwrap();
    let statuses: Vec<_> = history.iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![EntryStatus::Approved, EntryStatus::Submitted]);

    // Both approvers heard about the submission; the creator about the approval.
    assert_eq!(s.svc.list_notifications("usr-region", false, 10).await.unwrap().len(), 1);
    assert_eq!(s.svc.list_notifications("usr-sector", false, 10).await.unwrap().len(), 1);
    let inbox = s.svc.list_notifications("usr-school", false, 10).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].notification.title, "Entry approved");
}

#[tokio::test]
async fn school_admin_cannot_approve_own_school() {
    let s = setup().await;
    let entry_id = submitted(&s).await;
    let err = s.workflow.approve(&entry_id, "usr-school", None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthorized { .. }), "{err}");
}

#[tokio::test]
async fn concurrent_approve_and_reject_on_libsql() {
    let s = setup().await;
    let entry_id = submitted(&s).await;

    let (approved, rejected) = tokio::join!(
        s.workflow.approve(&entry_id, "usr-region", None),
        s.workflow.reject(&entry_id, "usr-sector", "incomplete"),
    );
    assert_eq!(
        u8::from(approved.is_ok()) + u8::from(rejected.is_ok()),
        1,
        "approve: {approved:?}, reject: {rejected:?}"
    );
    let loser = approved.err().or(rejected.err());
    assert!(matches!(loser, Some(WorkflowError::InvalidTransition { .. })));

    let stored = s.svc.get_entry(&entry_id).await.unwrap();
    assert!(stored.is_consistent());
    assert_eq!(s.workflow.history(&entry_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn listing_filters_by_status() {
    let s = setup().await;
    submitted(&s).await;

    let submitted_entries = s
        .workflow
        .list_entries(&EntryFilter {
            status: Some(EntryStatus::Submitted),
            ..EntryFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(submitted_entries.len(), 1);

    let drafts = s
        .workflow
        .list_entries(&EntryFilter {
            status: Some(EntryStatus::Draft),
            ..EntryFilter::default()
        })
        .await
        .unwrap();
    assert!(drafts.is_empty());
}
