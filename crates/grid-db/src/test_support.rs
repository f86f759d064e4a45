#[cfg(test)]
pub(crate) mod helpers {
    use chrono::Utc;

    use grid_core::entities::{Category, ColumnDefinition, DataEntry, School, UserRole};
    use grid_core::enums::{ColumnKind, Role};
    use grid_core::payload::{EntryPayload, FieldValue};
    use grid_core::ports::NewEntry;

    use crate::repos::catalog::ColumnSpec;
    use crate::service::GridService;

    pub async fn test_service() -> GridService {
        GridService::new_local(":memory:").await.unwrap()
    }

    /// One school in one sector/region, a "Staff" category with two columns,
    /// and an admin at every level of the hierarchy.
    pub struct Fixture {
        pub school: School,
        pub category: Category,
        pub teachers: ColumnDefinition,
        pub shift: ColumnDefinition,
    }

    pub async fn fixture(svc: &GridService) -> Fixture {
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
        let shift = svc
            .add_column(
                &category.id,
                &ColumnSpec::new("Shift", ColumnKind::Select)
                    .options(vec!["morning".into(), "evening".into()]),
            )
            .await
            .unwrap();

        let grants = [
            ("usr-super", Role::Superadmin, None, None, None),
            ("usr-region", Role::Regionadmin, Some(&region.id), None, None),
            ("usr-sector", Role::Sectoradmin, None, Some(&sector.id), None),
            ("usr-school", Role::Schooladmin, None, None, Some(&school.id)),
        ];
        for (user_id, role, region_id, sector_id, school_id) in grants {
            svc.grant_role(&UserRole {
                user_id: user_id.into(),
                role,
                region_id: region_id.cloned(),
                sector_id: sector_id.cloned(),
                school_id: school_id.cloned(),
            })
            .await
            .unwrap();
        }

        Fixture {
            school,
            category,
            teachers,
            shift,
        }
    }

    /// Insert a draft for the fixture school, created by `usr-school`.
    pub async fn draft_entry(svc: &GridService, fx: &Fixture) -> DataEntry {
        svc.insert_entry(&NewEntry {
            category_id: fx.category.id.clone(),
            school_id: fx.school.id.clone(),
            created_by: "usr-school".into(),
            payload: EntryPayload::new().with(fx.teachers.id.as_str(), FieldValue::Number(14.0)),
            created_at: Utc::now(),
        })
        .await
        .unwrap()
    }
}
