use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use grid_config::GridConfig;
use grid_db::service::GridService;
use grid_workflow::{ApprovalWorkflow, Collaborators};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<GridService>,
    pub workflow: ApprovalWorkflow,
    pub config: GridConfig,
}

impl AppContext {
    /// Open the project database and wire the workflow onto it.
    pub async fn init(project_root: &Path, config: GridConfig) -> anyhow::Result<Self> {
        let db_path = database_path(project_root, &config);
        let db_path_str = db_path.to_string_lossy();

        let service = Arc::new(
            GridService::new_local(&db_path_str)
                .await
                .with_context(|| format!("failed to open database at {db_path_str}"))?,
        );
        let workflow =
            ApprovalWorkflow::new(Collaborators::shared(service.clone()), &config.workflow);

        tracing::debug!(project_root = %project_root.display(), db = %db_path_str, "context ready");
        Ok(Self {
            service,
            workflow,
            config,
        })
    }
}

/// Database location: `database.path` taken relative to the project root
/// unless it is absolute or `:memory:`.
#[must_use]
pub fn database_path(project_root: &Path, config: &GridConfig) -> PathBuf {
    let configured = Path::new(&config.database.path);
    if config.database.is_in_memory() || configured.is_absolute() {
        configured.to_path_buf()
    } else {
        project_root.join(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_path_joins_project_root() {
        let config = GridConfig::default();
        assert_eq!(
            database_path(Path::new("/srv/grid"), &config),
            PathBuf::from("/srv/grid/.schoolgrid/schoolgrid.db")
        );
    }

    #[test]
    fn memory_and_absolute_paths_kept() {
        let mut config = GridConfig::default();
        config.database.path = ":memory:".into();
        assert_eq!(
            database_path(Path::new("/srv/grid"), &config),
            PathBuf::from(":memory:")
        );

        config.database.path = "/var/lib/grid.db".into();
        assert_eq!(
            database_path(Path::new("/srv/grid"), &config),
            PathBuf::from("/var/lib/grid.db")
        );
    }

    #[tokio::test]
    async fn init_opens_database_under_project() {
        let temp = tempfile::TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".schoolgrid")).expect(".schoolgrid should create");

        let ctx = AppContext::init(temp.path(), GridConfig::default())
            .await
            .expect("context should init");
        assert!(temp.path().join(".schoolgrid/schoolgrid.db").exists());
        assert!(ctx.workflow.list_entries(&Default::default()).await.unwrap().is_empty());
    }
}
