use std::sync::Arc;

use site_core::model::{NewProject, Project, ProjectName};
use storage::repository::ProjectRepository;
use tracing::info;

use crate::Clock;
use crate::error::DashboardError;

/// Number of entries shown in the recent activity list.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Everything the dashboard renders after one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    /// Projects in backend order.
    pub projects: Vec<Project>,
    /// Most recently edited first, at most `RECENT_ACTIVITY_LIMIT`.
    pub recent: Vec<Project>,
}

impl DashboardSnapshot {
    #[must_use]
    pub fn from_projects(projects: Vec<Project>) -> Self {
        let recent = recent_activity(&projects, RECENT_ACTIVITY_LIMIT);
        Self { projects, recent }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Copy of `projects` sorted by `updated_at` descending, truncated to `limit`.
///
/// Projects edited at the same instant keep their backend order.
#[must_use]
pub fn recent_activity(projects: &[Project], limit: usize) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
    sorted.truncate(limit);
    sorted
}

/// Loads the project overview and creates new projects.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    projects: Arc<dyn ProjectRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(clock: Clock, projects: Arc<dyn ProjectRepository>) -> Self {
        Self { clock, projects }
    }

    /// Clock used to label recent activity.
    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Fetch the project collection and derive the recent activity view.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if the backend cannot be reached
    /// or answers with an unreadable body.
    pub async fn load(&self) -> Result<DashboardSnapshot, DashboardError> {
        let projects = self.projects.list_projects().await?;
        Ok(DashboardSnapshot::from_projects(projects))
    }

    /// Create an empty project with the given name.
    ///
    /// The name is sent exactly as typed. No request is made for an empty name.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Project` for an empty name.
    /// Returns `DashboardError::Storage` if the backend rejects the request.
    pub async fn create_project(&self, name: &str) -> Result<ProjectName, DashboardError> {
        let name = ProjectName::new(name)?;
        self.projects
            .save_project(&NewProject::empty(name.clone()))
            .await?;
        info!(name = name.as_str(), "created project");
        Ok(name)
    }
}
