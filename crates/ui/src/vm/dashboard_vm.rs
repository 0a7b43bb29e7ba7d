use chrono::{DateTime, Utc};
use services::DashboardSnapshot;
use site_core::model::PublicId;

use super::time_fmt::time_ago;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DashboardIntent {
    OpenNewProject,
    EditName(String),
    SubmitNewProject,
    CancelNewProject,
    DismissCreateError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectListItemVm {
    pub name: String,
    pub href: String,
    pub is_public: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentActivityVm {
    pub name: String,
    pub when: String,
}

impl RecentActivityVm {
    #[must_use]
    pub fn label(&self) -> String {
        format!("Edited {} {}", self.name, self.when)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardVm {
    pub projects: Vec<ProjectListItemVm>,
    pub recent: Vec<RecentActivityVm>,
}

impl DashboardVm {
    #[must_use]
    pub fn has_projects(&self) -> bool {
        !self.projects.is_empty()
    }

    #[must_use]
    pub fn has_recent(&self) -> bool {
        !self.recent.is_empty()
    }
}

/// Map a loaded snapshot to display rows. `href` resolves the "Open" link.
#[must_use]
pub fn map_dashboard(
    snapshot: &DashboardSnapshot,
    now: DateTime<Utc>,
    href: impl Fn(Option<&PublicId>) -> String,
) -> DashboardVm {
    let projects = snapshot
        .projects
        .iter()
        .map(|project| ProjectListItemVm {
            name: project.name().to_owned(),
            href: href(project.public_id()),
            is_public: project.is_public(),
        })
        .collect();
    let recent = snapshot
        .recent
        .iter()
        .map(|project| RecentActivityVm {
            name: project.name().to_owned(),
            when: time_ago(project.updated_at(), now),
        })
        .collect();

    DashboardVm { projects, recent }
}
