use chrono::{DateTime, Utc};
use serde::Deserialize;
use site_core::model::{Project, PublicId};

/// Wire shape of one entry of the project list.
///
/// The backend sends `""` for projects that were never shared.
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRow {
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        let public_id = row.public_id.and_then(PublicId::parse);
        Project::new(public_id, row.name, row.updated_at).with_public(row.is_public)
    }
}

/// Go encodes an empty slice as `null`; both mean "no rows".
pub(crate) fn rows_or_empty<T>(rows: Option<Vec<T>>) -> Vec<T> {
    rows.unwrap_or_default()
}
