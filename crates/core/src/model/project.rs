use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::PublicId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProjectError {
    #[error("project name cannot be empty")]
    EmptyName,
}

//
// ─── PROJECT ───────────────────────────────────────────────────────────────────
//

/// A saved document owned by the signed-in user.
///
/// Projects are owned by the backend; the client only reads them and
/// never mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    public_id: Option<PublicId>,
    name: String,
    updated_at: DateTime<Utc>,
    is_public: bool,
}

impl Project {
    #[must_use]
    pub fn new(
        public_id: Option<PublicId>,
        name: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            public_id,
            name: name.into(),
            updated_at,
            is_public: false,
        }
    }

    #[must_use]
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    #[must_use]
    pub fn public_id(&self) -> Option<&PublicId> {
        self.public_id.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }
}

//
// ─── CREATION ──────────────────────────────────────────────────────────────────
//

/// Validated name for a project about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate a user-supplied name. The name is kept exactly as typed,
    /// since the backend matches existing projects by exact name.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::EmptyName` for the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProjectError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ProjectError::EmptyName);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ProjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

/// Payload of a project creation request. New projects always start with
/// an empty document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub name: ProjectName,
    pub data: serde_json::Value,
}

impl NewProject {
    #[must_use]
    pub fn empty(name: ProjectName) -> Self {
        Self {
            name,
            data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}
