//! Shared error types for the services crate.

use thiserror::Error;

use site_core::model::ProjectError;
use storage::HttpInitError;
use storage::repository::StorageError;

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz subsystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions found for this subject/topic")]
    Empty,
    #[error("none of the {count} matching questions has answer choices")]
    NoChoices { count: usize },
    #[error("quiz already completed")]
    Completed,
    #[error("choice {index} is out of range for a question with {len} choices")]
    InvalidChoice { index: usize, len: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Http(#[from] HttpInitError),
}
