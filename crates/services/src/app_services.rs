use std::sync::Arc;

use storage::{HttpConfig, Storage};

use crate::Clock;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::quiz::QuizLoopService;

/// Assembles app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    dashboard: Arc<DashboardService>,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Build services backed by the site's HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be constructed.
    pub fn new_http(config: &HttpConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::http(config)?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let dashboard = Arc::new(DashboardService::new(clock, Arc::clone(&storage.projects)));
        let quiz_loop = Arc::new(QuizLoopService::new(Arc::clone(&storage.questions)));
        Self {
            dashboard,
            quiz_loop,
        }
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}
