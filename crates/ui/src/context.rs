use std::sync::Arc;

use services::{DashboardService, QuizLoopService};
use site_core::model::PublicId;

/// Placeholder link for projects without a public id.
pub const NO_PROJECT_LINK: &str = "#";

pub trait UiApp: Send + Sync {
    fn dashboard(&self) -> Arc<DashboardService>;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;

    /// Absolute URL of the site page for a project.
    fn project_url(&self, public_id: &PublicId) -> String;
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    dashboard: Arc<DashboardService>,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
            dashboard: app.dashboard(),
            quiz_loop: app.quiz_loop(),
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

    /// Link target for a project's "Open" action.
    #[must_use]
    pub fn project_href(&self, public_id: Option<&PublicId>) -> String {
        public_id.map_or_else(|| NO_PROJECT_LINK.to_owned(), |id| self.app.project_url(id))
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
