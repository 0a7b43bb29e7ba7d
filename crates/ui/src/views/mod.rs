mod dashboard;
mod quiz;
mod state;

#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};
