#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard_service;
pub mod error;
pub mod quiz;

pub use site_core::Clock;

pub use app_services::AppServices;
pub use dashboard_service::{
    DashboardService, DashboardSnapshot, RECENT_ACTIVITY_LIMIT, recent_activity,
};
pub use error::{AppServicesError, DashboardError, QuizError};
pub use quiz::{QuizAnswerResult, QuizLoopService, QuizScore, QuizSession};
