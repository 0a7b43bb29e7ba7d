mod dashboard_vm;
mod html;
mod quiz_vm;
mod time_fmt;

pub use dashboard_vm::{
    DashboardIntent, DashboardVm, ProjectListItemVm, RecentActivityVm, map_dashboard,
};
pub use html::sanitize_html;
pub use quiz_vm::{
    QuestionPromptVm, QuizAction, QuizIntent, QuizScreen, QuizVm, answer_quiz, start_quiz,
};
pub use time_fmt::{format_date_in, time_ago, time_ago_in};
