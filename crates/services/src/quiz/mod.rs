mod progress;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizScore;
pub use session::QuizSession;
pub use workflow::{QuizAnswerResult, QuizLoopService};
