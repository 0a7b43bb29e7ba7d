use std::sync::Arc;

use site_core::model::{AnswerResult, AnswerSubmission, Question, QuestionQuery};
use storage::repository::QuestionRepository;
use tracing::{debug, info, warn};

use super::progress::QuizScore;
use super::session::QuizSession;
use crate::error::QuizError;

/// Result of answering a single question in a quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAnswerResult {
    pub result: AnswerResult,
    pub is_complete: bool,
    pub score: QuizScore,
}

/// Orchestrates question loading and answer checking against the backend.
#[derive(Clone)]
pub struct QuizLoopService {
    questions: Arc<dyn QuestionRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Load the question set for `query` and start a fresh session.
    ///
    /// Questions without any choices cannot be answered and are skipped.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when the backend has no matching questions.
    /// Returns `QuizError::NoChoices` when every matching question lacks choices.
    /// Returns `QuizError::Storage` if the request fails.
    pub async fn start_quiz(&self, query: QuestionQuery) -> Result<QuizSession, QuizError> {
        let fetched = self.questions.list_questions(&query).await?;
        let count = fetched.len();
        let questions: Vec<Question> = fetched
            .into_iter()
            .filter(|question| !question.choices.is_empty())
            .collect();
        let skipped = count - questions.len();
        if skipped > 0 {
            if questions.is_empty() {
                return Err(QuizError::NoChoices { count });
            }
            warn!(skipped, "skipping questions without choices");
        }
        debug!(
            subject = %query.subject,
            topic = query.topic_param(),
            count = questions.len(),
            "starting quiz"
        );
        QuizSession::new(query, questions)
    }

    /// Submit `choice` for the current question and advance the session.
    ///
    /// The session is left untouched when the request fails, so the same
    /// answer can be retried.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` or `QuizError::InvalidChoice` without
    /// contacting the backend, or `QuizError::Storage` if the check fails.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        choice: usize,
    ) -> Result<QuizAnswerResult, QuizError> {
        let question_id = session.check_choice(choice)?;
        let result = self
            .questions
            .check_answer(AnswerSubmission {
                question_id,
                selected: choice,
            })
            .await?;

        let result = session.record_answer(result)?.clone();
        let score = session.score();
        if session.is_complete() {
            info!(
                subject = %session.query().subject,
                correct = score.correct,
                total = score.total,
                "quiz completed"
            );
        }

        Ok(QuizAnswerResult {
            result,
            is_complete: session.is_complete(),
            score,
        })
    }
}
