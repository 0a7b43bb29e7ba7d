use std::collections::HashMap;
use std::fmt;

use site_core::model::{AnswerResult, Question, QuestionId, QuestionQuery};

use super::progress::QuizScore;
use crate::error::QuizError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz over one loaded question set.
///
/// Steps through the questions in backend order. `current` never moves
/// backwards and never passes the question count; answered questions are
/// only ever added to the recorded answers.
#[derive(Clone)]
pub struct QuizSession {
    query: QuestionQuery,
    questions: Vec<Question>,
    current: usize,
    correct: usize,
    answers: HashMap<QuestionId, AnswerResult>,
}

impl QuizSession {
    /// Create a session over a freshly loaded question set.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if no questions are provided.
    pub fn new(query: QuestionQuery, questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        Ok(Self {
            query,
            questions,
            current: 0,
            correct: 0,
            answers: HashMap::new(),
        })
    }

    #[must_use]
    pub fn query(&self) -> &QuestionQuery {
        &self.query
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based index of the question being presented.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> QuizScore {
        QuizScore {
            correct: self.correct,
            total: self.questions.len(),
        }
    }

    /// Full answer-check response recorded for a question, if answered.
    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&AnswerResult> {
        self.answers.get(&id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Validate `choice` against the current question and return its id.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` once every question has been answered.
    /// Returns `QuizError::InvalidChoice` if `choice` is out of range.
    pub fn check_choice(&self, choice: usize) -> Result<QuestionId, QuizError> {
        let question = self.current_question().ok_or(QuizError::Completed)?;
        if !question.has_choice(choice) {
            return Err(QuizError::InvalidChoice {
                index: choice,
                len: question.choices.len(),
            });
        }
        Ok(question.id)
    }

    /// Record the verdict for the current question and advance.
    ///
    /// The index advances whether or not the answer was correct.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` if the session is already finished.
    pub(crate) fn record_answer(&mut self, result: AnswerResult) -> Result<&AnswerResult, QuizError> {
        let question_id = self
            .current_question()
            .map(|question| question.id)
            .ok_or(QuizError::Completed)?;

        if result.correct {
            self.correct += 1;
        }
        self.answers.insert(question_id, result);
        self.current += 1;

        self.answers.get(&question_id).ok_or(QuizError::Completed)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("query", &self.query)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("correct", &self.correct)
            .field("answers_len", &self.answers.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
