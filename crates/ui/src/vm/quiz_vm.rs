use services::{QuizAnswerResult, QuizError, QuizLoopService, QuizScore, QuizSession};
use site_core::model::{QuestionQuery, Subject, TopicOption};
use tracing::warn;

use super::html::sanitize_html;
use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    SelectSubject(Subject),
    SelectTopic(String),
    Start,
    Answer(usize),
    Retry,
    TryAgain,
}

/// Request the quiz last issued, kept so a failure can be retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizAction {
    Start(QuestionQuery),
    Answer(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionPromptVm {
    pub number: usize,
    pub total: usize,
    pub question_html: String,
    pub choices_html: Vec<String>,
}

impl QuestionPromptVm {
    #[must_use]
    pub fn heading_html(&self) -> String {
        format!("Q{}: {}", self.number, self.question_html)
    }

    #[must_use]
    pub fn footer(&self) -> String {
        format!("Question {} of {}", self.number, self.total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreen {
    Idle,
    Loading,
    /// Nothing to answer: no matching questions, or none with choices.
    Empty(ViewError),
    Presenting {
        prompt: QuestionPromptVm,
        submitting: bool,
        error: Option<ViewError>,
    },
    Complete(QuizScore),
    Failed(ViewError),
}

/// Selection, loaded session and request status of the quiz page.
///
/// Requests run outside the VM: `begin_*` hands out what the request needs
/// and marks it in flight, `finish_*` applies the outcome. While a request
/// is outstanding every other `begin_*` call is refused.
#[derive(Clone, Debug, Default)]
pub struct QuizVm {
    selection: QuestionQuery,
    session: Option<QuizSession>,
    loading: bool,
    submitting: bool,
    error: Option<ViewError>,
    last_action: Option<QuizAction>,
}

impl QuizVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selection(&self) -> &QuestionQuery {
        &self.selection
    }

    #[must_use]
    pub fn topic_options(&self) -> Vec<TopicOption> {
        self.selection.subject.topic_options()
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.loading || self.submitting
    }

    #[must_use]
    pub fn last_action(&self) -> Option<&QuizAction> {
        self.last_action.as_ref()
    }

    /// Switching subject always falls back to "All Topics".
    pub fn select_subject(&mut self, subject: Subject) {
        self.selection = QuestionQuery::new(subject, None);
    }

    /// Empty `value` selects "All Topics"; topics of other subjects are ignored.
    pub fn select_topic(&mut self, value: &str) {
        let subject = self.selection.subject;
        if value.is_empty() {
            self.selection = QuestionQuery::new(subject, None);
        } else if subject.has_topic(value) {
            self.selection = QuestionQuery::new(subject, Some(value.to_owned()));
        }
    }

    /// Back to Biology / All Topics, ready for a fresh load.
    pub fn reset_selection(&mut self) {
        self.selection = QuestionQuery::default();
    }

    /// Mark a question load for `query` as in flight.
    ///
    /// Drops the current session. Returns `None` if another request is
    /// still running.
    pub fn begin_start(&mut self, query: QuestionQuery) -> Option<QuestionQuery> {
        if self.is_busy() {
            return None;
        }
        self.loading = true;
        self.session = None;
        self.error = None;
        self.last_action = Some(QuizAction::Start(query.clone()));
        Some(query)
    }

    pub fn finish_start(&mut self, result: Result<QuizSession, ViewError>) {
        self.loading = false;
        match result {
            Ok(session) => {
                self.session = Some(session);
                self.error = None;
            }
            Err(err) => self.error = Some(err),
        }
    }

    /// Mark an answer submission as in flight and hand out a working copy
    /// of the session to submit against.
    ///
    /// Returns `None` while busy, without a presented question, or when
    /// `choice` is not one of the current question's choices.
    pub fn begin_answer(&mut self, choice: usize) -> Option<QuizSession> {
        if self.is_busy() {
            return None;
        }
        let session = self.session.as_ref()?;
        session.check_choice(choice).ok()?;
        let working = session.clone();
        self.submitting = true;
        self.error = None;
        self.last_action = Some(QuizAction::Answer(choice));
        Some(working)
    }

    /// Apply an answer outcome. The advanced copy replaces the session only
    /// on success, so a failed submission can be retried as is.
    pub fn finish_answer(
        &mut self,
        session: QuizSession,
        result: Result<QuizAnswerResult, ViewError>,
    ) -> Option<QuizAnswerResult> {
        self.submitting = false;
        match result {
            Ok(answer) => {
                self.session = Some(session);
                self.error = None;
                Some(answer)
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreen {
        if self.loading {
            return QuizScreen::Loading;
        }
        let Some(session) = self.session.as_ref() else {
            return match self.error {
                Some(err @ (ViewError::EmptyQuiz | ViewError::NoChoices)) => QuizScreen::Empty(err),
                Some(err) => QuizScreen::Failed(err),
                None => QuizScreen::Idle,
            };
        };
        match session.current_question() {
            Some(question) => QuizScreen::Presenting {
                prompt: QuestionPromptVm {
                    number: session.current_index() + 1,
                    total: session.total_questions(),
                    question_html: sanitize_html(&question.question),
                    choices_html: question
                        .choices
                        .iter()
                        .map(|choice| sanitize_html(choice))
                        .collect(),
                },
                submitting: self.submitting,
                error: self.error,
            },
            None => QuizScreen::Complete(session.score()),
        }
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyQuiz` when no questions match the query.
/// Returns `ViewError::NoChoices` when none of them can be answered.
/// Returns `ViewError::Unknown` for other failures.
pub async fn start_quiz(
    quiz_loop: &QuizLoopService,
    query: QuestionQuery,
) -> Result<QuizSession, ViewError> {
    match quiz_loop.start_quiz(query).await {
        Ok(session) => Ok(session),
        Err(QuizError::Empty) => Err(ViewError::EmptyQuiz),
        Err(QuizError::NoChoices { count }) => {
            warn!(count, "no question has answer choices");
            Err(ViewError::NoChoices)
        }
        Err(err) => {
            warn!(error = %err, "question load failed");
            Err(ViewError::Unknown)
        }
    }
}

/// # Errors
///
/// Returns `ViewError::Unknown` for service failures.
pub async fn answer_quiz(
    quiz_loop: &QuizLoopService,
    session: &mut QuizSession,
    choice: usize,
) -> Result<QuizAnswerResult, ViewError> {
    quiz_loop
        .answer_current(session, choice)
        .await
        .map_err(|err| {
            warn!(error = %err, choice, "answer submission failed");
            ViewError::Unknown
        })
}
