use async_trait::async_trait;
use site_core::Clock;
use site_core::model::{
    AnswerResult, AnswerSubmission, NewProject, Project, Question, QuestionQuery, Subject,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("request rejected with status {status}")]
    Rejected { status: u16 },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the signed-in user's projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Fetch every project visible to the current session.
    ///
    /// A backend that answers with a non-success status is treated as having
    /// no projects; only transport and decoding failures are errors.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` or `StorageError::Serialization`.
    async fn list_projects(&self) -> Result<Vec<Project>, StorageError>;

    /// Create (or overwrite by name) a project.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Rejected` when the backend refuses the request,
    /// or other storage errors.
    async fn save_project(&self, project: &NewProject) -> Result<(), StorageError>;
}

/// Repository contract for quiz questions and answer checking.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch questions for a subject and optional topic, in backend order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the request fails or the body cannot be decoded.
    async fn list_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, StorageError>;

    /// Ask the backend whether `submission.selected` is the right choice.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for unknown questions, or other storage errors.
    async fn check_answer(&self, submission: AnswerSubmission)
    -> Result<AnswerResult, StorageError>;
}

#[derive(Debug, Clone)]
struct StoredQuestion {
    question: Question,
    subject: Subject,
    topic: String,
    answer: usize,
}

/// Simple in-memory backend for testing and offline prototyping.
///
/// Saving a project with an existing name replaces it, matching the
/// backend's upsert-by-name behavior.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    clock: Clock,
    projects: Arc<Mutex<Vec<Project>>>,
    questions: Arc<Mutex<Vec<StoredQuestion>>>,
    submissions: Arc<Mutex<Vec<AnswerSubmission>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Seed a project as if it already existed on the backend.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_project(&self, project: Project) -> Result<(), StorageError> {
        let mut guard = self
            .projects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(project);
        Ok(())
    }

    /// Seed a question; `answer` is the index of the correct choice.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_question(
        &self,
        question: Question,
        subject: Subject,
        topic: impl Into<String>,
        answer: usize,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(StoredQuestion {
            question,
            subject,
            topic: topic.into(),
            answer,
        });
        Ok(())
    }

    /// Answer submissions received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn submissions(&self) -> Result<Vec<AnswerSubmission>, StorageError> {
        let guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryRepository {
    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let guard = self
            .projects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_project(&self, project: &NewProject) -> Result<(), StorageError> {
        let mut guard = self
            .projects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let name = project.name.as_str();
        let now = self.clock.now();
        match guard.iter_mut().find(|existing| existing.name() == name) {
            Some(existing) => {
                *existing = Project::new(existing.public_id().cloned(), name, now)
                    .with_public(existing.is_public());
            }
            None => guard.push(Project::new(None, name, now)),
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|stored| stored.subject == query.subject)
            .filter(|stored| query.topic.as_deref().is_none_or(|topic| stored.topic == topic))
            .map(|stored| stored.question.clone())
            .collect())
    }

    async fn check_answer(
        &self,
        submission: AnswerSubmission,
    ) -> Result<AnswerResult, StorageError> {
        let answer = {
            let guard = self
                .questions
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard
                .iter()
                .find(|stored| stored.question.id == submission.question_id)
                .map(|stored| stored.answer)
                .ok_or(StorageError::NotFound)?
        };

        self.submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .push(submission);

        let mut result = if answer == submission.selected {
            AnswerResult::correct()
        } else {
            AnswerResult::incorrect()
        };
        result
            .extra
            .insert("answer".to_owned(), serde_json::Value::from(answer));
        Ok(result)
    }
}

/// Bundle of repository handles the services layer is built from.
#[derive(Clone)]
pub struct Storage {
    pub projects: Arc<dyn ProjectRepository>,
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(&InMemoryRepository::new())
    }

    /// Share an existing in-memory repository so tests can seed it directly.
    #[must_use]
    pub fn from_in_memory(repo: &InMemoryRepository) -> Self {
        let projects: Arc<dyn ProjectRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        Self {
            projects,
            questions,
        }
    }
}
