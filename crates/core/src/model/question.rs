use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::subject::Subject;

/// A multiple-choice question as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl Question {
    #[must_use]
    pub fn new(id: QuestionId, question: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            id,
            question: question.into(),
            choices,
        }
    }

    #[must_use]
    pub fn has_choice(&self, index: usize) -> bool {
        index < self.choices.len()
    }
}

/// Filter for a question load. `topic: None` is the "All Topics" wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionQuery {
    pub subject: Subject,
    pub topic: Option<String>,
}

impl QuestionQuery {
    #[must_use]
    pub fn new(subject: Subject, topic: Option<String>) -> Self {
        let topic = topic.filter(|value| !value.trim().is_empty());
        Self { subject, topic }
    }

    /// Value of the `topic` query parameter; empty for the wildcard.
    #[must_use]
    pub fn topic_param(&self) -> &str {
        self.topic.as_deref().unwrap_or("")
    }
}

/// Body of an answer-check request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub selected: usize,
}

/// Verdict returned by the answer-check endpoint.
///
/// Fields beyond `correct` are kept verbatim so the full response can be
/// recorded against the question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub correct: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AnswerResult {
    #[must_use]
    pub fn correct() -> Self {
        Self {
            correct: true,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn incorrect() -> Self {
        Self {
            correct: false,
            extra: serde_json::Map::new(),
        }
    }
}
