mod ids;
mod project;
mod question;
mod subject;

pub use ids::{PublicId, QuestionId};

pub use project::{NewProject, Project, ProjectError, ProjectName};
pub use question::{AnswerResult, AnswerSubmission, Question, QuestionQuery};
pub use subject::{ALL_TOPICS_LABEL, Subject, SubjectError, TopicOption};
