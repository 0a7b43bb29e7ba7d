use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use site_core::model::{
    AnswerResult, AnswerSubmission, NewProject, Project, Question, QuestionQuery,
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::repository::{ProjectRepository, QuestionRepository, Storage, StorageError};

mod mapping;

use mapping::{ProjectRow, rows_or_empty};

const PROJECT_LIST_PATH: &str = "api/project/list";
const PROJECT_SAVE_PATH: &str = "api/project/save";
const QUESTIONS_PATH: &str = "api/science/questions";
const ANSWER_PATH: &str = "api/science/answer";

/// Name of the session cookie the backend authenticates with.
pub const AUTH_COOKIE: &str = "auth_token";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("base url must use http or https: {0}")]
    UnsupportedScheme(String),

    #[error("auth token contains characters not allowed in a cookie")]
    InvalidAuthToken,

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the site backend.
///
/// Debug output masks the auth token.
#[derive(Clone)]
pub struct HttpConfig {
    base_url: Url,
    auth_token: Option<String>,
    timeout: Duration,
}

impl HttpConfig {
    /// Parse the backend base URL. A trailing slash is added so API paths
    /// resolve beneath any path prefix.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError::InvalidUrl` or `HttpInitError::UnsupportedScheme`.
    pub fn new(base_url: &str) -> Result<Self, HttpInitError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpInitError::UnsupportedScheme(base_url.scheme().to_owned()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|value| !value.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of a site page, e.g. `project/<id>`.
    #[must_use]
    pub fn page_url(&self, path: &str) -> String {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_or_else(|_| format!("{}{path}", self.base_url), String::from)
    }
}

impl fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url.as_str())
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Backend adapter speaking the site's JSON API over HTTP.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    /// Build a client for the given backend.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the auth cookie is malformed or the client
    /// cannot be built.
    pub fn connect(config: &HttpConfig) -> Result<Self, HttpInitError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.auth_token.as_deref() {
            let cookie = HeaderValue::from_str(&format!("{AUTH_COOKIE}={token}"))
                .map_err(|_| HttpInitError::InvalidAuthToken)?;
            headers.insert(COOKIE, cookie);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(path)
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn transport(err: reqwest::Error) -> StorageError {
    if err.is_decode() {
        StorageError::Serialization(err.to_string())
    } else {
        StorageError::Connection(err.to_string())
    }
}

fn ensure_success(response: &Response) -> Result<(), StorageError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(StorageError::Rejected {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl ProjectRepository for HttpRepository {
    #[instrument(skip(self))]
    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let response = self
            .client
            .get(self.endpoint(PROJECT_LIST_PATH)?)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "project list request failed; showing no projects");
            return Ok(Vec::new());
        }

        let rows: Option<Vec<ProjectRow>> = response.json().await.map_err(transport)?;
        let projects: Vec<Project> = rows_or_empty(rows).into_iter().map(Project::from).collect();
        debug!(count = projects.len(), "loaded projects");
        Ok(projects)
    }

    #[instrument(skip(self, project), fields(name = project.name.as_str()))]
    async fn save_project(&self, project: &NewProject) -> Result<(), StorageError> {
        let response = self
            .client
            .post(self.endpoint(PROJECT_SAVE_PATH)?)
            .json(project)
            .send()
            .await
            .map_err(transport)?;

        if let Err(err) = ensure_success(&response) {
            warn!(%err, "project save rejected");
            return Err(err);
        }
        info!("project saved");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for HttpRepository {
    #[instrument(skip(self), fields(subject = %query.subject, topic = query.topic_param()))]
    async fn list_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, StorageError> {
        let response = self
            .client
            .get(self.endpoint(QUESTIONS_PATH)?)
            .query(&[
                ("subject", query.subject.as_str()),
                ("topic", query.topic_param()),
            ])
            .send()
            .await
            .map_err(transport)?;
        ensure_success(&response)?;

        let questions: Option<Vec<Question>> = response.json().await.map_err(transport)?;
        let questions = rows_or_empty(questions);
        debug!(count = questions.len(), "loaded questions");
        Ok(questions)
    }

    #[instrument(skip(self), fields(question_id = %submission.question_id))]
    async fn check_answer(
        &self,
        submission: AnswerSubmission,
    ) -> Result<AnswerResult, StorageError> {
        let response = self
            .client
            .post(self.endpoint(ANSWER_PATH)?)
            .json(&submission)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(&response)?;

        let result: AnswerResult = response.json().await.map_err(transport)?;
        debug!(correct = result.correct, "answer checked");
        Ok(result)
    }
}

impl Storage {
    /// Build a `Storage` that talks to the site backend over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the client cannot be constructed.
    pub fn http(config: &HttpConfig) -> Result<Self, HttpInitError> {
        let repo = HttpRepository::connect(config)?;
        let projects: Arc<dyn ProjectRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo);
        Ok(Self {
            projects,
            questions,
        })
    }
}
