use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Duration;
use dioxus::prelude::ReadableExt;
use site_core::model::{
    AnswerResult, AnswerSubmission, NewProject, Project, PublicId, Question, QuestionId,
    QuestionQuery, Subject,
};
use site_core::time::fixed_now;
use storage::repository::{
    InMemoryRepository, ProjectRepository, QuestionRepository, Storage, StorageError,
};

use super::test_harness::{
    TEST_SITE, ViewHarness, ViewKind, setup_view_harness, setup_view_harness_with_storage,
};
use crate::vm::{DashboardIntent, QuizIntent};

impl ViewHarness {
    fn dashboard_intent(&mut self, intent: DashboardIntent) {
        let dispatch = self.dashboard_handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
    }

    fn quiz_intent(&mut self, intent: QuizIntent) {
        let dispatch = self.quiz_handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
    }
}

fn seed_physics(repo: &InMemoryRepository) {
    let questions = [
        (1, "Unit of <b>force</b>?", "Forces", 1),
        (2, "Unit of energy?", "Energy", 0),
    ];
    for (id, text, topic, answer) in questions {
        let question = Question::new(
            QuestionId::new(id),
            text,
            vec!["Joule".into(), "Newton".into()],
        );
        repo.insert_question(question, Subject::Physics, topic, answer)
            .unwrap();
    }
}

fn seed_biology(repo: &InMemoryRepository) {
    let question = Question::new(
        QuestionId::new(10),
        "Where is DNA stored?",
        vec!["Nucleus".into(), "Ribosome".into()],
    );
    repo.insert_question(question, Subject::Biology, "Cell Biology", 0)
        .unwrap();
}

struct FailingProjects;

#[async_trait::async_trait]
impl ProjectRepository for FailingProjects {
    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn save_project(&self, _project: &NewProject) -> Result<(), StorageError> {
        Err(StorageError::Rejected { status: 500 })
    }
}

/// Lists nothing and refuses every save.
struct RejectingSaves;

#[async_trait::async_trait]
impl ProjectRepository for RejectingSaves {
    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        Ok(Vec::new())
    }

    async fn save_project(&self, _project: &NewProject) -> Result<(), StorageError> {
        Err(StorageError::Rejected { status: 500 })
    }
}

/// Never answers, so the view stays in its loading state.
struct StalledProjects;

#[async_trait::async_trait]
impl ProjectRepository for StalledProjects {
    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        std::future::pending().await
    }

    async fn save_project(&self, _project: &NewProject) -> Result<(), StorageError> {
        std::future::pending().await
    }
}

struct FailingQuestions;

#[async_trait::async_trait]
impl QuestionRepository for FailingQuestions {
    async fn list_questions(&self, _query: &QuestionQuery) -> Result<Vec<Question>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn check_answer(
        &self,
        _submission: AnswerSubmission,
    ) -> Result<AnswerResult, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

/// Serves the wrapped repository after failing a set number of calls.
struct FlakyQuestions {
    inner: InMemoryRepository,
    list_failures: AtomicUsize,
    answer_failures: AtomicUsize,
}

impl FlakyQuestions {
    fn new(inner: &InMemoryRepository, list_failures: usize, answer_failures: usize) -> Self {
        Self {
            inner: inner.clone(),
            list_failures: AtomicUsize::new(list_failures),
            answer_failures: AtomicUsize::new(answer_failures),
        }
    }
}

fn take_failure(remaining: &AtomicUsize) -> bool {
    remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait::async_trait]
impl QuestionRepository for FlakyQuestions {
    async fn list_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, StorageError> {
        if take_failure(&self.list_failures) {
            return Err(StorageError::Connection("reset by peer".to_string()));
        }
        self.inner.list_questions(query).await
    }

    async fn check_answer(
        &self,
        submission: AnswerSubmission,
    ) -> Result<AnswerResult, StorageError> {
        if take_failure(&self.answer_failures) {
            return Err(StorageError::Connection("reset by peer".to_string()));
        }
        self.inner.check_answer(submission).await
    }
}

fn storage_with_questions(questions: Arc<dyn QuestionRepository>) -> Storage {
    Storage {
        questions,
        ..Storage::in_memory()
    }
}

fn storage_with_projects(projects: Arc<dyn ProjectRepository>) -> Storage {
    Storage {
        projects,
        ..Storage::in_memory()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_empty_state() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(ViewKind::Dashboard, &repo);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No projects yet."), "missing empty projects in {html}");
    assert!(html.contains("to get started!"), "missing empty projects in {html}");
    assert!(html.contains("No recent activity."), "missing empty activity in {html}");
    assert!(!html.contains("Failed to load"), "unexpected error in {html}");
    assert!(!html.contains("project-list-empty"), "placeholder left in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_shows_placeholders_while_loading() {
    let storage = storage_with_projects(Arc::new(StalledProjects));
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("id=\"project-list-empty\""), "missing placeholder in {html}");
    assert!(html.contains("id=\"recent-activity-empty\""), "missing placeholder in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_lists_projects_and_caps_recent() {
    let repo = InMemoryRepository::new();
    let now = fixed_now();
    for minutes in 1..=7 {
        let name = format!("Project {minutes}");
        repo.insert_project(Project::new(
            PublicId::parse(format!("p{minutes}")),
            name,
            now - Duration::minutes(minutes),
        ))
        .unwrap();
    }
    repo.insert_project(Project::new(None, "Draft", now - Duration::days(30)))
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Dashboard, &repo);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert_eq!(html.matches("class=\"project-item\"").count(), 8, "in {html}");
    assert_eq!(html.matches("class=\"activity-item\"").count(), 5, "in {html}");
    assert!(html.contains("Edited Project 1 1m ago"), "missing newest in {html}");
    assert!(html.contains("Edited Project 5 5m ago"), "missing fifth in {html}");
    assert!(!html.contains("Edited Project 6"), "recent not capped in {html}");
    let link = format!("href=\"{TEST_SITE}/project/p3\"");
    assert!(html.contains(&link), "missing {link} in {html}");
    assert!(html.contains("href=\"#\""), "missing fallback link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_error_state() {
    let storage = storage_with_projects(Arc::new(FailingProjects));
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Failed to load projects."), "missing error in {html}");
    assert!(html.contains("Failed to load activity."), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_create_refetches_list() {
    let repo = InMemoryRepository::new().with_clock(services::Clock::fixed(fixed_now()));
    let mut harness = setup_view_harness(ViewKind::Dashboard, &repo);
    harness.rebuild();
    harness.settle().await;

    harness.dashboard_intent(DashboardIntent::OpenNewProject);
    harness.settle().await;
    assert!(harness.render().contains("id=\"new-project-name\""));

    harness.dashboard_intent(DashboardIntent::EditName("Rocket".to_string()));
    harness.dashboard_intent(DashboardIntent::SubmitNewProject);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Edited Rocket 0s ago"), "missing new project in {html}");
    assert!(!html.contains("new-project-name"), "dialog still open in {html}");
    let saved = repo.list_projects().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name(), "Rocket");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_empty_name_sends_nothing() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(ViewKind::Dashboard, &repo);
    harness.rebuild();
    harness.settle().await;

    harness.dashboard_intent(DashboardIntent::OpenNewProject);
    harness.dashboard_intent(DashboardIntent::EditName(String::new()));
    harness.dashboard_intent(DashboardIntent::SubmitNewProject);
    harness.settle().await;

    let html = harness.render();
    assert!(!html.contains("Failed to create project."), "unexpected error in {html}");
    assert!(repo.list_projects().await.unwrap().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_padded_name_is_sent_as_typed() {
    let repo = InMemoryRepository::new();
    repo.insert_project(Project::new(PublicId::parse("r1"), "Rocket", fixed_now()))
        .unwrap();
    let mut harness = setup_view_harness(ViewKind::Dashboard, &repo);
    harness.rebuild();
    harness.settle().await;

    harness.dashboard_intent(DashboardIntent::OpenNewProject);
    harness.dashboard_intent(DashboardIntent::EditName("  Rocket  ".to_string()));
    harness.dashboard_intent(DashboardIntent::SubmitNewProject);
    harness.settle().await;

    let saved = repo.list_projects().await.unwrap();
    let names: Vec<&str> = saved.iter().map(Project::name).collect();
    assert_eq!(names, ["Rocket", "  Rocket  "]);
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_create_failure_shows_dialog() {
    let storage = storage_with_projects(Arc::new(RejectingSaves));
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage);
    harness.rebuild();
    harness.settle().await;

    harness.dashboard_intent(DashboardIntent::OpenNewProject);
    harness.dashboard_intent(DashboardIntent::EditName("Rocket".to_string()));
    harness.dashboard_intent(DashboardIntent::SubmitNewProject);
    harness.settle().await;
    assert!(harness.render().contains("Failed to create project."));

    harness.dashboard_intent(DashboardIntent::DismissCreateError);
    harness.settle().await;
    assert!(!harness.render().contains("Failed to create project."));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_loads_biology_on_mount() {
    let repo = InMemoryRepository::new();
    seed_biology(&repo);
    seed_physics(&repo);
    let mut harness = setup_view_harness(ViewKind::Quiz, &repo);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("id=\"science-quiz-root\""), "missing root in {html}");
    assert!(html.contains("Q1: Where is DNA stored?"), "missing question in {html}");
    assert!(html.contains("Question 1 of 1"), "missing footer in {html}");
    assert!(html.contains("Nucleus"), "missing choice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_runs_to_completion_and_resets() {
    let repo = InMemoryRepository::new();
    seed_biology(&repo);
    seed_physics(&repo);
    let mut harness = setup_view_harness(ViewKind::Quiz, &repo);
    harness.rebuild();
    harness.settle().await;

    harness.quiz_intent(QuizIntent::SelectSubject(Subject::Physics));
    harness.quiz_intent(QuizIntent::Start);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Q1: Unit of <b>force</b>?"), "missing question in {html}");
    assert!(html.contains("Question 1 of 2"), "missing footer in {html}");

    harness.quiz_intent(QuizIntent::Answer(1));
    harness.settle().await;
    assert!(harness.render().contains("Question 2 of 2"));

    harness.quiz_intent(QuizIntent::Answer(1));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz Complete!"), "missing completion in {html}");
    assert!(html.contains("Score: 1 / 2"), "missing score in {html}");
    assert!(html.contains("Try Again"), "missing try again in {html}");

    // Finished quizzes ignore further answers.
    harness.quiz_intent(QuizIntent::Answer(0));
    harness.settle().await;
    assert_eq!(repo.submissions().unwrap().len(), 2);

    harness.quiz_intent(QuizIntent::TryAgain);
    harness.settle().await;
    let vm = harness.quiz_handles.vm();
    let selection = harness.dom.in_runtime(|| vm.read().selection().clone());
    assert_eq!(selection, QuestionQuery::default());
    assert!(harness.render().contains("Q1: Where is DNA stored?"));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_empty_state() {
    let repo = InMemoryRepository::new();
    seed_physics(&repo);
    let mut harness = setup_view_harness(ViewKind::Quiz, &repo);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("No questions found for this subject/topic."),
        "missing empty message in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_lists_physics_topics() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(ViewKind::Quiz, &repo);
    harness.rebuild();
    harness.settle().await;

    harness.quiz_intent(QuizIntent::SelectTopic("Bioenergetics".to_string()));
    harness.quiz_intent(QuizIntent::SelectSubject(Subject::Physics));
    harness.settle().await;

    let html = harness.render();
    for topic in ["All Topics", "Forces", "Energy", "Waves", "Electricity"] {
        assert!(html.contains(&format!(">{topic}</option>")), "missing {topic} in {html}");
    }
    assert!(!html.contains(">Bioenergetics</option>"), "stale topics in {html}");
    let vm = harness.quiz_handles.vm();
    let topic = harness.dom.in_runtime(|| vm.read().selection().topic.clone());
    assert!(topic.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_error_with_retry() {
    let storage = storage_with_questions(Arc::new(FailingQuestions));
    let mut harness = setup_view_harness_with_storage(ViewKind::Quiz, storage);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_retry_resubmits_failed_answer_once() {
    let repo = InMemoryRepository::new();
    seed_physics(&repo);
    let storage = storage_with_questions(Arc::new(FlakyQuestions::new(&repo, 0, 1)));
    let mut harness = setup_view_harness_with_storage(ViewKind::Quiz, storage);
    harness.rebuild();
    harness.settle().await;

    harness.quiz_intent(QuizIntent::SelectSubject(Subject::Physics));
    harness.quiz_intent(QuizIntent::Start);
    harness.settle().await;

    harness.quiz_intent(QuizIntent::Answer(1));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Question 1 of 2"), "session lost in {html}");
    assert!(repo.submissions().unwrap().is_empty());

    harness.quiz_intent(QuizIntent::Retry);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 2 of 2"), "quiz did not advance in {html}");
    assert!(!html.contains("Something went wrong"), "stale error in {html}");
    assert_eq!(repo.submissions().unwrap().len(), 1);
    let vm = harness.quiz_handles.vm();
    let correct = harness
        .dom
        .in_runtime(|| vm.read().session().map(|session| session.correct_count()));
    assert_eq!(correct, Some(1));

    harness.quiz_intent(QuizIntent::Answer(0));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Score: 2 / 2"), "score counted twice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_retry_reloads_after_failed_list() {
    let repo = InMemoryRepository::new();
    seed_biology(&repo);
    let storage = storage_with_questions(Arc::new(FlakyQuestions::new(&repo, 1, 0)));
    let mut harness = setup_view_harness_with_storage(ViewKind::Quiz, storage);
    harness.rebuild();
    harness.settle().await;
    assert!(harness.render().contains("Something went wrong"));

    harness.quiz_intent(QuizIntent::Retry);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Q1: Where is DNA stored?"), "quiz not loaded in {html}");
    assert!(html.contains("Question 1 of 1"), "missing footer in {html}");
    assert!(!html.contains("Something went wrong"), "stale error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_questions_without_choices() {
    let repo = InMemoryRepository::new();
    let question = Question::new(QuestionId::new(10), "Explain osmosis.", Vec::new());
    repo.insert_question(question, Subject::Biology, "Cell Biology", 0)
        .unwrap();
    let mut harness = setup_view_harness(ViewKind::Quiz, &repo);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("These questions have no answer choices."),
        "missing status in {html}"
    );
    assert!(!html.contains("Explain osmosis."), "unanswerable question shown in {html}");
}
