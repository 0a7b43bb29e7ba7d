use dioxus::prelude::*;
use tracing::warn;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{DashboardIntent, DashboardVm, map_dashboard};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const EMPTY_PROJECTS: &str = "No projects yet. Click \"+ New Project\" to get started!";
const EMPTY_ACTIVITY: &str = "No recent activity.";
const FAILED_PROJECTS: &str = "Failed to load projects.";
const FAILED_ACTIVITY: &str = "Failed to load activity.";
const FAILED_CREATE: &str = "Failed to create project.";

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let dashboard = ctx.dashboard();

    let resource = use_resource(move || {
        let ctx = ctx.clone();
        async move {
            let dashboard = ctx.dashboard();
            let snapshot = dashboard.load().await.map_err(|err| {
                warn!(error = %err, "dashboard load failed");
                ViewError::Unknown
            })?;
            let now = dashboard.clock().now();
            Ok::<_, ViewError>(map_dashboard(&snapshot, now, |id| ctx.project_href(id)))
        }
    });
    let state = view_state_from_resource(resource);

    let dialog_open = use_signal(|| false);
    let draft_name = use_signal(String::new);
    let creating = use_signal(|| false);
    let create_failed = use_signal(|| false);

    let dispatch_intent = use_callback(move |intent: DashboardIntent| {
        let mut dialog_open = dialog_open;
        let mut draft_name = draft_name;
        let mut creating = creating;
        let mut create_failed = create_failed;
        let mut resource = resource;

        match intent {
            DashboardIntent::OpenNewProject => {
                draft_name.set(String::new());
                dialog_open.set(true);
            }
            DashboardIntent::EditName(value) => draft_name.set(value),
            DashboardIntent::CancelNewProject => dialog_open.set(false),
            DashboardIntent::DismissCreateError => create_failed.set(false),
            DashboardIntent::SubmitNewProject => {
                if creating() {
                    return;
                }
                dialog_open.set(false);
                let name = draft_name();
                if name.is_empty() {
                    return;
                }
                let dashboard = dashboard.clone();
                creating.set(true);
                spawn(async move {
                    match dashboard.create_project(&name).await {
                        Ok(_) => {
                            draft_name.set(String::new());
                            resource.restart();
                        }
                        Err(err) => {
                            warn!(error = %err, "project creation failed");
                            create_failed.set(true);
                        }
                    }
                    creating.set(false);
                });
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<DashboardTestHandles>() {
                handles.register(dispatch_intent);
            }
        }
    }

    rsx! {
        div { class: "page dashboard-page",
            header { class: "dashboard-header",
                h2 { "Your Projects" }
                button {
                    class: "btn btn-primary",
                    id: "new-project-btn",
                    r#type: "button",
                    disabled: creating(),
                    onclick: move |_| dispatch_intent.call(DashboardIntent::OpenNewProject),
                    "+ New Project"
                }
            }
            div { class: "dashboard-grid",
                section { class: "dashboard-card",
                    h3 { "Projects" }
                    ProjectList { state: state.clone() }
                }
                section { class: "dashboard-card",
                    h3 { "Recent Activity" }
                    RecentActivityList { state }
                }
            }
            if dialog_open() {
                NewProjectDialog { name: draft_name(), on_intent: dispatch_intent }
            }
            if create_failed() {
                div { class: "modal-overlay",
                    div { class: "modal", role: "alertdialog", aria_modal: "true",
                        p { "{FAILED_CREATE}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| dispatch_intent.call(DashboardIntent::DismissCreateError),
                            "OK"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ProjectList(state: ViewState<DashboardVm>) -> Element {
    rsx! {
        ul { class: "project-list", id: "project-list",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    li { class: "placeholder", id: "project-list-empty", "Loading projects..." }
                },
                ViewState::Error(_) => rsx! {
                    li { class: "error", "{FAILED_PROJECTS}" }
                },
                ViewState::Ready(vm) if !vm.has_projects() => rsx! {
                    li { class: "empty", "{EMPTY_PROJECTS}" }
                },
                ViewState::Ready(vm) => rsx! {
                    for project in vm.projects {
                        li { class: "project-item",
                            span { class: "project-name", "{project.name}" }
                            if project.is_public {
                                span { class: "badge", "Public" }
                            }
                            a { class: "project-open", href: "{project.href}", "Open" }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn RecentActivityList(state: ViewState<DashboardVm>) -> Element {
    rsx! {
        ul { class: "activity-list", id: "recent-activity-list",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    li { class: "placeholder", id: "recent-activity-empty", "Loading activity..." }
                },
                ViewState::Error(_) => rsx! {
                    li { class: "error", "{FAILED_ACTIVITY}" }
                },
                ViewState::Ready(vm) if !vm.has_recent() => rsx! {
                    li { class: "empty", "{EMPTY_ACTIVITY}" }
                },
                ViewState::Ready(vm) => rsx! {
                    for item in vm.recent {
                        li { class: "activity-item", "{item.label()}" }
                    }
                },
            }
        }
    }
}

#[component]
fn NewProjectDialog(name: String, on_intent: EventHandler<DashboardIntent>) -> Element {
    rsx! {
        div { class: "modal-overlay",
            div {
                class: "modal",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "new-project-title",
                h3 { id: "new-project-title", "New Project" }
                label { r#for: "new-project-name", "Project name:" }
                input {
                    id: "new-project-name",
                    r#type: "text",
                    value: "{name}",
                    autofocus: true,
                    oninput: move |evt| on_intent.call(DashboardIntent::EditName(evt.value())),
                    onkeydown: move |evt: KeyboardEvent| match evt.key() {
                        Key::Enter => on_intent.call(DashboardIntent::SubmitNewProject),
                        Key::Escape => on_intent.call(DashboardIntent::CancelNewProject),
                        _ => {}
                    },
                }
                div { class: "modal-actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(DashboardIntent::CancelNewProject),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(DashboardIntent::SubmitNewProject),
                        "Create"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct DashboardTestHandles {
    dispatch: Rc<RefCell<Option<Callback<DashboardIntent>>>>,
}

#[cfg(test)]
impl DashboardTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<DashboardIntent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<DashboardIntent> {
        (*self.dispatch.borrow()).expect("dashboard dispatch registered")
    }
}
