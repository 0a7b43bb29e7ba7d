use dioxus::prelude::*;
use site_core::model::Subject;

use crate::context::AppContext;
use crate::vm::{
    QuestionPromptVm, QuizAction, QuizIntent, QuizScreen, QuizVm, answer_quiz, start_quiz,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let vm = use_signal(QuizVm::new);

    let dispatch_intent = use_callback(move |intent: QuizIntent| {
        let mut vm = vm;

        let action = match intent {
            QuizIntent::SelectSubject(subject) => {
                vm.write().select_subject(subject);
                None
            }
            QuizIntent::SelectTopic(value) => {
                vm.write().select_topic(&value);
                None
            }
            QuizIntent::Start => Some(QuizAction::Start(vm.read().selection().clone())),
            QuizIntent::TryAgain => {
                vm.write().reset_selection();
                Some(QuizAction::Start(vm.read().selection().clone()))
            }
            QuizIntent::Answer(choice) => Some(QuizAction::Answer(choice)),
            QuizIntent::Retry => vm.read().last_action().cloned(),
        };

        match action {
            Some(QuizAction::Start(query)) => {
                let Some(query) = vm.write().begin_start(query) else {
                    return;
                };
                let quiz_loop = quiz_loop.clone();
                spawn(async move {
                    let result = start_quiz(&quiz_loop, query).await;
                    vm.write().finish_start(result);
                });
            }
            Some(QuizAction::Answer(choice)) => {
                let Some(mut session) = vm.write().begin_answer(choice) else {
                    return;
                };
                let quiz_loop = quiz_loop.clone();
                spawn(async move {
                    let result = answer_quiz(&quiz_loop, &mut session, choice).await;
                    vm.write().finish_answer(session, result);
                });
            }
            None => {}
        }
    });

    // Initial load of Biology / All Topics, outside the first render.
    use_hook(move || {
        spawn(async move { dispatch_intent.call(QuizIntent::Start) });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let vm_guard = vm.read();
    let selection = vm_guard.selection().clone();
    let topic_options = vm_guard.topic_options();
    let busy = vm_guard.is_busy();
    let screen = vm_guard.screen();
    drop(vm_guard);
    let selected_topic = selection.topic_param().to_owned();

    rsx! {
        div { class: "page quiz-page", id: "science-quiz-root",
            h2 { "Science Quiz" }
            div { class: "quiz-controls",
                label { r#for: "subject-select", "Subject" }
                select {
                    id: "subject-select",
                    onchange: move |evt| {
                        if let Ok(subject) = evt.value().parse::<Subject>() {
                            dispatch_intent.call(QuizIntent::SelectSubject(subject));
                        }
                    },
                    for subject in Subject::ALL {
                        option {
                            value: subject.as_str(),
                            selected: subject == selection.subject,
                            "{subject}"
                        }
                    }
                }
                label { r#for: "topic-select", "Topic" }
                select {
                    id: "topic-select",
                    onchange: move |evt| dispatch_intent.call(QuizIntent::SelectTopic(evt.value())),
                    for topic in topic_options {
                        option {
                            value: topic.value,
                            selected: topic.value == selected_topic,
                            "{topic.label}"
                        }
                    }
                }
                button {
                    class: "btn btn-primary",
                    id: "start-quiz-btn",
                    r#type: "button",
                    disabled: busy,
                    onclick: move |_| dispatch_intent.call(QuizIntent::Start),
                    "Start Quiz"
                }
            }
            div { class: "quiz-body",
                match screen {
                    QuizScreen::Idle => rsx! {},
                    QuizScreen::Loading => rsx! {
                        p { class: "quiz-status", "Loading questions..." }
                    },
                    QuizScreen::Empty(status) => rsx! {
                        p { class: "quiz-status", "{status.message()}" }
                    },
                    QuizScreen::Failed(err) => rsx! {
                        p { class: "quiz-status error", "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| dispatch_intent.call(QuizIntent::Retry),
                            "Retry"
                        }
                    },
                    QuizScreen::Presenting { prompt, submitting, error } => rsx! {
                        if let Some(err) = error {
                            p { class: "quiz-status error", "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| dispatch_intent.call(QuizIntent::Retry),
                                "Retry"
                            }
                        }
                        QuestionCard { prompt, submitting, on_intent: dispatch_intent }
                    },
                    QuizScreen::Complete(score) => rsx! {
                        div { class: "quiz-complete",
                            h3 { "Quiz Complete!" }
                            p { "Score: {score}" }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| dispatch_intent.call(QuizIntent::TryAgain),
                                "Try Again"
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn QuestionCard(
    prompt: QuestionPromptVm,
    submitting: bool,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let heading = prompt.heading_html();
    let footer = prompt.footer();
    rsx! {
        div { class: "quiz-question",
            p { class: "quiz-question__text", dangerous_inner_html: "{heading}" }
            div { class: "quiz-choices",
                for (index, choice) in prompt.choices_html.into_iter().enumerate() {
                    button {
                        class: "quiz-choice",
                        r#type: "button",
                        disabled: submitting,
                        onclick: move |_| on_intent.call(QuizIntent::Answer(index)),
                        dangerous_inner_html: "{choice}",
                    }
                }
            }
            p { class: "quiz-footer", "{footer}" }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<QuizVm>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<QuizVm>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<QuizVm> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
