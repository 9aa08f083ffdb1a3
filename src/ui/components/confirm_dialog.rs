//! Modal yes/no prompt that an async handler can await.

use dioxus::prelude::*;
use tokio::sync::oneshot;

pub struct ConfirmPrompt {
    message: String,
    responder: Option<oneshot::Sender<bool>>,
}

impl ConfirmPrompt {
    fn answer(mut self, accepted: bool) {
        if let Some(responder) = self.responder.take() {
            // The asking task may be gone already; nothing to tell it then.
            let _ = responder.send(accepted);
        }
    }
}

/// Shows `message` in the dialog and resolves once a button is pressed. A
/// prompt replaced or dropped before an answer counts as declined.
pub async fn ask_confirmation(mut prompt: Signal<Option<ConfirmPrompt>>, message: String) -> bool {
    let (responder, answer) = oneshot::channel();
    let next = ConfirmPrompt {
        message,
        responder: Some(responder),
    };
    if let Some(previous) = prompt.with_mut(|current| current.replace(next)) {
        previous.answer(false);
    }
    answer.await.unwrap_or(false)
}

#[component]
pub fn ConfirmDialog(prompt: Signal<Option<ConfirmPrompt>>) -> Element {
    let message = prompt.with(|current| current.as_ref().map(|p| p.message.clone()));
    let Some(message) = message else {
        return rsx! { Fragment {} };
    };

    let mut respond = move |accepted: bool| {
        if let Some(current) = prompt.with_mut(|current| current.take()) {
            current.answer(accepted);
        }
    };

    rsx! {
        div {
            class: "modal-backdrop",
            div {
                class: "modal",
                role: "dialog",
                p { class: "modal-message", "{message}" }
                div { class: "form-actions",
                    button {
                        class: "btn-primary",
                        onclick: move |_| respond(true),
                        "OK"
                    }
                    button {
                        class: "btn-secondary",
                        onclick: move |_| respond(false),
                        "Cancel"
                    }
                }
            }
        }
    }
}
