use dioxus::prelude::*;

use crate::{
    app::backend_client,
    domain::{AppState, FormGuard, GuardVerdict, GuardedForm, PickupRequestForm, CATEGORIES},
    infra::backend::{BackendError, Session},
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
};

#[component]
pub fn PickupRequestPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Session>>();

    let mut guard = use_signal(|| FormGuard::attach(Some(GuardedForm::default())));
    let mut details = use_signal(PickupRequestForm::default);

    let form = guard.with(|g| g.form().cloned()).unwrap_or_default();
    let weight_class = format!("field-input {}", form.weight.class_list());
    let fields = details();

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        match guard.with_mut(|g| g.on_submit()) {
            GuardVerdict::Blocked { message } => {
                push_toast(toasts, ToastKind::Error, message);
            }
            GuardVerdict::Proceed => {
                let request = PickupRequestForm {
                    weight: guard.with(|g| g.weight_value().to_string()),
                    ..details()
                };
                spawn(async move {
                    let succeeded = send_pickup_request(state, session, toasts, &request).await;
                    guard.with_mut(|g| g.on_submission_settled(succeeded));
                    if succeeded {
                        details.set(PickupRequestForm::default());
                    }
                });
            }
        }
    };

    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Request a Pickup" }
            form {
                class: "pickup-form",
                onsubmit: on_submit,
                div { class: "field-grid",
                    div {
                        label { class: "field-label", r#for: "area", "Area" }
                        input {
                            id: "area",
                            class: "field-input",
                            name: "area",
                            value: "{fields.area}",
                            oninput: move |evt| details.with_mut(|d| d.area = evt.value()),
                        }
                    }
                    div {
                        label { class: "field-label", r#for: "address", "Address" }
                        input {
                            id: "address",
                            class: "field-input",
                            name: "address",
                            value: "{fields.address}",
                            oninput: move |evt| details.with_mut(|d| d.address = evt.value()),
                        }
                    }
                    div {
                        label { class: "field-label", r#for: "ewaste_type", "Item type" }
                        input {
                            id: "ewaste_type",
                            class: "field-input",
                            name: "ewaste_type[]",
                            list: "category-list",
                            value: "{fields.ewaste_type}",
                            oninput: move |evt| details.with_mut(|d| d.ewaste_type = evt.value()),
                        }
                        datalist {
                            id: "category-list",
                            for category in CATEGORIES.iter() {
                                option { value: *category }
                            }
                        }
                    }
                    div {
                        label { class: "field-label", r#for: "pickup-weight", "Weight (g)" }
                        input {
                            id: "pickup-weight",
                            class: "{weight_class}",
                            name: "weight",
                            r#type: "number",
                            step: "any",
                            value: "{form.weight.value}",
                            oninput: move |evt| {
                                guard.with_mut(|g| g.on_input(evt.value()));
                            },
                        }
                    }
                }
                div { class: "field-grid",
                    div {
                        label { class: "field-label", r#for: "description", "Description" }
                        textarea {
                            id: "description",
                            class: "field-input",
                            name: "description",
                            value: "{fields.description}",
                            oninput: move |evt| details.with_mut(|d| d.description = evt.value()),
                        }
                    }
                }
                div { class: "form-actions",
                    button {
                        class: "btn-submit",
                        r#type: "submit",
                        disabled: form.submit.disabled,
                        "{form.submit.label}"
                    }
                }
            }
        }
    }
}

/// Posts the request and reports the backend's verdict. Only an accepted
/// request counts as success.
async fn send_pickup_request(
    state: Signal<AppState>,
    session: Signal<Session>,
    toasts: Signal<Vec<ToastMessage>>,
    request: &PickupRequestForm,
) -> bool {
    let client = match backend_client(&state, &session) {
        Ok(client) => client,
        Err(message) => {
            push_toast(toasts, ToastKind::Error, message);
            return false;
        }
    };

    match client.request_pickup(request).await {
        Ok(()) => {
            push_toast(
                toasts,
                ToastKind::Success,
                "Pickup request submitted successfully",
            );
            true
        }
        Err(err) => {
            tracing::error!(error = %err, "pickup request failed");
            push_toast(toasts, ToastKind::Error, failure_message(&err));
            false
        }
    }
}

fn failure_message(err: &BackendError) -> String {
    match err {
        BackendError::Unauthenticated => {
            "Sign in with a user account (Settings) before requesting a pickup.".to_string()
        }
        BackendError::Rejected(reason) => format!("Pickup request refused: {reason}"),
        other => format!("Failed to submit pickup request: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::backend::INVALID_WEIGHT_FLASH;

    #[test]
    fn refusals_are_not_reported_as_transport_failures() {
        assert!(failure_message(&BackendError::Unauthenticated).contains("Sign in"));
        assert_eq!(
            failure_message(&BackendError::Rejected(INVALID_WEIGHT_FLASH.to_string())),
            "Pickup request refused: Invalid weight provided"
        );
        assert!(failure_message(&BackendError::UnexpectedRedirect("http://h/x".into()))
            .starts_with("Failed to submit pickup request"));
    }
}
