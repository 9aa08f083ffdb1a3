use dioxus::prelude::*;

use crate::{
    app::{backend_client, persist_user_state},
    domain::{Account, AppState},
    infra::backend::{BackendClient, BackendError, Session, DEFAULT_BASE_URL},
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
    util::config::SERVER_URL_ENV,
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Session>>();

    let (initial_url, pinned) = state.with(|st| (st.server_url.clone(), st.server_url_pinned));
    let mut server_url_input = use_signal(|| initial_url);

    let change_server = move |url: String| {
        let mut state = state;
        let mut session = session;
        if state.with(|st| st.server_url != url) {
            session.set(Session::default());
        }
        state.with_mut(|st| st.switch_server(url));
        persist_user_state(&state);
    };

    let on_apply = move |_| {
        let candidate = server_url_input().trim().to_string();
        match BackendClient::with_base_url(&candidate) {
            Ok(client) => {
                let normalized = client.base_url().to_string();
                server_url_input.set(normalized.clone());
                change_server(normalized);
                push_toast(toasts, ToastKind::Success, "Backend address updated.");
            }
            Err(err) => {
                push_toast(
                    toasts,
                    ToastKind::Error,
                    format!("Invalid backend address: {err}"),
                );
            }
        }
    };

    let on_reset = move |_| {
        server_url_input.set(DEFAULT_BASE_URL.to_string());
        change_server(DEFAULT_BASE_URL.to_string());
        push_toast(toasts, ToastKind::Info, "Restored the default backend address.");
    };

    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Backend" }
            label { class: "field-label", r#for: "server-url", "Server URL" }
            input {
                id: "server-url",
                class: "field-input",
                disabled: pinned,
                value: "{server_url_input}",
                oninput: move |evt| server_url_input.set(evt.value()),
            }
            if pinned {
                p { class: "muted", "Set by the {SERVER_URL_ENV} environment variable." }
            } else {
                div { class: "form-actions",
                    button { class: "btn-primary", onclick: on_apply, "Apply" }
                    button { class: "btn-secondary", onclick: on_reset, "Reset" }
                }
            }
        }

        AccountPanel {}
    }
}

#[component]
fn AccountPanel() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Session>>();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut pending = use_signal(|| false);

    let signed_in = state.with(|st| {
        st.account
            .as_ref()
            .map(|account| format!("Signed in as {} ({}).", account.email, account.role.label()))
    });

    let on_sign_in = move |evt: FormEvent| {
        evt.prevent_default();
        if pending() {
            return;
        }
        let address = email().trim().to_string();
        if address.is_empty() {
            push_toast(toasts, ToastKind::Warning, "Enter the account email first.");
            return;
        }
        pending.set(true);
        spawn(async move {
            match backend_client(&state, &session) {
                Ok(client) => match client.login(&address, &password()).await {
                    Ok(role) => {
                        tracing::info!(email = %address, role = role.label(), "signed in");
                        password.set(String::new());
                        state.with_mut(|st| {
                            st.account = Some(Account {
                                email: address,
                                role,
                            })
                        });
                        push_toast(
                            toasts,
                            ToastKind::Success,
                            format!("Signed in as {}.", role.label()),
                        );
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "sign-in failed");
                        push_toast(toasts, ToastKind::Error, sign_in_failure(&err));
                    }
                },
                Err(message) => push_toast(toasts, ToastKind::Error, message),
            }
            pending.set(false);
        });
    };

    let on_sign_out = move |_| {
        spawn(async move {
            let mut session = session;
            if let Ok(client) = backend_client(&state, &session) {
                if let Err(err) = client.logout().await {
                    tracing::warn!(error = %err, "sign-out request failed");
                }
            }
            // A fresh jar drops the session cookie whatever the backend said.
            session.set(Session::default());
            state.with_mut(|st| st.account = None);
            push_toast(toasts, ToastKind::Info, "Signed out.");
        });
    };

    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Account" }
            if let Some(label) = signed_in {
                p { "{label}" }
                div { class: "form-actions",
                    button { class: "btn-secondary", onclick: on_sign_out, "Sign out" }
                }
            } else {
                form {
                    onsubmit: on_sign_in,
                    div { class: "field-grid",
                        div {
                            label { class: "field-label", r#for: "account-email", "Email" }
                            input {
                                id: "account-email",
                                class: "field-input",
                                r#type: "email",
                                value: "{email}",
                                oninput: move |evt| email.set(evt.value()),
                            }
                        }
                        div {
                            label { class: "field-label", r#for: "account-password", "Password" }
                            input {
                                id: "account-password",
                                class: "field-input",
                                r#type: "password",
                                value: "{password}",
                                oninput: move |evt| password.set(evt.value()),
                            }
                        }
                    }
                    div { class: "form-actions",
                        button {
                            class: "btn-primary",
                            r#type: "submit",
                            disabled: pending(),
                            if pending() { "Signing in..." } else { "Sign in" }
                        }
                    }
                }
            }
        }
    }
}

fn sign_in_failure(err: &BackendError) -> String {
    match err {
        BackendError::InvalidCredentials => "Invalid email or password.".to_string(),
        BackendError::Unauthenticated => {
            "The backend did not keep the session; check the server URL.".to_string()
        }
        other => format!("Sign-in failed: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_password_reads_like_the_login_page() {
        assert_eq!(
            sign_in_failure(&BackendError::InvalidCredentials),
            "Invalid email or password."
        );
        assert!(sign_in_failure(&BackendError::UnexpectedRedirect("http://h/".into()))
            .starts_with("Sign-in failed"));
    }
}
