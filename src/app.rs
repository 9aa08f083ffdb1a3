use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::AppState,
    infra::backend::{BackendClient, Session},
    ui::{
        components::toast::{Toast, ToastMessage},
        pages::{DashboardPage, InspectionPage, PickupRequestPage, SettingsPage},
        shell::Shell,
    },
    util::{assets, config::initial_state, persistence::save_persisted_state},
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    RequestPickup {},
    #[route("/engineer/dashboard")]
    EngineerDashboard {},
    #[route("/engineer/inspect/:pickup_id")]
    Inspect { pickup_id: String },
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(initial_state);
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let session = use_signal(Session::default);
    use_context_provider(|| session);

    rsx! {
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        tracing::warn!(error = %err, "failed to persist settings");
    }
}

/// Client for the backend currently configured in `state`, carrying the
/// shared sign-in session.
pub fn backend_client(
    state: &Signal<AppState>,
    session: &Signal<Session>,
) -> Result<BackendClient, String> {
    let server_url = state.with(|st| st.server_url.clone());
    let session = session.with(Session::clone);
    BackendClient::with_session(&server_url, &session).map_err(|err| {
        tracing::error!(%server_url, error = %err, "cannot build backend client");
        format!("Backend address {server_url} is not usable: {err}")
    })
}

#[component]
pub fn RequestPickup() -> Element {
    rsx! { Shell { PickupRequestPage {} } }
}

#[component]
pub fn EngineerDashboard() -> Element {
    rsx! { Shell { DashboardPage {} } }
}

#[component]
pub fn Inspect(pickup_id: String) -> Element {
    rsx! { Shell { InspectionPage { key: "{pickup_id}", pickup_id: pickup_id.clone() } } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
