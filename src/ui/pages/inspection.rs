use dioxus::prelude::*;
use dioxus::router::Navigator;
use time::{macros::format_description, OffsetDateTime};

use crate::{
    app::{backend_client, Route},
    infra::backend::Session,
    domain::{
        calculate_price, submit_inspection, AppState, InspectionView, PriceEstimate, PriceRequest,
        SubmitOutcome, CATEGORIES, CONDITIONS,
    },
    ui::components::{
        confirm_dialog::{ask_confirmation, ConfirmDialog, ConfirmPrompt},
        kpi_card::KpiCard,
        toast::{push_toast, ToastKind, ToastMessage},
    },
};

const PRICE_PLACEHOLDER: &str = "--";

#[derive(Clone, Debug, PartialEq)]
struct InspectionFields {
    pickup_id: String,
    category: String,
    weight: String,
    condition: String,
    age: String,
}

impl InspectionFields {
    fn new(pickup_id: String) -> Self {
        Self {
            pickup_id,
            category: CATEGORIES[0].to_string(),
            weight: String::new(),
            condition: CONDITIONS[0].to_string(),
            age: String::new(),
        }
    }

    fn price_request(&self) -> PriceRequest {
        PriceRequest {
            category: self.category.clone(),
            weight: self.weight.clone(),
            condition: self.condition.clone(),
            age_years: self.age.clone(),
        }
    }
}

/// Admits one backend round trip at a time. Lookups write the price display
/// as they finish, so overlapping ones could leave a stale quote on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LookupGate {
    in_flight: bool,
}

impl LookupGate {
    fn try_begin(&mut self) -> bool {
        !std::mem::replace(&mut self.in_flight, true)
    }

    fn finish(&mut self) {
        self.in_flight = false;
    }

    fn is_busy(self) -> bool {
        self.in_flight
    }
}

/// The inspection page as seen by the pricing and submission flows.
#[derive(Clone, Copy)]
struct PageView {
    fields: Signal<InspectionFields>,
    price_text: Signal<String>,
    prompt: Signal<Option<ConfirmPrompt>>,
    toasts: Signal<Vec<ToastMessage>>,
    nav: Navigator,
}

impl InspectionView for PageView {
    fn price_request(&self) -> PriceRequest {
        self.fields.peek().price_request()
    }

    fn pickup_id(&self) -> String {
        self.fields.peek().pickup_id.clone()
    }

    fn show_price(&mut self, text: String) {
        self.price_text.set(text);
    }

    async fn confirm(&mut self, message: String) -> bool {
        ask_confirmation(self.prompt, message).await
    }

    fn alert(&mut self, message: &str) {
        push_toast(self.toasts, ToastKind::Alert, message);
    }

    fn navigate(&mut self, path: &str) {
        match path.parse::<Route>() {
            Ok(route) => {
                self.nav.push(route);
            }
            Err(_) => tracing::warn!(path, "no page for navigation target"),
        }
    }
}

#[component]
pub fn InspectionPage(pickup_id: String) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Session>>();
    let nav = use_navigator();

    let mut fields = use_signal(|| InspectionFields::new(pickup_id.clone()));
    let price_text = use_signal(|| PRICE_PLACEHOLDER.to_string());
    let prompt = use_signal(|| None::<ConfirmPrompt>);
    let mut estimate = use_signal(|| None::<PriceEstimate>);
    let mut quoted_at = use_signal(|| None::<OffsetDateTime>);
    let gate = use_signal(LookupGate::default);

    let view = PageView {
        fields,
        price_text,
        prompt,
        toasts,
        nav,
    };

    let refresh = move || {
        let mut gate = gate;
        if !gate.with_mut(LookupGate::try_begin) {
            return;
        }
        spawn(async move {
            match backend_client(&state, &session) {
                Ok(client) => {
                    let mut view = view;
                    let result = calculate_price(&client, &mut view).await;
                    if let PriceEstimate::Unavailable(reason) = &result {
                        push_toast(
                            toasts,
                            ToastKind::Warning,
                            format!("Price estimate unavailable: {reason}"),
                        );
                    }
                    quoted_at.set(Some(OffsetDateTime::now_utc()));
                    estimate.set(Some(result));
                }
                Err(message) => push_toast(toasts, ToastKind::Error, message),
            }
            gate.with_mut(LookupGate::finish);
        });
    };

    // Price once on load.
    use_hook(move || refresh());

    let on_submit = move |_| {
        let mut gate = gate;
        if !gate.with_mut(LookupGate::try_begin) {
            return;
        }
        spawn(async move {
            match backend_client(&state, &session) {
                Ok(client) => {
                    // Submission re-prices; the old breakdown no longer matches.
                    estimate.set(None);
                    let mut view = view;
                    let outcome = submit_inspection(&client, &mut view).await;
                    if let SubmitOutcome::Collected { total_price } = outcome {
                        let pickup_id = view.pickup_id();
                        state.with_mut(|st| st.record_collection(pickup_id, total_price));
                    }
                }
                Err(message) => push_toast(toasts, ToastKind::Error, message),
            }
            gate.with_mut(LookupGate::finish);
        });
    };

    let busy = gate().is_busy();
    let current = fields();
    let displayed_price = price_text();
    let unavailable = matches!(estimate(), Some(PriceEstimate::Unavailable(_)));
    let breakdown = match estimate() {
        Some(PriceEstimate::Quoted(response)) => Some(response),
        _ => None,
    };
    let quoted_label = quoted_at().and_then(|at| {
        at.format(format_description!("[hour]:[minute]:[second] UTC"))
            .ok()
    });

    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Inspect Pickup" }
            div { class: "field-grid",
                div {
                    label { class: "field-label", r#for: "pickup-id", "Pickup" }
                    input {
                        id: "pickup-id",
                        class: "field-input",
                        readonly: true,
                        value: "{current.pickup_id}",
                    }
                }
                div {
                    label { class: "field-label", r#for: "category", "Category" }
                    select {
                        id: "category",
                        class: "field-input",
                        value: "{current.category}",
                        onchange: move |evt| fields.with_mut(|f| f.category = evt.value()),
                        for category in CATEGORIES.iter() {
                            option { value: *category, selected: current.category == *category, "{category}" }
                        }
                    }
                }
                div {
                    label { class: "field-label", r#for: "weight", "Weight (kg)" }
                    input {
                        id: "weight",
                        class: "field-input",
                        inputmode: "decimal",
                        value: "{current.weight}",
                        oninput: move |evt| fields.with_mut(|f| f.weight = evt.value()),
                    }
                }
                div {
                    label { class: "field-label", r#for: "condition", "Condition" }
                    select {
                        id: "condition",
                        class: "field-input",
                        value: "{current.condition}",
                        onchange: move |evt| fields.with_mut(|f| f.condition = evt.value()),
                        for condition in CONDITIONS.iter() {
                            option { value: *condition, selected: current.condition == *condition, "{condition}" }
                        }
                    }
                }
                div {
                    label { class: "field-label", r#for: "age", "Age (years)" }
                    input {
                        id: "age",
                        class: "field-input",
                        inputmode: "numeric",
                        value: "{current.age}",
                        oninput: move |evt| fields.with_mut(|f| f.age = evt.value()),
                    }
                }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Estimated Value" }
            div { class: "kpi-grid",
                div { class: "kpi-card",
                    h3 { class: "kpi-title", "Price" }
                    p { class: "kpi-value",
                        "₹"
                        span { id: "calculated-price", "{displayed_price}" }
                    }
                    if unavailable {
                        p { class: "kpi-description price-unavailable", "Last lookup failed; showing previous value." }
                    } else if let Some(label) = quoted_label {
                        p { class: "kpi-description", "Quoted at {label}" }
                    }
                }
                if let Some(response) = breakdown {
                    KpiCard {
                        title: "Base rate".to_string(),
                        value: response.base_rate.map(|rate| format!("{rate} {}/kg", response.currency)).unwrap_or_else(|| "n/a".to_string()),
                        description: None,
                    }
                    KpiCard {
                        title: "Condition factor".to_string(),
                        value: response.condition_factor.map(|f| format!("×{f}")).unwrap_or_else(|| "n/a".to_string()),
                        description: None,
                    }
                    KpiCard {
                        title: "Age factor".to_string(),
                        value: response.age_factor.map(|f| format!("×{f}")).unwrap_or_else(|| "n/a".to_string()),
                        description: Some("10% per year, capped at 80%".to_string()),
                    }
                }
            }
            div { class: "form-actions",
                button {
                    class: "btn-secondary",
                    disabled: busy,
                    onclick: move |_| refresh(),
                    "Recalculate"
                }
                button {
                    class: "btn-primary",
                    disabled: busy,
                    onclick: on_submit,
                    "Approve & Collect"
                }
            }
        }

        ConfirmDialog { prompt }
    }
}
