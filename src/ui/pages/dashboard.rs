use dioxus::prelude::*;
use time::macros::format_description;

use crate::{
    app::Route,
    domain::{format_price, AppState},
    ui::components::{
        kpi_card::KpiCard,
        toast::{push_toast, ToastKind, ToastMessage},
    },
};

#[component]
pub fn DashboardPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    let mut pickup_input = use_signal(String::new);

    let (collected, total, server_url) =
        state.with(|st| (st.collected.clone(), st.collected_total(), st.server_url.clone()));
    let count = collected.len();

    let on_open = move |evt: FormEvent| {
        evt.prevent_default();
        let pickup_id = pickup_input().trim().to_string();
        if pickup_id.is_empty() {
            push_toast(toasts, ToastKind::Warning, "Enter a pickup ID first.");
            return;
        }
        pickup_input.set(String::new());
        nav.push(Route::Inspect { pickup_id });
    };

    rsx! {
        section { class: "kpi-grid",
            KpiCard {
                title: "Collected this session".to_string(),
                value: count.to_string(),
                description: None,
            }
            KpiCard {
                title: "Total paid out".to_string(),
                value: format!("₹{}", format_price(total)),
                description: Some(format!("Backend: {server_url}")),
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Open Pickup" }
            form {
                class: "form-actions",
                onsubmit: on_open,
                input {
                    class: "field-input",
                    placeholder: "Pickup ID",
                    value: "{pickup_input}",
                    oninput: move |evt| pickup_input.set(evt.value()),
                }
                button { class: "btn-primary", r#type: "submit", "Inspect" }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Collected Pickups" }
            if collected.is_empty() {
                p { class: "muted", "Nothing collected yet." }
            } else {
                table { class: "data-table",
                    thead {
                        tr {
                            th { "Pickup" }
                            th { "Price" }
                            th { "Collected" }
                        }
                    }
                    tbody {
                        for entry in collected.iter() {
                            tr { key: "{entry.pickup_id}",
                                td { "{entry.pickup_id}" }
                                td { "₹{format_price(entry.total_price)}" }
                                td {
                                    {entry
                                        .collected_at
                                        .format(format_description!("[hour]:[minute] UTC"))
                                        .unwrap_or_default()}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
