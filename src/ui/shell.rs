use dioxus::prelude::*;

use crate::app::Route;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        div {
            header {
                class: "app-header",
                div {
                    h1 { class: "app-title", "{APP_NAME}" }
                    span { class: "app-version", "{version_label()}" }
                }
                nav { class: "app-nav",
                    NavButton {
                        active: matches!(current_route, Route::RequestPickup {}),
                        onclick: move |_| { nav.push(Route::RequestPickup {}); },
                        label: "Request Pickup",
                    }
                    NavButton {
                        active: matches!(current_route, Route::EngineerDashboard {} | Route::Inspect { .. }),
                        onclick: move |_| { nav.push(Route::EngineerDashboard {}); },
                        label: "Engineer",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Settings {}),
                        onclick: move |_| { nav.push(Route::Settings {}); },
                        label: "⚙️",
                    }
                }
            }
            main { class: "app-main",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    let class = if active {
        "nav-button active"
    } else {
        "nav-button"
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
