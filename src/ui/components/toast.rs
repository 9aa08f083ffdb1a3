use std::time::Duration;

use dioxus::prelude::*;

use crate::util::generate_id;

const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(6);
const MAX_TOASTS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
    /// Stands in for a blocking alert: stays until the user dismisses it.
    Alert,
}

impl ToastKind {
    pub fn auto_dismiss(self) -> Option<Duration> {
        match self {
            ToastKind::Alert => None,
            _ => Some(TOAST_AUTO_DISMISS),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
        }
    }
}

pub fn push_toast(
    mut toasts: Signal<Vec<ToastMessage>>,
    kind: ToastKind,
    message: impl Into<String>,
) {
    let text = message.into();
    toasts.with_mut(|entries| push_bounded(entries, ToastMessage::new(kind, text)));
}

pub fn dismiss_toast(mut toasts: Signal<Vec<ToastMessage>>, id: &str) {
    toasts.with_mut(|entries| entries.retain(|toast| toast.id != id));
}

/// Appends `message`, evicting the oldest transient toast when full. Alerts
/// are only evicted when nothing else is left to drop.
fn push_bounded(entries: &mut Vec<ToastMessage>, message: ToastMessage) {
    if entries.len() >= MAX_TOASTS {
        let evict = entries
            .iter()
            .position(|toast| toast.kind.auto_dismiss().is_some())
            .unwrap_or(0);
        entries.remove(evict);
    }
    entries.push(message);
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let views = toasts()
        .into_iter()
        .map(ToastView::from)
        .collect::<Vec<_>>();

    if views.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            class: "toast-stack",
            ul {
                class: "toast-list",
                for view in views {
                    ToastCard { view, toasts }
                }
            }
        }
    }
}

#[component]
fn ToastCard(view: ToastView, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let toast_id = view.id.clone();
    let lifetime = view.lifetime;
    let dismiss_label = if lifetime.is_some() { "Dismiss" } else { "OK" };
    let _auto_dismiss = use_future(move || {
        let id = toast_id.clone();
        async move {
            if let Some(lifetime) = lifetime {
                tokio::time::sleep(lifetime).await;
                dismiss_toast(toasts, &id);
            }
        }
    });

    rsx! {
        li {
            class: "toast {view.theme}",
            span { "{view.icon}" }
            p { "{view.text}" }
            button {
                class: "toast-dismiss",
                onclick: move |_| dismiss_toast(toasts, &view.id),
                "{dismiss_label}"
            }
        }
    }
}

#[derive(Clone, PartialEq)]
struct ToastView {
    id: String,
    text: String,
    theme: &'static str,
    icon: &'static str,
    lifetime: Option<Duration>,
}

impl From<ToastMessage> for ToastView {
    fn from(message: ToastMessage) -> Self {
        let (theme, icon) = match message.kind {
            ToastKind::Info => ("toast-info", "ℹ️"),
            ToastKind::Success => ("toast-success", "✅"),
            ToastKind::Warning => ("toast-warning", "⚠️"),
            ToastKind::Error => ("toast-error", "⛔"),
            ToastKind::Alert => ("toast-alert", "🔔"),
        };

        ToastView {
            id: message.id,
            text: message.text,
            theme,
            icon,
            lifetime: message.kind.auto_dismiss(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_toast_is_dropped_when_full() {
        let mut entries = Vec::new();
        for n in 0..=MAX_TOASTS {
            push_bounded(&mut entries, ToastMessage::new(ToastKind::Info, format!("#{n}")));
        }
        assert_eq!(entries.len(), MAX_TOASTS);
        assert_eq!(entries[0].text, "#1");
    }

    #[test]
    fn alerts_wait_for_the_user() {
        assert_eq!(ToastKind::Alert.auto_dismiss(), None);
        assert_eq!(ToastKind::Info.auto_dismiss(), Some(TOAST_AUTO_DISMISS));
        assert_eq!(ToastKind::Error.auto_dismiss(), Some(TOAST_AUTO_DISMISS));
    }

    #[test]
    fn full_stack_evicts_transient_toasts_before_alerts() {
        let mut entries = vec![ToastMessage::new(ToastKind::Alert, "Pickup collected successfully!")];
        for n in 1..MAX_TOASTS {
            push_bounded(&mut entries, ToastMessage::new(ToastKind::Info, format!("#{n}")));
        }
        push_bounded(&mut entries, ToastMessage::new(ToastKind::Warning, "latest"));

        assert_eq!(entries.len(), MAX_TOASTS);
        assert_eq!(entries[0].kind, ToastKind::Alert);
        assert_eq!(entries[1].text, "#2");
        assert_eq!(entries[MAX_TOASTS - 1].text, "latest");
    }
}
