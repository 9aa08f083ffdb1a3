//! Startup configuration: logging and the backend location.

use tracing_subscriber::EnvFilter;

use crate::domain::AppState;
use crate::util::persistence::load_persisted_state;

pub const SERVER_URL_ENV: &str = "PICKUP_SERVER_URL";
const DEFAULT_LOG_FILTER: &str = "info";

/// Loads `.env` if present and installs the log subscriber. `RUST_LOG`
/// overrides the default filter.
pub fn init() {
    let dotenv = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // The UI runtime may already have installed a subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "failed to read environment file"),
    }
}

/// Initial state: environment override first, then saved settings, then
/// the built-in default.
pub fn initial_state() -> AppState {
    let mut state = AppState::default();
    match server_url_override(std::env::var(SERVER_URL_ENV).ok()) {
        Some(url) => {
            tracing::info!(%url, "backend pinned by {SERVER_URL_ENV}");
            state.server_url = url;
            state.server_url_pinned = true;
        }
        None => {
            if let Some(saved) = load_persisted_state() {
                state.apply_persisted(saved);
            }
        }
    }
    state
}

fn server_url_override(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_override_is_ignored() {
        assert_eq!(server_url_override(None), None);
        assert_eq!(server_url_override(Some("  ".into())), None);
    }

    #[test]
    fn override_is_trimmed() {
        assert_eq!(
            server_url_override(Some(" http://10.0.0.5:5000/ ".into())),
            Some("http://10.0.0.5:5000/".to_string())
        );
    }
}
