use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::entities::{Account, PickupId};
use crate::infra::backend::DEFAULT_BASE_URL;

/// A pickup the engineer closed during this session.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectedPickup {
    pub pickup_id: PickupId,
    pub total_price: f64,
    pub collected_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub server_url: String,
    /// Set when `PICKUP_SERVER_URL` pins the backend; the settings page is then read-only.
    pub server_url_pinned: bool,
    pub collected: Vec<CollectedPickup>,
    /// Account behind the shared backend session, if signed in.
    pub account: Option<Account>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_BASE_URL.to_string(),
            server_url_pinned: false,
            collected: Vec::new(),
            account: None,
        }
    }
}

impl AppState {
    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        if !self.server_url_pinned {
            if let Some(url) = persisted.server_url.filter(|url| !url.trim().is_empty()) {
                self.server_url = url;
            }
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            server_url: Some(self.server_url.clone()),
        }
    }

    /// Points the app at another backend. The old session does not carry over.
    pub fn switch_server(&mut self, server_url: String) {
        if self.server_url != server_url {
            self.account = None;
        }
        self.server_url = server_url;
    }

    pub fn record_collection(&mut self, pickup_id: PickupId, total_price: f64) {
        self.collected.retain(|entry| entry.pickup_id != pickup_id);
        self.collected.insert(
            0,
            CollectedPickup {
                pickup_id,
                total_price,
                collected_at: OffsetDateTime::now_utc(),
            },
        );
    }

    pub fn collected_total(&self) -> f64 {
        self.collected.iter().map(|entry| entry.total_price).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub server_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_url_overrides_default() {
        let mut state = AppState::default();
        state.apply_persisted(PersistedState {
            server_url: Some("http://pickup.internal:8080/".into()),
        });
        assert_eq!(state.server_url, "http://pickup.internal:8080/");
    }

    #[test]
    fn pinned_url_ignores_persisted_value() {
        let mut state = AppState {
            server_url: "http://env.example/".into(),
            server_url_pinned: true,
            ..Default::default()
        };
        state.apply_persisted(PersistedState {
            server_url: Some("http://stale.example/".into()),
        });
        assert_eq!(state.server_url, "http://env.example/");
    }

    #[test]
    fn blank_persisted_url_is_ignored() {
        let mut state = AppState::default();
        state.apply_persisted(PersistedState {
            server_url: Some("   ".into()),
        });
        assert_eq!(state.server_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn recollecting_a_pickup_replaces_the_entry() {
        let mut state = AppState::default();
        state.record_collection("a".into(), 100.0);
        state.record_collection("b".into(), 50.0);
        state.record_collection("a".into(), 120.0);
        assert_eq!(state.collected.len(), 2);
        assert_eq!(state.collected[0].pickup_id, "a");
        assert_eq!(state.collected_total(), 170.0);
    }

    #[test]
    fn switching_backend_forgets_the_account() {
        let mut state = AppState {
            account: Some(Account {
                email: "eng@example.com".into(),
                role: crate::domain::Role::Engineer,
            }),
            ..Default::default()
        };
        state.switch_server(DEFAULT_BASE_URL.to_string());
        assert!(state.account.is_some());
        state.switch_server("http://other.example/".into());
        assert!(state.account.is_none());
    }

    #[test]
    fn persisted_state_tolerates_missing_fields() {
        let state: PersistedState = serde_json::from_str("{}").unwrap();
        assert!(state.server_url.is_none());
    }
}
