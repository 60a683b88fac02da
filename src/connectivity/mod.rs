//! Backend reachability.
//!
//! The endpoint is the base URL of the notion-proxy deployment. It is
//! persisted, can be overridden with `?server=<url>`, and is probed on mount
//! and then every [`POLL_INTERVAL_MS`].

mod poll;
mod tracker;

pub(crate) use poll::PollTask;
pub(crate) use tracker::{ProbeStart, ProbeTicket, ProbeTracker};

use crate::storage::{KeyValueStore, SERVER_URL_KEY};
use crate::util::with_timeout;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;

pub(crate) const POLL_INTERVAL_MS: i32 = 60_000;
pub(crate) const PROBE_TIMEOUT_MS: i32 = 5_000;
pub(crate) const SERVER_QUERY_PARAM: &str = "server";

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub(crate) enum ConnectionStatus {
    #[strum(to_string = "확인 중")]
    Checking,
    #[strum(to_string = "연결됨")]
    Connected,
    #[strum(to_string = "연결 끊김")]
    Disconnected,
}

impl ConnectionStatus {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

pub(crate) fn normalize_endpoint(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Extracts `server=<url>` from a `location.search` string.
pub(crate) fn endpoint_from_query(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == SERVER_QUERY_PARAM)
        .and_then(|(_, v)| {
            let v = v.replace('+', " ");
            urlencoding::decode(&v).ok().map(|s| s.into_owned())
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Persisted endpoint setting. `set_endpoint` is the only writer.
#[derive(Clone)]
pub(crate) struct EndpointSettings {
    store: Arc<dyn KeyValueStore>,
}

impl EndpointSettings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get_endpoint(&self) -> String {
        self.store.get(SERVER_URL_KEY).unwrap_or_default()
    }

    /// Returns the normalized value that was stored.
    pub fn set_endpoint(&self, url: &str) -> String {
        let normalized = normalize_endpoint(url);
        self.store.set(SERVER_URL_KEY, &normalized);
        normalized
    }
}

/// Lightweight reachability check. Any completed response counts as
/// reachable; transport errors and timeouts do not.
pub(crate) async fn probe(endpoint: &str) -> bool {
    if endpoint.is_empty() {
        return false;
    }

    let request = reqwest::Client::new().get(endpoint).send();
    match with_timeout(request, PROBE_TIMEOUT_MS).await {
        Some(Ok(_)) => true,
        Some(Err(e)) => {
            log!("probe {endpoint} failed: {e}");
            false
        }
        None => {
            log!("probe {endpoint} timed out");
            false
        }
    }
}

/// Reactive front of the monitor, shared through `AppState`.
#[derive(Clone, Copy)]
pub(crate) struct ConnectivityMonitor {
    settings: StoredValue<EndpointSettings>,
    endpoint: RwSignal<String>,
    status: RwSignal<ConnectionStatus>,
    tracker: StoredValue<ProbeTracker>,
}

impl ConnectivityMonitor {
    /// `initial_query` is `location.search`; a `server` parameter there wins
    /// over the persisted value. `fallback` applies only when neither is set.
    pub fn new(settings: EndpointSettings, initial_query: &str, fallback: Option<&str>) -> Self {
        let endpoint = match endpoint_from_query(initial_query) {
            Some(url) => settings.set_endpoint(&url),
            None => {
                let stored = settings.get_endpoint();
                match fallback {
                    Some(url) if stored.is_empty() => normalize_endpoint(url),
                    _ => stored,
                }
            }
        };

        let mut tracker = ProbeTracker::default();
        tracker.set_endpoint(&endpoint);

        Self {
            settings: StoredValue::new(settings),
            endpoint: RwSignal::new(endpoint),
            status: RwSignal::new(ConnectionStatus::Checking),
            tracker: StoredValue::new(tracker),
        }
    }

    pub fn endpoint(&self) -> String {
        self.endpoint.get()
    }

    pub fn endpoint_untracked(&self) -> String {
        self.endpoint.get_untracked()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.get()
    }

    pub fn set_endpoint(&self, url: &str) {
        let normalized = self.settings.with_value(|s| s.set_endpoint(url));
        self.tracker
            .update_value(|t| t.set_endpoint(&normalized));
        self.endpoint.set(normalized);
        self.status.set(ConnectionStatus::Checking);
        self.check_now();
    }

    /// Issues one probe against the current endpoint.
    pub fn check_now(&self) {
        let start = self
            .tracker
            .try_update_value(|t| t.begin())
            .unwrap_or(ProbeStart::Skip);

        let ticket = match start {
            ProbeStart::Skip => {
                self.status.set(ConnectionStatus::Disconnected);
                return;
            }
            ProbeStart::Run(ticket) => ticket,
        };

        if self.status.get_untracked() != ConnectionStatus::Connected {
            self.status.set(ConnectionStatus::Checking);
        }

        let this = *self;
        spawn_local(async move {
            let reachable = probe(&ticket.endpoint).await;
            this.finish(ticket, reachable);
        });
    }

    fn finish(&self, ticket: ProbeTicket, reachable: bool) {
        let applied = self
            .tracker
            .try_update_value(|t| t.complete(&ticket, reachable))
            .flatten();
        if let Some(status) = applied {
            self.status.set(status);
        }
    }

    /// Probes now and then every [`POLL_INTERVAL_MS`] until the returned
    /// task is dropped.
    pub fn start_polling(&self) -> Option<PollTask> {
        self.check_now();
        let this = *self;
        PollTask::start(POLL_INTERVAL_MS, move || this.check_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn settings() -> EndpointSettings {
        EndpointSettings::new(Arc::new(MemoryStore::default()))
    }

    #[test]
    fn test_get_endpoint_defaults_to_empty() {
        assert_eq!(settings().get_endpoint(), "");
    }

    #[test]
    fn test_set_endpoint_strips_trailing_slashes() {
        let s = settings();
        for (input, expected) in [
            ("https://proxy.example.com", "https://proxy.example.com"),
            ("https://proxy.example.com/", "https://proxy.example.com"),
            ("https://proxy.example.com/api///", "https://proxy.example.com/api"),
            ("///", ""),
        ] {
            s.set_endpoint(input);
            assert_eq!(s.get_endpoint(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_set_endpoint_persists_across_instances() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        EndpointSettings::new(store.clone()).set_endpoint("http://localhost:8787/");
        assert_eq!(
            EndpointSettings::new(store).get_endpoint(),
            "http://localhost:8787"
        );
    }

    #[test]
    fn test_endpoint_from_query_decodes_value() {
        assert_eq!(
            endpoint_from_query("?server=http%3A%2F%2Fa.example%2F"),
            Some("http://a.example/".to_string())
        );
        assert_eq!(
            endpoint_from_query("?tab=1&server=https://b.example"),
            Some("https://b.example".to_string())
        );
    }

    #[test]
    fn test_endpoint_from_query_ignores_missing_or_empty() {
        assert_eq!(endpoint_from_query(""), None);
        assert_eq!(endpoint_from_query("?servers=x"), None);
        assert_eq!(endpoint_from_query("?server="), None);
        assert_eq!(endpoint_from_query("?server"), None);
    }

    fn monitor_with(
        stored: Option<&str>,
        query: &str,
        fallback: Option<&str>,
    ) -> (Owner, Arc<dyn KeyValueStore>, ConnectivityMonitor) {
        let owner = Owner::new();
        owner.set();
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        if let Some(url) = stored {
            store.set(SERVER_URL_KEY, url);
        }
        let monitor = ConnectivityMonitor::new(EndpointSettings::new(store.clone()), query, fallback);
        (owner, store, monitor)
    }

    #[test]
    fn test_query_param_wins_and_is_persisted_normalized() {
        let (_owner, store, monitor) = monitor_with(
            Some("http://old"),
            "?server=http%3A%2F%2Fnew%2F%2F",
            Some("http://fallback"),
        );
        assert_eq!(monitor.endpoint_untracked(), "http://new");
        assert_eq!(store.get(SERVER_URL_KEY).as_deref(), Some("http://new"));
    }

    #[test]
    fn test_stored_endpoint_wins_over_fallback() {
        let (_owner, store, monitor) = monitor_with(Some("http://old"), "", Some("http://fallback"));
        assert_eq!(monitor.endpoint_untracked(), "http://old");
        assert_eq!(store.get(SERVER_URL_KEY).as_deref(), Some("http://old"));
    }

    #[test]
    fn test_fallback_applies_without_being_persisted() {
        let (_owner, store, monitor) = monitor_with(None, "?tab=1", Some("http://fallback/"));
        assert_eq!(monitor.endpoint_untracked(), "http://fallback");
        assert_eq!(store.get(SERVER_URL_KEY), None);
    }

    #[test]
    fn test_empty_endpoint_reports_disconnected() {
        let (_owner, _store, monitor) = monitor_with(None, "", None);
        assert_eq!(monitor.endpoint_untracked(), "");
        assert_eq!(monitor.status.get_untracked(), ConnectionStatus::Checking);
        monitor.check_now();
        assert_eq!(monitor.status.get_untracked(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_clearing_endpoint_persists_and_disconnects() {
        let (_owner, store, monitor) = monitor_with(Some("http://old"), "", None);
        monitor.set_endpoint("");
        assert_eq!(monitor.endpoint_untracked(), "");
        assert_eq!(store.get(SERVER_URL_KEY).as_deref(), Some(""));
        assert_eq!(monitor.status.get_untracked(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_connection_status_labels() {
        assert_eq!(ConnectionStatus::Checking.to_string(), "확인 중");
        assert_eq!(ConnectionStatus::from_reachable(true), ConnectionStatus::Connected);
        assert_eq!(
            ConnectionStatus::from_reachable(false),
            ConnectionStatus::Disconnected
        );
    }
}
