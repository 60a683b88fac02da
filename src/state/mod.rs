use crate::api::{ApiError, EnvConfig, NotionClient, SupabaseClient};
use crate::connectivity::{ConnectivityMonitor, EndpointSettings};
use crate::models::Profile;
use crate::reference::ReferenceStore;
use crate::storage::{load_json, save_json, KeyValueStore, LocalStore, PROFILE_KEY};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub env: StoredValue<EnvConfig>,
    pub store: StoredValue<Arc<dyn KeyValueStore>>,
    pub supabase: RwSignal<SupabaseClient>,

    /// Profile of the signed-in user, cached between sessions.
    pub profile: RwSignal<Option<Profile>>,

    pub monitor: ConnectivityMonitor,
    pub reference: StoredValue<ReferenceStore>,

    /// Last unread count seen by the messages page; `None` until first load.
    pub unread_count: RwSignal<Option<i64>>,
}

impl AppState {
    pub fn new() -> Self {
        let env = EnvConfig::load();
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();

        let store: Arc<dyn KeyValueStore> = Arc::new(LocalStore);

        let monitor = ConnectivityMonitor::new(
            EndpointSettings::new(store.clone()),
            &search,
            env.server_url.as_deref(),
        );
        let supabase = SupabaseClient::load_from_storage(&env, store.clone());
        let profile = if supabase.is_authenticated() {
            load_json::<Profile>(store.as_ref(), PROFILE_KEY)
        } else {
            None
        };

        Self {
            env: StoredValue::new(env),
            store: StoredValue::new(store),
            supabase: RwSignal::new(supabase),
            profile: RwSignal::new(profile),
            monitor,
            reference: StoredValue::new(ReferenceStore::bundled()),
            unread_count: RwSignal::new(None),
        }
    }

    /// Built per call so endpoint edits apply to the next request.
    pub fn notion(&self) -> NotionClient {
        NotionClient::new(self.monitor.endpoint_untracked())
    }

    pub fn is_signed_in(&self) -> bool {
        self.supabase.with(|c| c.is_authenticated())
    }

    pub fn set_profile(&self, profile: Option<Profile>) {
        self.store.with_value(|store| match &profile {
            Some(p) => save_json(store.as_ref(), PROFILE_KEY, p),
            None => store.remove(PROFILE_KEY),
        });
        self.profile.set(profile);
    }

    /// Drops the session everywhere and sends the user to the login page.
    ///
    /// Local state is cleared before returning, so concurrent failures that
    /// land here see a signed-out app and do not start a second logout.
    pub fn sign_out(&self, redirect_to_login: bool) {
        let mut client = self.supabase.get_untracked();
        let ended = client.end_session();
        self.supabase.set(client.clone());
        self.set_profile(None);
        self.unread_count.set(None);

        spawn_local(async move {
            if let Some(session) = ended {
                client.revoke(&session).await;
            }
            if redirect_to_login {
                let _ = window().location().set_href("/login");
            }
        });
    }

    /// Common handling for failed data calls. Returns the message to show,
    /// or `None` when the failure was an expired session (already handled).
    pub fn handle_error(&self, e: ApiError) -> Option<String> {
        if e.is_unauthorized() && self.is_signed_in() {
            self.sign_out(true);
            return None;
        }
        Some(e.to_string())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
