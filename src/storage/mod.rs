use serde::{Deserialize, Serialize};

pub(crate) const SERVER_URL_KEY: &str = "party_board_server_url";
pub(crate) const SESSION_KEY: &str = "party_board_session";
pub(crate) const PROFILE_KEY: &str = "party_board_profile";

/// String key/value persistence.
///
/// The browser build uses [`LocalStore`]; tests inject [`MemoryStore`].
pub(crate) trait KeyValueStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`. Every call is a no-op when storage is unavailable
/// (private mode, sandboxed iframes).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalStore;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    items: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

pub(crate) fn load_json<T: for<'de> Deserialize<'de>>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Option<T> {
    let json = store.get(key)?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        store.set(key, &json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Sample {
        id: u32,
        name: String,
    }

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::default();
        assert!(store.get("k").is_none());

        store.set("k", "v1");
        store.set("k", "v2");
        assert_eq!(store.get("k").as_deref(), Some("v2"));

        store.remove("k");
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_json_helpers_roundtrip_and_reject_garbage() {
        let store = MemoryStore::default();
        let value = Sample {
            id: 7,
            name: "길드".to_string(),
        };
        save_json(&store, "sample", &value);
        assert_eq!(load_json::<Sample>(&store, "sample"), Some(value));

        store.set("sample", "{not json");
        assert!(load_json::<Sample>(&store, "sample").is_none());
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_store_roundtrip() {
        let store = LocalStore;
        store.remove(SERVER_URL_KEY);
        assert!(store.get(SERVER_URL_KEY).is_none());

        store.set(SERVER_URL_KEY, "https://proxy.example.com");
        assert_eq!(
            store.get(SERVER_URL_KEY).as_deref(),
            Some("https://proxy.example.com")
        );

        store.remove(SERVER_URL_KEY);
        assert!(store.get(SERVER_URL_KEY).is_none());
    }
}
