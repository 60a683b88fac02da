use futures::future::{self, Either};
use std::future::Future;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Resolves after `ms` milliseconds on the browser timer queue.
pub(crate) async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(win) = web_sys::window() {
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        } else {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Runs `fut` to completion unless `ms` elapses first.
pub(crate) async fn with_timeout<F: Future>(fut: F, ms: i32) -> Option<F::Output> {
    let fut = Box::pin(fut);
    let timer = Box::pin(sleep_ms(ms));
    match future::select(fut, timer).await {
        Either::Left((out, _)) => Some(out),
        Either::Right(_) => None,
    }
}

/// Numbers overlapping loads so only the latest one may publish its result.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LoadGeneration {
    current: u64,
}

impl LoadGeneration {
    /// Starts a load; every earlier generation becomes stale.
    pub fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}

/// `2024-05-01T12:34:56.789+00:00` -> `2024-05-01 12:34`.
///
/// Supabase timestamps are ISO-8601; anything shorter is shown as-is.
pub(crate) fn short_timestamp(iso: &str) -> String {
    if iso.len() < 16 || !iso.is_char_boundary(16) {
        return iso.to_string();
    }
    iso[..16].replacen('T', " ", 1)
}

/// Trimmed text, or `None` when blank. Used for optional form columns.
pub(crate) fn non_empty(text: &str) -> Option<String> {
    let t = text.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Current value of the `<input>`/`<select>`/`<textarea>` that fired `ev`.
pub(crate) fn event_value(ev: &web_sys::Event) -> String {
    use wasm_bindgen::JsCast;

    let Some(target) = ev.target() else {
        return String::new();
    };
    if let Some(el) = target.dyn_ref::<web_sys::HtmlSelectElement>() {
        return el.value();
    }
    if let Some(el) = target.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return el.value();
    }
    if let Some(el) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return el.value();
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_timestamp_trims_seconds_and_zone() {
        assert_eq!(
            short_timestamp("2024-05-01T12:34:56.789+00:00"),
            "2024-05-01 12:34"
        );
    }

    #[test]
    fn test_short_timestamp_keeps_short_input() {
        assert_eq!(short_timestamp("2024-05-01"), "2024-05-01");
        assert_eq!(short_timestamp(""), "");
    }

    #[test]
    fn test_load_generation_drops_superseded_results() {
        let mut generation = LoadGeneration::default();
        let old = generation.begin();
        let new = generation.begin();
        // The old request finishing last must not publish.
        assert!(!generation.is_current(old));
        assert!(generation.is_current(new));
        assert!(!generation.is_current(0));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  정예  ").as_deref(), Some("정예"));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(""), None);
    }
}
