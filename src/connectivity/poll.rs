use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// A `setInterval` registration. Dropping it clears the interval and frees
/// the callback.
pub(crate) struct PollTask {
    interval_id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl PollTask {
    pub fn start(period_ms: i32, mut tick: impl FnMut() + 'static) -> Option<Self> {
        let win = web_sys::window()?;
        let callback = Closure::wrap(Box::new(move || tick()) as Box<dyn FnMut()>);
        let interval_id = win
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms,
            )
            .ok()?;

        Some(Self {
            interval_id,
            _callback: callback,
        })
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        if let Some(win) = web_sys::window() {
            win.clear_interval_with_handle(self.interval_id);
        }
    }
}
