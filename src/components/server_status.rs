use crate::components::ui::Spinner;
use crate::connectivity::{ConnectionStatus, PollTask};
use crate::state::AppContext;
use leptos::prelude::*;

fn dot_class(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Checking => "bg-amber-400",
        ConnectionStatus::Connected => "bg-emerald-500",
        ConnectionStatus::Disconnected => "bg-red-500",
    }
}

/// Layout-shell indicator. Owns the polling task for as long as it is
/// mounted.
#[component]
pub fn ServerStatus() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let monitor = app_state.0.monitor;

    let poll: StoredValue<Option<PollTask>, LocalStorage> =
        StoredValue::new_local(monitor.start_polling());
    on_cleanup(move || {
        poll.update_value(|task| {
            task.take();
        });
    });

    let title = move || {
        let endpoint = monitor.endpoint();
        if endpoint.is_empty() {
            "서버 주소가 설정되지 않았습니다".to_string()
        } else {
            endpoint
        }
    };

    view! {
        <a
            href="/settings"
            class="inline-flex items-center gap-2 rounded-md border border-border px-2 py-1 text-xs text-muted-foreground transition-colors hover:bg-accent"
            title=title
        >
            <Show
                when=move || monitor.status() == ConnectionStatus::Checking
                fallback=move || view! {
                    <span class=move || format!("inline-block size-2 rounded-full {}", dot_class(monitor.status()))></span>
                }
            >
                <Spinner class="size-3" />
            </Show>
            <span>{move || monitor.status().to_string()}</span>
        </a>
    }
}
