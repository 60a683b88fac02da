mod blacklist;
mod calculator;
mod login;
mod messages;
mod parties;
mod recruits;
mod reference;
mod settings;
mod trades;
mod wiki;

pub use blacklist::BlacklistPage;
pub use calculator::CalculatorPage;
pub use login::LoginPage;
pub use messages::MessagesPage;
pub use parties::PartiesPage;
pub use recruits::RecruitsPage;
pub use reference::ReferencePage;
pub use settings::SettingsPage;
pub use trades::TradesPage;
pub use wiki::WikiPage;

use crate::components::ServerStatus;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::components::{Outlet, A};
use leptos_router::hooks::use_location;

const NAV_ITEMS: &[(&str, &str)] = &[
    ("/", "모집 공고"),
    ("/parties", "파티 찾기"),
    ("/trades", "거래"),
    ("/messages", "쪽지"),
    ("/reference", "NPC · 맵"),
    ("/calculator", "계산기"),
    ("/wiki", "위키"),
];

fn is_active(pathname: &str, href: &str) -> bool {
    if href == "/" {
        pathname == "/"
    } else {
        pathname == href || pathname.starts_with(&format!("{href}/"))
    }
}

/// Persistent shell around every routed page.
#[component]
pub fn AppLayout() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let pathname = use_location().pathname;

    let nickname = move || {
        app_state
            .0
            .profile
            .get()
            .map(|p| p.nickname)
            .or_else(|| {
                app_state
                    .0
                    .supabase
                    .with(|c| c.session().and_then(|s| s.email.clone()))
            })
    };

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b border-border">
                <div class="mx-auto flex w-full max-w-[1080px] items-center justify-between gap-4 px-4 py-3">
                    <a href="/" class="text-sm font-semibold text-foreground">"파티 보드"</a>
                    <div class="flex items-center gap-2">
                        <ServerStatus />
                        <Show
                            when=move || app_state.0.is_signed_in()
                            fallback=|| view! {
                                <a class="text-xs text-primary underline underline-offset-4" href="/login">"로그인"</a>
                            }
                        >
                            <span class="text-xs text-muted-foreground">{nickname}</span>
                            <a class="text-xs text-muted-foreground hover:text-foreground" href="/blacklist">"블랙리스트"</a>
                        </Show>
                        <a class="text-xs text-muted-foreground hover:text-foreground" href="/settings">"설정"</a>
                    </div>
                </div>
                <nav class="mx-auto flex w-full max-w-[1080px] gap-1 overflow-x-auto px-4 pb-2">
                    {NAV_ITEMS
                        .iter()
                        .map(|(href, label)| {
                            let href = *href;
                            let class = move || {
                                if is_active(&pathname.get(), href) {
                                    "rounded-md bg-accent px-3 py-1.5 text-sm font-medium text-accent-foreground"
                                } else {
                                    "rounded-md px-3 py-1.5 text-sm text-muted-foreground hover:bg-accent"
                                }
                            };
                            view! {
                                <A href=href attr:class=class>
                                    {*label}
                                </A>
                            }
                        })
                        .collect_view()}
                </nav>
            </header>

            <main class="mx-auto w-full max-w-[1080px] px-4 py-6">
                <Outlet />
            </main>
        </div>
    }
}

/// Renders `children` for signed-in users; otherwise a login prompt.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    view! {
        <Show
            when=move || app_state.0.is_signed_in()
            fallback=|| view! {
                <div class="rounded-md border border-border bg-muted p-4 text-sm text-muted-foreground">
                    "로그인이 필요한 메뉴입니다. "
                    <a class="text-primary underline underline-offset-4" href="/login">"로그인하기"</a>
                </div>
            }
        >
            {children()}
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_active_matching() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/trades", "/"));
        assert!(is_active("/trades", "/trades"));
        assert!(is_active("/trades/12", "/trades"));
        assert!(!is_active("/tradesx", "/trades"));
    }
}
