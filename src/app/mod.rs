use crate::pages::{
    AppLayout, BlacklistPage, CalculatorPage, LoginPage, MessagesPage, PartiesPage, RecruitsPage,
    ReferencePage, SettingsPage, TradesPage, WikiPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{ParentRoute, Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Every page renders inside `AppLayout`, so the connectivity poll
    // survives navigation.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"페이지를 찾을 수 없습니다."</div> }>
                <ParentRoute path=path!("") view=AppLayout>
                    <Route path=path!("") view=RecruitsPage />
                    <Route path=path!("parties") view=PartiesPage />
                    <Route path=path!("trades") view=TradesPage />
                    <Route path=path!("messages") view=MessagesPage />
                    <Route path=path!("blacklist") view=BlacklistPage />
                    <Route path=path!("reference") view=ReferencePage />
                    <Route path=path!("calculator") view=CalculatorPage />
                    <Route path=path!("wiki") view=WikiPage />
                    <Route path=path!("settings") view=SettingsPage />
                    <Route path=path!("login") view=LoginPage />
                </ParentRoute>
            </Routes>
        </Router>
    }
}
