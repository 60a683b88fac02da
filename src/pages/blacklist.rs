use super::RequireAuth;
use crate::api::ApiError;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardTitle, Input, Label,
    Spinner,
};
use crate::components::{EmptyState, ErrorState, FormError, ListSkeleton};
use crate::models::{display_name, BlacklistEntry};
use crate::state::AppContext;
use crate::util::{non_empty, short_timestamp};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn BlacklistPage() -> impl IntoView {
    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"블랙리스트"</h1>
                <p class="text-xs text-muted-foreground">"비매너 유저를 기록해 두고 파티와 거래에서 피하세요."</p>
            </div>
            <RequireAuth>
                <BlacklistPanel />
            </RequireAuth>
        </div>
    }
}

#[component]
fn BlacklistPanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let rows: RwSignal<Vec<BlacklistEntry>> = RwSignal::new(vec![]);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let nickname = RwSignal::new(String::new());
    let reason = RwSignal::new(String::new());
    let form_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);

    let load = move || {
        let client = app_state.0.supabase.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match client.list_blacklist().await {
                Ok(list) => rows.set(list),
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
            loading.set(false);
        });
    };
    load();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let target = nickname.get().trim().to_string();
        if target.is_empty() {
            form_error.set(Some("닉네임을 입력해 주세요.".to_string()));
            return;
        }
        let client = app_state.0.supabase.get_untracked();
        if app_state
            .0
            .profile
            .with_untracked(|p| p.as_ref().is_some_and(|p| p.nickname == target))
        {
            form_error.set(Some("자기 자신은 등록할 수 없습니다.".to_string()));
            return;
        }

        let reason_val = non_empty(&reason.get());
        saving.set(true);
        form_error.set(None);
        spawn_local(async move {
            let result = match client.find_profile_by_nickname(&target).await {
                Ok(Some(profile)) => client
                    .add_to_blacklist(&profile.id, reason_val)
                    .await
                    .map(Some),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            };
            match result {
                Ok(Some(entry)) => {
                    nickname.set(String::new());
                    reason.set(String::new());
                    rows.update(|list| list.insert(0, entry));
                }
                Ok(None) => form_error.set(Some(format!("'{target}' 닉네임을 찾을 수 없습니다."))),
                // Shown verbatim; never treated as a session problem.
                Err(e @ ApiError::AlreadyBlacklisted) => form_error.set(Some(e.to_string())),
                Err(e) => form_error.set(app_state.0.handle_error(e)),
            }
            saving.set(false);
        });
    };

    let remove = move |id: i64| {
        let client = app_state.0.supabase.get_untracked();
        spawn_local(async move {
            match client.remove_from_blacklist(id).await {
                Ok(()) => rows.update(|list| list.retain(|e| e.id != id)),
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
        });
    };

    view! {
        <div class="space-y-4">
            <Card>
                <CardHeader>
                    <CardTitle class="text-sm">"유저 등록"</CardTitle>
                </CardHeader>
                <CardContent>
                    <form class="grid gap-3 sm:grid-cols-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="bl-nick">"닉네임"</Label>
                            <Input id="bl-nick" bind_value=nickname required=true />
                        </div>
                        <div class="flex flex-col gap-1.5 sm:col-span-2">
                            <Label html_for="bl-reason">"사유"</Label>
                            <Input id="bl-reason" bind_value=reason placeholder="선택 사항" />
                        </div>
                        <div class="sm:col-span-3">
                            <FormError error=form_error />
                        </div>
                        <div class="sm:col-span-3">
                            <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                                <Show when=move || saving.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                "등록"
                            </Button>
                        </div>
                    </form>
                </CardContent>
            </Card>

            <Show when=move || !loading.get() fallback=|| view! { <ListSkeleton rows=2 /> }>
                <Show
                    when=move || error.get().is_none()
                    fallback=move || view! {
                        <ErrorState
                            message=Signal::derive(move || error.get().unwrap_or_default())
                            on_retry=Callback::new(move |_| load())
                        />
                    }
                >
                    <Show
                        when=move || rows.with(|list| !list.is_empty())
                        fallback=|| view! { <EmptyState text="등록된 유저가 없습니다." /> }
                    >
                        <div class="space-y-1">
                            {move || {
                                rows.get()
                                    .into_iter()
                                    .map(|e| {
                                        let id = e.id;
                                        view! {
                                            <div class="flex items-center justify-between gap-2 rounded-md border border-border px-3 py-2">
                                                <div class="min-w-0">
                                                    <div class="truncate text-sm font-medium">
                                                        {display_name(&e.blocked, &e.blocked_id)}
                                                    </div>
                                                    <div class="truncate text-xs text-muted-foreground">
                                                        {match &e.reason {
                                                            Some(r) => format!("{r} · {}", short_timestamp(&e.created_at)),
                                                            None => short_timestamp(&e.created_at),
                                                        }}
                                                    </div>
                                                </div>
                                                <Button
                                                    variant=ButtonVariant::Ghost
                                                    size=ButtonSize::Xs
                                                    on:click=move |_| remove(id)
                                                >
                                                    "해제"
                                                </Button>
                                            </div>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </div>
                    </Show>
                </Show>
            </Show>
        </div>
    }
}
