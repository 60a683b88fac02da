use super::RequireAuth;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader,
    CardTitle, Input, Label, Spinner, Textarea,
};
use crate::components::{EmptyState, ErrorState, FormError, ListSkeleton, RecruitStatusBadge};
use crate::models::{display_name, PartyRecruit, RecruitStatus};
use crate::state::AppContext;
use crate::util::{non_empty, short_timestamp};
use leptos::prelude::*;
use leptos::task::spawn_local;

const MIN_MEMBERS: i32 = 2;
const MAX_MEMBERS: i32 = 30;

/// Validates the "max members" field.
pub(crate) fn parse_max_members(text: &str) -> Result<i32, String> {
    let n: i32 = text
        .trim()
        .parse()
        .map_err(|_| "모집 인원은 숫자로 입력해 주세요.".to_string())?;
    if !(MIN_MEMBERS..=MAX_MEMBERS).contains(&n) {
        return Err(format!(
            "모집 인원은 {MIN_MEMBERS}명에서 {MAX_MEMBERS}명 사이여야 합니다."
        ));
    }
    Ok(n)
}

#[component]
fn NewPartyForm(on_created: Callback<PartyRecruit>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let title = RwSignal::new(String::new());
    let dungeon = RwSignal::new(String::new());
    let difficulty = RwSignal::new(String::new());
    let max_members = RwSignal::new("4".to_string());
    let description = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let members = match parse_max_members(&max_members.get()) {
            Ok(n) => n,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        let title_val = title.get().trim().to_string();
        let dungeon_val = dungeon.get().trim().to_string();
        if title_val.is_empty() || dungeon_val.is_empty() {
            error.set(Some("제목과 던전을 입력해 주세요.".to_string()));
            return;
        }

        let client = app_state.0.supabase.get_untracked();
        let difficulty_val = non_empty(&difficulty.get());
        let description_val = non_empty(&description.get());
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match client
                .create_party_recruit(
                    &title_val,
                    &dungeon_val,
                    difficulty_val,
                    members,
                    description_val,
                )
                .await
            {
                Ok(row) => {
                    title.set(String::new());
                    description.set(String::new());
                    on_created.run(row);
                }
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-sm">"파티 모집하기"</CardTitle>
            </CardHeader>
            <CardContent>
                <form class="grid gap-3 sm:grid-cols-2" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5 sm:col-span-2">
                        <Label html_for="party-title">"제목"</Label>
                        <Input id="party-title" bind_value=title required=true placeholder="예) 빙하 동굴 클리어 파티" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="party-dungeon">"던전"</Label>
                        <Input id="party-dungeon" bind_value=dungeon required=true />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="party-difficulty">"난이도"</Label>
                        <Input id="party-difficulty" bind_value=difficulty placeholder="선택 사항" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="party-max">"모집 인원"</Label>
                        <Input id="party-max" r#type="number" inputmode="numeric" bind_value=max_members />
                    </div>
                    <div class="flex flex-col gap-1.5 sm:col-span-2">
                        <Label html_for="party-desc">"설명"</Label>
                        <Textarea id="party-desc" rows=3 bind_value=description />
                    </div>
                    <div class="sm:col-span-2">
                        <FormError error=error />
                    </div>
                    <div class="sm:col-span-2">
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
    }
}

#[component]
pub fn PartiesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let rows: RwSignal<Vec<PartyRecruit>> = RwSignal::new(vec![]);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let action_error: RwSignal<Option<String>> = RwSignal::new(None);
    let show_closed = RwSignal::new(false);

    let load = move || {
        let client = app_state.0.supabase.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match client.list_party_recruits().await {
                Ok(list) => rows.set(list),
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
            loading.set(false);
        });
    };
    load();

    let set_status = move |id: i64, status: RecruitStatus| {
        let client = app_state.0.supabase.get_untracked();
        action_error.set(None);
        spawn_local(async move {
            match client.set_party_recruit_status(id, status).await {
                Ok(()) => rows.update(|list| {
                    if let Some(r) = list.iter_mut().find(|r| r.id == id) {
                        r.status = status;
                    }
                }),
                Err(e) => action_error.set(app_state.0.handle_error(e)),
            }
        });
    };

    let remove = move |id: i64| {
        let client = app_state.0.supabase.get_untracked();
        action_error.set(None);
        spawn_local(async move {
            match client.delete_party_recruit(id).await {
                Ok(()) => rows.update(|list| list.retain(|r| r.id != id)),
                Err(e) => action_error.set(app_state.0.handle_error(e)),
            }
        });
    };

    let visible = move || {
        let include_closed = show_closed.get();
        rows.get()
            .into_iter()
            .filter(|r| include_closed || r.status == RecruitStatus::Open)
            .collect::<Vec<_>>()
    };

    let my_id = move || {
        app_state
            .0
            .supabase
            .with(|c| c.user_id().map(|s| s.to_string()))
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-end justify-between gap-2">
                <div class="space-y-1">
                    <h1 class="text-xl font-semibold">"파티 찾기"</h1>
                    <p class="text-xs text-muted-foreground">"함께 던전을 돌 파티원을 모집합니다."</p>
                </div>
                <label class="flex items-center gap-2 text-xs text-muted-foreground">
                    <input
                        type="checkbox"
                        prop:checked=move || show_closed.get()
                        on:change=move |_| show_closed.update(|v| *v = !*v)
                    />
                    "모집 완료 포함"
                </label>
            </div>

            <RequireAuth>
                <NewPartyForm on_created=Callback::new(move |row: PartyRecruit| {
                    rows.update(|list| list.insert(0, row));
                }) />
            </RequireAuth>

            <FormError error=action_error />

            <Show when=move || !loading.get() fallback=|| view! { <ListSkeleton /> }>
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
                        when=move || !visible().is_empty()
                        fallback=|| view! { <EmptyState text="모집 중인 파티가 없습니다." /> }
                    >
                        <div class="grid gap-2 sm:grid-cols-2">
                            {move || {
                                let me = my_id();
                                visible()
                                    .into_iter()
                                    .map(|r| {
                                        let id = r.id;
                                        let owned = me.as_deref() == Some(r.user_id.as_str());
                                        let full = r.is_full();
                                        let status = r.status;
                                        let author = display_name(&r.author, &r.user_id);
                                        let meta = match &r.difficulty {
                                            Some(d) => format!("{} · {}", r.dungeon, d),
                                            None => r.dungeon.clone(),
                                        };
                                        view! {
                                            <Card>
                                                <CardHeader>
                                                    <div class="flex w-full items-center justify-between gap-2">
                                                        <CardTitle class="text-sm">{r.title.clone()}</CardTitle>
                                                        <RecruitStatusBadge status=status full=full />
                                                    </div>
                                                    <CardDescription>
                                                        {format!("{meta} · {}/{}명", r.current_members, r.max_members)}
                                                    </CardDescription>
                                                </CardHeader>
                                                <CardContent class="space-y-1">
                                                    {r.description.clone().map(|d| view! {
                                                        <p class="whitespace-pre-line text-sm">{d}</p>
                                                    })}
                                                    <p class="text-xs text-muted-foreground">
                                                        {format!("{author} · {}", short_timestamp(&r.created_at))}
                                                    </p>
                                                </CardContent>
                                                {owned.then(|| view! {
                                                    <CardFooter>
                                                        {match status {
                                                            RecruitStatus::Open => view! {
                                                                <Button
                                                                    variant=ButtonVariant::Outline
                                                                    size=ButtonSize::Xs
                                                                    on:click=move |_| set_status(id, RecruitStatus::Closed)
                                                                >
                                                                    "모집 마감"
                                                                </Button>
                                                            }.into_any(),
                                                            RecruitStatus::Closed => view! {
                                                                <Button
                                                                    variant=ButtonVariant::Outline
                                                                    size=ButtonSize::Xs
                                                                    on:click=move |_| set_status(id, RecruitStatus::Open)
                                                                >
                                                                    "다시 모집"
                                                                </Button>
                                                            }.into_any(),
                                                        }}
                                                        <Button
                                                            variant=ButtonVariant::Ghost
                                                            size=ButtonSize::Xs
                                                            class="text-destructive"
                                                            on:click=move |_| remove(id)
                                                        >
                                                            "삭제"
                                                        </Button>
                                                    </CardFooter>
                                                })}
                                            </Card>
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
