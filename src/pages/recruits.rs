use crate::api::notion::{
    PROP_CAPACITY, PROP_CATEGORY, PROP_DESCRIPTION, PROP_SCHEDULE, PROP_STATUS, PROP_TAGS,
    PROP_TITLE,
};
use crate::api::{group_by_select, RecruitmentEntry};
use crate::components::ui::{Card, CardContent, CardDescription, CardHeader, CardTitle};
use crate::components::{EmptyState, ErrorState, LabelBadge, ListSkeleton, TagBadge};
use crate::state::AppContext;
use crate::util::LoadGeneration;
use leptos::prelude::*;
use leptos::task::spawn_local;

const UNCATEGORIZED: &str = "기타";

#[component]
fn RecruitCard(entry: RecruitmentEntry) -> impl IntoView {
    let title = entry.text(PROP_TITLE);
    let title = if title.trim().is_empty() {
        "(제목 없음)".to_string()
    } else {
        title
    };
    let status = entry.select(PROP_STATUS);
    let description = entry.text(PROP_DESCRIPTION);
    let schedule = entry.date(PROP_SCHEDULE);
    let capacity = entry.number(PROP_CAPACITY).map(|n| format!("{n}명"));
    let tags = entry.multi_select(PROP_TAGS);
    let href = entry.url.clone();

    let meta = [schedule, capacity]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");

    view! {
        <Card>
            <CardHeader>
                <div class="flex w-full items-center justify-between gap-2">
                    <CardTitle class="text-sm">
                        {match href {
                            Some(h) => view! {
                                <a href=h target="_blank" rel="noopener" class="hover:underline">{title}</a>
                            }.into_any(),
                            None => view! { <span>{title}</span> }.into_any(),
                        }}
                    </CardTitle>
                    {status.map(|s| view! { <LabelBadge label=s /> })}
                </div>
                {(!meta.is_empty()).then(|| view! { <CardDescription>{meta}</CardDescription> })}
            </CardHeader>
            <CardContent class="space-y-2">
                {(!description.is_empty())
                    .then(|| view! { <p class="whitespace-pre-line text-sm">{description}</p> })}
                <div class="flex flex-wrap gap-1">
                    {tags.into_iter().map(|t| view! { <TagBadge label=t /> }).collect_view()}
                </div>
            </CardContent>
        </Card>
    }
}

/// Recruitment listing from the Notion database, grouped by category.
#[component]
pub fn RecruitsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let entries: RwSignal<Vec<RecruitmentEntry>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    // An endpoint change can land while the previous list is still loading.
    let generation = StoredValue::new(LoadGeneration::default());

    let load = move || {
        let client = app_state.0.notion();
        let current = generation
            .try_update_value(|g| g.begin())
            .unwrap_or_default();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            let result = client.list_recruits().await;
            if !generation
                .try_with_value(|g| g.is_current(current))
                .unwrap_or(false)
            {
                return;
            }
            match result {
                Ok(rows) => entries.set(rows),
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    // Reload on mount and whenever the endpoint changes.
    Effect::new(move |_| {
        app_state.0.monitor.endpoint();
        load();
    });

    let groups = move || entries.with(|rows| group_by_select(rows, PROP_CATEGORY, UNCATEGORIZED));

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"모집 공고"</h1>
                <p class="text-xs text-muted-foreground">"길드와 공대 모집 글을 분류별로 모아 보여줍니다."</p>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <ListSkeleton rows=4 /> }>
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
                        when=move || entries.with(|rows| !rows.is_empty())
                        fallback=|| view! { <EmptyState text="등록된 모집 공고가 없습니다." /> }
                    >
                        {move || {
                            groups()
                                .into_iter()
                                .map(|(category, items)| {
                                    view! {
                                        <section class="space-y-2">
                                            <h2 class="text-sm font-semibold">
                                                {category}
                                                <span class="ml-1 text-xs font-normal text-muted-foreground">
                                                    {format!("{}건", items.len())}
                                                </span>
                                            </h2>
                                            <div class="grid gap-2 sm:grid-cols-2">
                                                {items
                                                    .into_iter()
                                                    .map(|entry| view! { <RecruitCard entry=entry /> })
                                                    .collect_view()}
                                            </div>
                                        </section>
                                    }
                                })
                                .collect_view()
                        }}
                    </Show>
                </Show>
            </Show>
        </div>
    }
}
