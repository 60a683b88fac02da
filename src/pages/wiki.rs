use crate::components::EmptyState;
use crate::state::AppContext;
use crate::wiki::{resolve_segments, GuideSegment};
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

fn render_line(segments: Vec<GuideSegment>) -> impl IntoView {
    segments
        .into_iter()
        .map(|seg| match seg {
            GuideSegment::Text(t) => view! { <span>{t}</span> }.into_any(),
            GuideSegment::Reference { label, href } => view! {
                <a href=href class="text-primary underline underline-offset-4">{label}</a>
            }
            .into_any(),
            GuideSegment::Unresolved(name) => view! {
                <span class="text-muted-foreground" title="등록되지 않은 항목">{name}</span>
            }
            .into_any(),
        })
        .collect_view()
}

/// Bundled guides. `?guide=<slug>` selects one; defaults to the first.
#[component]
pub fn WikiPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.reference;
    let query_map = use_query_map();

    let guides = store.with_value(|s| {
        s.guides()
            .iter()
            .map(|g| (g.slug.clone(), g.title.clone()))
            .collect::<Vec<_>>()
    });

    let current_slug = move || {
        query_map
            .get()
            .get("guide")
            .or_else(|| store.with_value(|s| s.guides().first().map(|g| g.slug.clone())))
    };

    let article = move || {
        let slug = current_slug()?;
        store.with_value(|s| {
            let guide = s.find_guide(&slug)?;
            let lines: Vec<Vec<GuideSegment>> = guide
                .body
                .lines()
                .map(|line| resolve_segments(line, s))
                .collect();
            Some((guide.title.clone(), lines))
        })
    };

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"위키"</h1>
                <p class="text-xs text-muted-foreground">"공략 문서의 링크를 누르면 NPC · 맵 검색으로 이동합니다."</p>
            </div>

            <div class="grid gap-4 md:grid-cols-[200px_1fr]">
                <nav class="flex flex-col gap-1">
                    {guides
                        .into_iter()
                        .map(|(slug, title)| {
                            let href = format!("/wiki?guide={}", urlencoding::encode(&slug));
                            let class = move || {
                                if current_slug().as_deref() == Some(slug.as_str()) {
                                    "rounded-md bg-accent px-3 py-1.5 text-sm font-medium"
                                } else {
                                    "rounded-md px-3 py-1.5 text-sm text-muted-foreground hover:bg-accent"
                                }
                            };
                            view! { <a href=href class=class>{title}</a> }
                        })
                        .collect_view()}
                </nav>

                {move || match article() {
                    Some((title, lines)) => view! {
                        <article class="space-y-2">
                            <h2 class="text-lg font-semibold">{title}</h2>
                            {lines
                                .into_iter()
                                .map(|segs| {
                                    if segs.is_empty() {
                                        view! { <div class="h-2"></div> }.into_any()
                                    } else {
                                        view! { <p class="text-sm leading-relaxed">{render_line(segs)}</p> }.into_any()
                                    }
                                })
                                .collect_view()}
                        </article>
                    }
                    .into_any(),
                    None => view! { <EmptyState text="문서를 찾을 수 없습니다." /> }.into_any(),
                }}
            </div>
        </div>
    }
}
