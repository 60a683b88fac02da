use crate::components::ui::{Badge, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, NativeSelect};
use crate::components::{EmptyState, TagBadge};
use crate::reference::{MapEntry, NpcEntry, ReferenceStore};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

/// Maps matching the name query and both dropdowns (blank = any).
pub(crate) fn visible_maps(
    store: &ReferenceStore,
    query: &str,
    continent: &str,
    map_type: &str,
) -> Vec<MapEntry> {
    let by_continent = (!continent.is_empty()).then(|| store.filter_maps_by_continent(continent));
    let by_type = (!map_type.is_empty()).then(|| store.filter_maps_by_type(map_type));
    store
        .search_maps(query)
        .into_iter()
        .filter(|m| by_continent.as_ref().is_none_or(|list| list.iter().any(|x| x.id == m.id)))
        .filter(|m| by_type.as_ref().is_none_or(|list| list.iter().any(|x| x.id == m.id)))
        .cloned()
        .collect()
}

fn owned_options(values: Vec<&str>) -> Vec<(String, String)> {
    values
        .into_iter()
        .map(|v| (v.to_string(), v.to_string()))
        .collect()
}

fn map_line(m: &MapEntry) -> String {
    match &m.level_range {
        Some(lv) => format!("{} · {} · Lv. {lv}", m.continent, m.map_type),
        None => format!("{} · {}", m.continent, m.map_type),
    }
}

#[component]
fn NpcRow(npc: NpcEntry, #[prop(into)] location: String) -> impl IntoView {
    view! {
        <div class="space-y-1 rounded-md border border-border px-3 py-2">
            <div class="flex items-center justify-between gap-2">
                <span class="text-sm font-medium">{npc.name}</span>
                <span class="text-xs text-muted-foreground">{location}</span>
            </div>
            <p class="text-xs text-muted-foreground">{npc.description}</p>
            <div class="flex flex-wrap gap-1">
                {npc.tags.into_iter().map(|t| view! { <TagBadge label=t /> }).collect_view()}
            </div>
        </div>
    }
}

/// NPC/map lookup over the bundled dataset. `?q=` pre-fills the search and
/// `?map=<id>` opens a map.
#[component]
pub fn ReferencePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.reference;
    let query_map = use_query_map();

    let query = RwSignal::new(String::new());
    let continent = RwSignal::new(String::new());
    let map_type = RwSignal::new(String::new());
    let selected: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let params = query_map.get();
        if let Some(q) = params.get("q") {
            query.set(q);
        }
        selected.set(params.get("map").filter(|id| !id.is_empty()));
    });

    let continent_options = store.with_value(|s| owned_options(s.continents()));
    let type_options = store.with_value(|s| owned_options(s.map_types()));

    let maps = move || {
        store.with_value(|s| {
            visible_maps(s, query.get().trim(), &continent.get(), &map_type.get())
        })
    };
    let npcs = move || {
        let q = query.get();
        let q = q.trim();
        if q.is_empty() {
            return vec![];
        }
        store.with_value(|s| {
            s.search_npcs(q)
                .into_iter()
                .map(|n| {
                    let location = s
                        .find_map_by_id(&n.map_id)
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| n.map_id.clone());
                    (n.clone(), location)
                })
                .collect::<Vec<_>>()
        })
    };

    let detail = move || {
        let id = selected.get()?;
        store.with_value(|s| {
            let map = s.find_map_by_id(&id)?.clone();
            let residents: Vec<NpcEntry> = s.find_npcs_for_map(&id).into_iter().cloned().collect();
            Some((map, residents))
        })
    };

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"NPC · 맵 검색"</h1>
                <p class="text-xs text-muted-foreground">"맵 이름이나 NPC 이름, 태그로 찾아보세요."</p>
            </div>

            <div class="flex flex-wrap gap-2">
                <Input class="max-w-xs" placeholder="검색어" bind_value=query />
                <NativeSelect placeholder="모든 대륙" options=continent_options bind_value=continent />
                <NativeSelect placeholder="모든 유형" options=type_options bind_value=map_type />
            </div>

            {move || detail().map(|(map, residents)| {
                let name = map.name.clone();
                let line = map_line(&map);
                let location = map.name;
                view! {
                <Card class="border-primary/40">
                    <CardHeader>
                        <div class="flex w-full items-center justify-between gap-2">
                            <CardTitle class="text-base">{name}</CardTitle>
                            <button
                                class="text-xs text-muted-foreground hover:text-foreground"
                                on:click=move |_| selected.set(None)
                            >
                                "닫기"
                            </button>
                        </div>
                        <CardDescription>{line}</CardDescription>
                    </CardHeader>
                    <CardContent class="space-y-2">
                        {if residents.is_empty() {
                            view! { <p class="text-xs text-muted-foreground">"이 맵에는 등록된 NPC가 없습니다."</p> }.into_any()
                        } else {
                            residents
                                .into_iter()
                                .map(|n| view! { <NpcRow npc=n location=location.clone() /> })
                                .collect_view()
                                .into_any()
                        }}
                    </CardContent>
                </Card>
                }
            })}

            <section class="space-y-2">
                <h2 class="text-sm font-semibold">"맵"</h2>
                {move || {
                    let list = maps();
                    if list.is_empty() {
                        return view! { <EmptyState text="조건에 맞는 맵이 없습니다." /> }.into_any();
                    }
                    view! {
                        <div class="grid gap-2 sm:grid-cols-2">
                            {list
                                .into_iter()
                                .map(|m| {
                                    let id = m.id.clone();
                                    let row_class = move || {
                                        if selected.get().as_deref() == Some(id.as_str()) {
                                            "rounded-md border border-primary bg-accent px-3 py-2 text-left"
                                        } else {
                                            "rounded-md border border-border px-3 py-2 text-left hover:bg-accent"
                                        }
                                    };
                                    let id = m.id.clone();
                                    let line = map_line(&m);
                                    let MapEntry { name, map_type, .. } = m;
                                    view! {
                                        <button
                                            class=row_class
                                            on:click=move |_| selected.set(Some(id.clone()))
                                        >
                                            <div class="flex items-center justify-between gap-2">
                                                <span class="text-sm font-medium">{name}</span>
                                                <Badge>{map_type}</Badge>
                                            </div>
                                            <div class="text-xs text-muted-foreground">{line}</div>
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                }}
            </section>

            <Show when=move || !query.get().trim().is_empty() fallback=|| ().into_view()>
                <section class="space-y-2">
                    <h2 class="text-sm font-semibold">"NPC"</h2>
                    {move || {
                        let list = npcs();
                        if list.is_empty() {
                            return view! { <EmptyState text="검색어와 일치하는 NPC가 없습니다." /> }.into_any();
                        }
                        list.into_iter()
                            .map(|(n, location)| view! { <NpcRow npc=n location=location /> })
                            .collect_view()
                            .into_any()
                    }}
                </section>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ReferenceStore {
        ReferenceStore::from_json(
            r#"{
                "maps": [
                    {"id": "m1", "name": "하버 타운", "continent": "아르카디아", "type": "마을"},
                    {"id": "m2", "name": "하버 동굴", "continent": "아르카디아", "type": "던전"},
                    {"id": "m3", "name": "눈보라 협곡", "continent": "북부 설원", "type": "던전"}
                ],
                "npcs": []
            }"#,
        )
        .expect("test dataset parses")
    }

    fn ids(maps: Vec<MapEntry>) -> Vec<String> {
        maps.into_iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_map_line_includes_level_range_when_present() {
        let s = store();
        let town = s.find_map_by_id("m1").expect("m1 exists");
        assert_eq!(map_line(town), "아르카디아 · 마을");

        let mut cave = s.find_map_by_id("m2").expect("m2 exists").clone();
        cave.level_range = Some("25-40".to_string());
        assert_eq!(map_line(&cave), "아르카디아 · 던전 · Lv. 25-40");
    }

    #[test]
    fn test_visible_maps_blank_filters_return_all() {
        assert_eq!(ids(visible_maps(&store(), "", "", "")), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn test_visible_maps_intersects_query_and_filters() {
        let s = store();
        assert_eq!(ids(visible_maps(&s, "하버", "", "던전")), vec!["m2"]);
        assert_eq!(ids(visible_maps(&s, "", "북부 설원", "")), vec!["m3"]);
        assert!(visible_maps(&s, "하버", "북부 설원", "").is_empty());
    }
}
