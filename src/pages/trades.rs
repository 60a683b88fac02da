use super::RequireAuth;
use crate::calc::{format_amount, parse_amount};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader,
    CardTitle, Input, Label, NativeSelect, Spinner, Textarea,
};
use crate::components::{
    EmptyState, ErrorState, FormError, ListSkeleton, TradeKindBadge, TradeStatusBadge,
};
use crate::models::{display_name, Trade, TradeKind, TradeStatus};
use crate::state::AppContext;
use crate::util::{non_empty, short_timestamp};
use leptos::prelude::*;
use leptos::task::spawn_local;

const ALL_STATUSES: [TradeStatus; 3] = [
    TradeStatus::Active,
    TradeStatus::Reserved,
    TradeStatus::Completed,
];

pub(crate) fn kind_from_filter(value: &str) -> Option<TradeKind> {
    match value {
        "buy" => Some(TradeKind::Buy),
        "sell" => Some(TradeKind::Sell),
        _ => None,
    }
}

fn kind_options() -> Vec<(String, String)> {
    [TradeKind::Sell, TradeKind::Buy]
        .into_iter()
        .map(|k| (k.column_value().to_string(), k.to_string()))
        .collect()
}

/// Optional quantity field; blank means unspecified.
pub(crate) fn parse_quantity(text: &str) -> Result<Option<i32>, String> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(None);
    }
    match t.parse::<i32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err("수량은 1 이상의 숫자로 입력해 주세요.".to_string()),
    }
}

#[component]
fn NewTradeForm(on_created: Callback<Trade>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let kind = RwSignal::new("sell".to_string());
    let item_name = RwSignal::new(String::new());
    let price = RwSignal::new(String::new());
    let quantity = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(kind_val) = kind_from_filter(&kind.get()) else {
            error.set(Some("거래 종류를 선택해 주세요.".to_string()));
            return;
        };
        let item = item_name.get().trim().to_string();
        if item.is_empty() {
            error.set(Some("아이템 이름을 입력해 주세요.".to_string()));
            return;
        }
        let Some(price_val) = parse_amount(&price.get()).and_then(|p| i64::try_from(p).ok())
        else {
            error.set(Some("가격을 숫자로 입력해 주세요.".to_string()));
            return;
        };
        let quantity_val = match parse_quantity(&quantity.get()) {
            Ok(q) => q,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };

        let client = app_state.0.supabase.get_untracked();
        let description_val = non_empty(&description.get());
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match client
                .create_trade(kind_val, &item, price_val, quantity_val, description_val)
                .await
            {
                Ok(row) => {
                    item_name.set(String::new());
                    price.set(String::new());
                    quantity.set(String::new());
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
                <CardTitle class="text-sm">"거래글 쓰기"</CardTitle>
            </CardHeader>
            <CardContent>
                <form class="grid gap-3 sm:grid-cols-4" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="trade-kind">"종류"</Label>
                        <NativeSelect id="trade-kind" options=kind_options() bind_value=kind />
                    </div>
                    <div class="flex flex-col gap-1.5 sm:col-span-3">
                        <Label html_for="trade-item">"아이템"</Label>
                        <Input id="trade-item" bind_value=item_name required=true />
                    </div>
                    <div class="flex flex-col gap-1.5 sm:col-span-2">
                        <Label html_for="trade-price">"가격"</Label>
                        <Input id="trade-price" inputmode="numeric" bind_value=price placeholder="1,000,000" />
                    </div>
                    <div class="flex flex-col gap-1.5 sm:col-span-2">
                        <Label html_for="trade-qty">"수량"</Label>
                        <Input id="trade-qty" r#type="number" bind_value=quantity placeholder="선택 사항" />
                    </div>
                    <div class="flex flex-col gap-1.5 sm:col-span-4">
                        <Label html_for="trade-desc">"설명"</Label>
                        <Textarea id="trade-desc" rows=2 bind_value=description />
                    </div>
                    <div class="sm:col-span-4">
                        <FormError error=error />
                    </div>
                    <div class="sm:col-span-4">
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
pub fn TradesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let rows: RwSignal<Vec<Trade>> = RwSignal::new(vec![]);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let action_error: RwSignal<Option<String>> = RwSignal::new(None);
    let filter = RwSignal::new(String::new());

    let load = move || {
        let client = app_state.0.supabase.get_untracked();
        let kind = kind_from_filter(&filter.get_untracked());
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match client.list_trades(kind).await {
                Ok(list) => rows.set(list),
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        filter.track();
        load();
    });

    let set_status = move |id: i64, status: TradeStatus| {
        let client = app_state.0.supabase.get_untracked();
        action_error.set(None);
        spawn_local(async move {
            match client.set_trade_status(id, status).await {
                Ok(()) => rows.update(|list| {
                    if let Some(t) = list.iter_mut().find(|t| t.id == id) {
                        t.status = status;
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
            match client.delete_trade(id).await {
                Ok(()) => rows.update(|list| list.retain(|t| t.id != id)),
                Err(e) => action_error.set(app_state.0.handle_error(e)),
            }
        });
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
                    <h1 class="text-xl font-semibold">"거래"</h1>
                    <p class="text-xs text-muted-foreground">"아이템을 사고팝니다."</p>
                </div>
                <NativeSelect placeholder="전체" options=kind_options() bind_value=filter />
            </div>

            <RequireAuth>
                <NewTradeForm on_created=Callback::new(move |row: Trade| {
                    let shown = kind_from_filter(&filter.get_untracked()).is_none_or(|k| k == row.kind);
                    if shown {
                        rows.update(|list| list.insert(0, row));
                    }
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
                        when=move || rows.with(|list| !list.is_empty())
                        fallback=|| view! { <EmptyState text="등록된 거래글이 없습니다." /> }
                    >
                        <div class="space-y-2">
                            {move || {
                                let me = my_id();
                                rows.get()
                                    .into_iter()
                                    .map(|t| {
                                        let id = t.id;
                                        let owned = me.as_deref() == Some(t.user_id.as_str());
                                        let current = t.status;
                                        let author = display_name(&t.author, &t.user_id);
                                        let amount = match t.quantity {
                                            Some(q) => format!("{}원 · {q}개", format_amount(t.price.max(0) as u64)),
                                            None => format!("{}원", format_amount(t.price.max(0) as u64)),
                                        };
                                        view! {
                                            <Card>
                                                <CardHeader>
                                                    <div class="flex w-full items-center gap-2">
                                                        <TradeKindBadge kind=t.kind />
                                                        <CardTitle class="flex-1 text-sm">{t.item_name.clone()}</CardTitle>
                                                        <TradeStatusBadge status=current />
                                                    </div>
                                                    <CardDescription>{amount}</CardDescription>
                                                </CardHeader>
                                                <CardContent class="space-y-1">
                                                    {t.description.clone().map(|d| view! {
                                                        <p class="whitespace-pre-line text-sm">{d}</p>
                                                    })}
                                                    <p class="text-xs text-muted-foreground">
                                                        {format!("{author} · {}", short_timestamp(&t.created_at))}
                                                    </p>
                                                </CardContent>
                                                {owned.then(|| view! {
                                                    <CardFooter>
                                                        {ALL_STATUSES
                                                            .into_iter()
                                                            .filter(|s| *s != current)
                                                            .map(|s| view! {
                                                                <Button
                                                                    variant=ButtonVariant::Outline
                                                                    size=ButtonSize::Xs
                                                                    on:click=move |_| set_status(id, s)
                                                                >
                                                                    {s.to_string()}
                                                                </Button>
                                                            })
                                                            .collect_view()}
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filter() {
        assert_eq!(kind_from_filter("buy"), Some(TradeKind::Buy));
        assert_eq!(kind_from_filter("sell"), Some(TradeKind::Sell));
        assert_eq!(kind_from_filter(""), None);
        assert_eq!(kind_from_filter("trade"), None);
    }

    #[test]
    fn test_kind_options_use_column_values() {
        let opts = kind_options();
        assert_eq!(opts[0], ("sell".to_string(), "팝니다".to_string()));
        assert_eq!(opts[1], ("buy".to_string(), "삽니다".to_string()));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(""), Ok(None));
        assert_eq!(parse_quantity(" 5 "), Ok(Some(5)));
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("다섯").is_err());
    }
}
