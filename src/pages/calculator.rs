use crate::calc::{format_amount, parse_amount, split_loot, LootSplit};
use crate::components::ui::{Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label};
use leptos::prelude::*;

const DEFAULT_FEE_PERCENT: &str = "5";

/// Split from raw field text; `None` while any field is invalid.
pub(crate) fn split_from_inputs(total: &str, members: &str, fee: &str) -> Option<LootSplit> {
    let total = parse_amount(total)?;
    let members: u32 = members.trim().parse().ok()?;
    let fee: f64 = fee.trim().parse().ok()?;
    split_loot(total, members, fee)
}

#[component]
pub fn CalculatorPage() -> impl IntoView {
    let total = RwSignal::new(String::new());
    let members = RwSignal::new("4".to_string());
    let fee = RwSignal::new(DEFAULT_FEE_PERCENT.to_string());

    let result = move || split_from_inputs(&total.get(), &members.get(), &fee.get());

    let row = |label: &'static str, value: String| {
        view! {
            <div class="flex items-center justify-between border-b border-border py-1.5 text-sm last:border-b-0">
                <span class="text-muted-foreground">{label}</span>
                <span class="font-medium tabular-nums">{value}</span>
            </div>
        }
    };

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"분배 계산기"</h1>
                <p class="text-xs text-muted-foreground">"판매 금액에서 거래소 수수료를 빼고 파티원 수로 나눕니다."</p>
            </div>

            <Card class="max-w-md">
                <CardHeader>
                    <CardTitle class="text-sm">"입력"</CardTitle>
                    <CardDescription>"수수료는 0에서 100 사이의 퍼센트입니다."</CardDescription>
                </CardHeader>
                <CardContent class="flex flex-col gap-3">
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="calc-total">"판매 금액"</Label>
                        <Input id="calc-total" inputmode="numeric" placeholder="1,000,000" bind_value=total />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="calc-members">"인원"</Label>
                        <Input id="calc-members" r#type="number" bind_value=members />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="calc-fee">"수수료 (%)"</Label>
                        <Input id="calc-fee" inputmode="decimal" bind_value=fee />
                    </div>
                </CardContent>
            </Card>

            <Card class="max-w-md">
                <CardHeader>
                    <CardTitle class="text-sm">"결과"</CardTitle>
                </CardHeader>
                <CardContent>
                    {move || match result() {
                        Some(s) => view! {
                            <div>
                                {row("수수료", format_amount(s.fee))}
                                {row("실수령액", format_amount(s.net))}
                                {row("1인당", format_amount(s.per_member))}
                                {row("나머지", format_amount(s.remainder))}
                            </div>
                        }
                        .into_any(),
                        None => view! {
                            <p class="text-xs text-muted-foreground">"금액, 인원(1명 이상), 수수료(0~100)를 입력하세요."</p>
                        }
                        .into_any(),
                    }}
                </CardContent>
            </Card>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_from_inputs() {
        let s = split_from_inputs("1,000", "3", "10").expect("valid");
        assert_eq!((s.fee, s.per_member, s.remainder), (100, 300, 0));
    }

    #[test]
    fn test_split_from_inputs_rejects_bad_fields() {
        assert!(split_from_inputs("", "3", "10").is_none());
        assert!(split_from_inputs("1000", "0", "10").is_none());
        assert!(split_from_inputs("1000", "셋", "10").is_none());
        assert!(split_from_inputs("1000", "3", "101").is_none());
    }
}
