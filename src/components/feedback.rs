use crate::components::ui::{
    Alert, AlertDescription, AlertTitle, Button, ButtonSize, ButtonVariant, Skeleton,
};
use leptos::prelude::*;

/// Failed load with the error message and a retry button.
#[component]
pub fn ErrorState(#[prop(into)] message: Signal<String>, on_retry: Callback<()>) -> impl IntoView {
    view! {
        <Alert class="flex items-start justify-between gap-4 border-destructive/30">
            <div class="space-y-1">
                <AlertTitle class="text-destructive">"불러오지 못했습니다"</AlertTitle>
                <AlertDescription class="text-xs text-destructive">{move || message.get()}</AlertDescription>
            </div>
            <Button
                variant=ButtonVariant::Outline
                size=ButtonSize::Sm
                on:click=move |_| on_retry.run(())
            >
                "다시 시도"
            </Button>
        </Alert>
    }
}

/// Inline error under a form.
#[component]
pub fn FormError(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
            <Alert class="border-destructive/30">
                <AlertDescription class="text-destructive">
                    {move || error.get().unwrap_or_default()}
                </AlertDescription>
            </Alert>
        </Show>
    }
}

#[component]
pub fn ListSkeleton(#[prop(default = 3)] rows: usize) -> impl IntoView {
    view! {
        <div class="space-y-2" aria-busy="true">
            {(0..rows)
                .map(|_| {
                    view! {
                        <div class="space-y-2 rounded-md border border-border p-3">
                            <Skeleton class="h-4 w-1/3" />
                            <Skeleton class="h-3 w-2/3" />
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn EmptyState(#[prop(into)] text: String) -> impl IntoView {
    view! {
        <div class="rounded-md border border-border bg-muted p-4 text-sm text-muted-foreground">
            {text}
        </div>
    }
}
