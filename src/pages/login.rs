use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, Card, CardContent, CardDescription, CardHeader,
    CardTitle, Input, Label, Spinner,
};
use crate::state::AppContext;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get().trim().to_string();
        let password_val = password.get();
        let mut client = app_state.0.supabase.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match client.sign_in(&email_val, &password_val).await {
                Ok(session) => {
                    let user_id = session.user_id.clone();
                    client.set_session(session);
                    client.save_to_storage();

                    let profile = match client.get_profile(&user_id).await {
                        Ok(p) => p,
                        Err(e) => {
                            warn!("profile lookup after sign-in failed: {e}");
                            None
                        }
                    };
                    let next = if profile.is_some() { "/" } else { "/settings" };

                    app_state.0.supabase.set(client);
                    app_state.0.set_profile(profile);
                    let _ = window().location().set_href(next);
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="mx-auto flex w-full max-w-sm flex-col justify-center py-10">
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"로그인"</CardTitle>
                    <CardDescription>"이메일과 비밀번호로 로그인하세요."</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="email">"이메일"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="you@example.com"
                                bind_value=email
                                required=true
                                class="h-8"
                            />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="password">"비밀번호"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="••••••••"
                                bind_value=password
                                required=true
                                class="h-8"
                            />
                        </div>

                        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                error.get().map(|e| {
                                    view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">
                                                {e}
                                            </AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}
                        </Show>

                        <Button
                            class="w-full"
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "로그인 중..." } else { "로그인" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}
