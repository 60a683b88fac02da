use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader,
    CardTitle, Input, Label, Spinner,
};
use crate::components::FormError;
use crate::connectivity::ConnectionStatus;
use crate::notify::{self, NotificationAccess};
use crate::state::AppContext;
use crate::util::non_empty;
use leptos::prelude::*;
use leptos::task::spawn_local;

const NICKNAME_MAX_LEN: usize = 16;

/// Checks that `url` looks like an absolute http(s) URL. Blank is allowed and
/// clears the endpoint.
pub(crate) fn validate_endpoint(url: &str) -> Result<(), String> {
    let url = url.trim();
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err("서버 주소는 http:// 또는 https:// 로 시작해야 합니다.".to_string())
    }
}

pub(crate) fn validate_nickname(nickname: &str) -> Result<(), String> {
    let len = nickname.trim().chars().count();
    if len == 0 {
        return Err("닉네임을 입력해 주세요.".to_string());
    }
    if len > NICKNAME_MAX_LEN {
        return Err(format!("닉네임은 {NICKNAME_MAX_LEN}자 이하로 입력해 주세요."));
    }
    Ok(())
}

#[component]
fn ServerSettings() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let monitor = app_state.0.monitor;

    let draft = RwSignal::new(monitor.endpoint_untracked());
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let url = draft.get().trim().to_string();
        if let Err(msg) = validate_endpoint(&url) {
            error.set(Some(msg));
            return;
        }
        error.set(None);
        monitor.set_endpoint(&url);
        draft.set(monitor.endpoint_untracked());
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-sm">"서버"</CardTitle>
                <CardDescription>"모집 공고를 불러올 서버 주소입니다."</CardDescription>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="server-url">"서버 주소"</Label>
                        <Input id="server-url" r#type="url" placeholder="https://proxy.example.com" bind_value=draft />
                    </div>
                    <FormError error=error />
                    <Button size=ButtonSize::Sm>"저장"</Button>
                </form>
            </CardContent>
            <CardFooter>
                <span class="inline-flex items-center gap-1 text-xs text-muted-foreground">
                    <Show when=move || monitor.status() == ConnectionStatus::Checking fallback=|| ().into_view()>
                        <Spinner class="size-3" />
                    </Show>
                    {move || monitor.status().to_string()}
                </span>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Xs
                    on:click=move |_| monitor.check_now()
                >
                    "지금 확인"
                </Button>
            </CardFooter>
        </Card>
    }
}

#[component]
fn NotificationSettings() -> impl IntoView {
    let access = RwSignal::new(notify::permission());

    let request = move |_| {
        spawn_local(async move {
            access.set(notify::request_permission().await);
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-sm">"알림"</CardTitle>
                <CardDescription>"새 쪽지가 오면 브라우저 알림을 띄웁니다."</CardDescription>
            </CardHeader>
            <CardContent class="flex items-center gap-3">
                <span class="text-sm">{move || access.get().to_string()}</span>
                <Show when=move || access.get() == NotificationAccess::Default fallback=|| ().into_view()>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=request>
                        "알림 허용하기"
                    </Button>
                </Show>
                <Show when=move || access.get() == NotificationAccess::Denied fallback=|| ().into_view()>
                    <span class="text-xs text-muted-foreground">"브라우저 설정에서 알림을 허용해 주세요."</span>
                </Show>
            </CardContent>
        </Card>
    }
}

#[component]
fn ProfileSettings() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let current = app_state.0.profile.get_untracked();
    let nickname = RwSignal::new(current.as_ref().map(|p| p.nickname.clone()).unwrap_or_default());
    let main_character = RwSignal::new(
        current
            .and_then(|p| p.main_character)
            .unwrap_or_default(),
    );
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saved = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let nick = nickname.get().trim().to_string();
        if let Err(msg) = validate_nickname(&nick) {
            error.set(Some(msg));
            return;
        }
        let character = non_empty(&main_character.get());
        let client = app_state.0.supabase.get_untracked();
        saving.set(true);
        saved.set(false);
        error.set(None);
        spawn_local(async move {
            match client.upsert_profile(&nick, character).await {
                Ok(profile) => {
                    app_state.0.set_profile(Some(profile));
                    saved.set(true);
                }
                Err(e) if e.is_unique_violation() => {
                    error.set(Some("이미 사용 중인 닉네임입니다.".to_string()));
                }
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
            saving.set(false);
        });
    };

    let email = move || {
        app_state
            .0
            .supabase
            .with(|c| c.session().and_then(|s| s.email.clone()))
            .unwrap_or_default()
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-sm">"프로필"</CardTitle>
                <CardDescription>{email}</CardDescription>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="profile-nick">"닉네임"</Label>
                        <Input id="profile-nick" bind_value=nickname required=true />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="profile-main">"대표 캐릭터"</Label>
                        <Input id="profile-main" bind_value=main_character placeholder="선택 사항" />
                    </div>
                    <FormError error=error />
                    <div class="flex items-center gap-2">
                        <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>"저장"</Button>
                        <Show when=move || saved.get() fallback=|| ().into_view()>
                            <span class="text-xs text-muted-foreground">"저장되었습니다."</span>
                        </Show>
                    </div>
                </form>
            </CardContent>
            <CardFooter>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    class="text-destructive"
                    on:click=move |_| app_state.0.sign_out(true)
                >
                    "로그아웃"
                </Button>
            </CardFooter>
        </Card>
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let supabase_configured = app_state.0.env.with_value(|env| {
        env.supabase_url.is_some() && env.supabase_anon_key.is_some()
    });

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"설정"</h1>
            </div>

            {(!supabase_configured).then(|| view! {
                <div class="rounded-md border border-border bg-muted p-3 text-xs text-muted-foreground">
                    "SUPABASE_URL / SUPABASE_ANON_KEY 가 설정되지 않아 로그인과 게시판을 사용할 수 없습니다."
                </div>
            })}

            <ServerSettings />
            <NotificationSettings />
            <Show when=move || app_state.0.is_signed_in() fallback=|| ().into_view()>
                <ProfileSettings />
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("https://proxy.example.com").is_ok());
        assert!(validate_endpoint("http://localhost:8787/").is_ok());
        assert!(validate_endpoint("  ").is_ok());
        assert!(validate_endpoint("proxy.example.com").is_err());
    }

    #[test]
    fn test_validate_nickname() {
        assert!(validate_nickname("용사").is_ok());
        assert!(validate_nickname("   ").is_err());
        assert!(validate_nickname(&"가".repeat(NICKNAME_MAX_LEN)).is_ok());
        assert!(validate_nickname(&"가".repeat(NICKNAME_MAX_LEN + 1)).is_err());
    }
}
