use super::RequireAuth;
use crate::components::ui::{
    Badge, BadgeTone, Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardTitle,
    Input, Label, Spinner, Textarea,
};
use crate::components::{EmptyState, ErrorState, FormError, ListSkeleton};
use crate::connectivity::{PollTask, POLL_INTERVAL_MS};
use crate::models::{display_name, Message};
use crate::notify::{self, unread_increase, NotificationAccess};
use crate::state::AppContext;
use crate::util::short_timestamp;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;

const MAX_MESSAGE_LEN: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mailbox {
    Inbox,
    Sent,
}

pub(crate) fn validate_message(nickname: &str, content: &str) -> Result<(), String> {
    if nickname.trim().is_empty() {
        return Err("받는 사람 닉네임을 입력해 주세요.".to_string());
    }
    let len = content.trim().chars().count();
    if len == 0 {
        return Err("내용을 입력해 주세요.".to_string());
    }
    if len > MAX_MESSAGE_LEN {
        return Err(format!("쪽지는 {MAX_MESSAGE_LEN}자까지 보낼 수 있습니다."));
    }
    Ok(())
}

#[component]
pub fn MessagesPage() -> impl IntoView {
    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"쪽지"</h1>
                <p class="text-xs text-muted-foreground">"다른 유저와 1:1 쪽지를 주고받습니다."</p>
            </div>
            <RequireAuth>
                <MessagesPanel />
            </RequireAuth>
        </div>
    }
}

#[component]
fn MessagesPanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let mailbox = RwSignal::new(Mailbox::Inbox);
    let inbox: RwSignal<Vec<Message>> = RwSignal::new(vec![]);
    let sent: RwSignal<Vec<Message>> = RwSignal::new(vec![]);
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let access = RwSignal::new(notify::permission());

    let to_nickname = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let send_error: RwSignal<Option<String>> = RwSignal::new(None);
    let sending = RwSignal::new(false);

    let refresh_unread = move || {
        let client = app_state.0.supabase.get_untracked();
        spawn_local(async move {
            match client.unread_message_count().await {
                Ok(count) => {
                    let previous = app_state.0.unread_count.get_untracked();
                    if let Some(added) = unread_increase(previous, count) {
                        log!("unread messages +{added}");
                        notify::show_browser_notification(
                            "새 쪽지",
                            &format!("읽지 않은 쪽지가 {added}개 도착했습니다."),
                        );
                    }
                    app_state.0.unread_count.set(Some(count));
                }
                Err(e) => {
                    app_state.0.handle_error(e);
                }
            }
        });
    };

    let load = move || {
        let client = app_state.0.supabase.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match client.list_inbox().await {
                Ok(rows) => inbox.set(rows),
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
            match client.list_sent().await {
                Ok(rows) => sent.set(rows),
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
            loading.set(false);
        });
        refresh_unread();
    };
    load();

    let poll: StoredValue<Option<PollTask>, LocalStorage> =
        StoredValue::new_local(PollTask::start(POLL_INTERVAL_MS, refresh_unread));
    on_cleanup(move || {
        poll.update_value(|task| {
            task.take();
        });
    });

    let mark_read = move |id: i64| {
        let client = app_state.0.supabase.get_untracked();
        spawn_local(async move {
            match client.mark_message_read(id).await {
                Ok(()) => {
                    inbox.update(|rows| {
                        if let Some(m) = rows.iter_mut().find(|m| m.id == id) {
                            m.is_read = true;
                        }
                    });
                    app_state
                        .0
                        .unread_count
                        .update(|c| *c = c.map(|n| (n - 1).max(0)));
                }
                Err(e) => error.set(app_state.0.handle_error(e)),
            }
        });
    };

    let on_send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let nickname = to_nickname.get().trim().to_string();
        let body = content.get().trim().to_string();
        if let Err(msg) = validate_message(&nickname, &body) {
            send_error.set(Some(msg));
            return;
        }

        let client = app_state.0.supabase.get_untracked();
        sending.set(true);
        send_error.set(None);
        spawn_local(async move {
            let result = match client.find_profile_by_nickname(&nickname).await {
                Ok(Some(profile)) => client.send_message(&profile.id, &body).await.map(Some),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            };
            match result {
                Ok(Some(message)) => {
                    content.set(String::new());
                    sent.update(|rows| rows.insert(0, message));
                    mailbox.set(Mailbox::Sent);
                }
                Ok(None) => send_error.set(Some(format!("'{nickname}' 닉네임을 찾을 수 없습니다."))),
                Err(e) => send_error.set(app_state.0.handle_error(e)),
            }
            sending.set(false);
        });
    };

    let request_access = move |_| {
        spawn_local(async move {
            access.set(notify::request_permission().await);
        });
    };

    let tab_class = move |tab: Mailbox| {
        if mailbox.get() == tab {
            "rounded-md bg-accent px-3 py-1.5 text-sm font-medium"
        } else {
            "rounded-md px-3 py-1.5 text-sm text-muted-foreground hover:bg-accent"
        }
    };

    view! {
        <div class="space-y-4">
            <Card>
                <CardHeader>
                    <CardTitle class="text-sm">"쪽지 보내기"</CardTitle>
                </CardHeader>
                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_send>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="msg-to">"받는 사람"</Label>
                            <Input id="msg-to" bind_value=to_nickname placeholder="닉네임" />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="msg-body">"내용"</Label>
                            <Textarea id="msg-body" rows=3 bind_value=content />
                        </div>
                        <FormError error=send_error />
                        <Button size=ButtonSize::Sm attr:disabled=move || sending.get()>
                            <Show when=move || sending.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            "보내기"
                        </Button>
                    </form>
                </CardContent>
            </Card>

            <div class="flex flex-wrap items-center justify-between gap-2">
                <div class="flex items-center gap-1">
                    <button class=move || tab_class(Mailbox::Inbox) on:click=move |_| mailbox.set(Mailbox::Inbox)>
                        "받은 쪽지"
                        {move || app_state.0.unread_count.get().filter(|n| *n > 0).map(|n| view! {
                            <Badge tone=BadgeTone::Danger class="ml-1">{n.to_string()}</Badge>
                        })}
                    </button>
                    <button class=move || tab_class(Mailbox::Sent) on:click=move |_| mailbox.set(Mailbox::Sent)>
                        "보낸 쪽지"
                    </button>
                </div>
                <div class="flex items-center gap-2">
                    <Show when=move || access.get() == NotificationAccess::Default fallback=|| ().into_view()>
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Xs on:click=request_access>
                            "알림 켜기"
                        </Button>
                    </Show>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Xs on:click=move |_| load()>
                        "새로고침"
                    </Button>
                </div>
            </div>

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
                    {move || {
                        let current = mailbox.get();
                        let rows = match current {
                            Mailbox::Inbox => inbox.get(),
                            Mailbox::Sent => sent.get(),
                        };
                        if rows.is_empty() {
                            let text = match current {
                                Mailbox::Inbox => "받은 쪽지가 없습니다.",
                                Mailbox::Sent => "보낸 쪽지가 없습니다.",
                            };
                            return view! { <EmptyState text=text /> }.into_any();
                        }
                        view! {
                            <div class="space-y-2">
                                {rows
                                    .into_iter()
                                    .map(|m| {
                                        let id = m.id;
                                        let unread = current == Mailbox::Inbox && !m.is_read;
                                        let (who, reply_to) = match current {
                                            Mailbox::Inbox => {
                                                let name = display_name(&m.sender, &m.sender_id);
                                                (format!("보낸 사람: {name}"), m.sender.as_ref().and_then(|p| p.nickname.clone()))
                                            }
                                            Mailbox::Sent => (
                                                format!("받는 사람: {}", display_name(&m.receiver, &m.receiver_id)),
                                                None,
                                            ),
                                        };
                                        let row_class = if unread {
                                            "space-y-1 rounded-md border border-primary/40 bg-primary/5 p-3"
                                        } else {
                                            "space-y-1 rounded-md border border-border p-3"
                                        };
                                        view! {
                                            <div class=row_class>
                                                <div class="flex items-center justify-between gap-2 text-xs text-muted-foreground">
                                                    <span>{who}</span>
                                                    <span>{short_timestamp(&m.created_at)}</span>
                                                </div>
                                                <p class="whitespace-pre-line text-sm">{m.content.clone()}</p>
                                                <div class="flex gap-1">
                                                    {unread.then(|| view! {
                                                        <Button variant=ButtonVariant::Outline size=ButtonSize::Xs on:click=move |_| mark_read(id)>
                                                            "읽음"
                                                        </Button>
                                                    })}
                                                    {reply_to.map(|nick| view! {
                                                        <Button
                                                            variant=ButtonVariant::Ghost
                                                            size=ButtonSize::Xs
                                                            on:click=move |_| to_nickname.set(nick.clone())
                                                        >
                                                            "답장"
                                                        </Button>
                                                    })}
                                                </div>
                                            </div>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                        .into_any()
                    }}
                </Show>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_message() {
        assert!(validate_message("용사", "안녕하세요").is_ok());
        assert!(validate_message(" ", "안녕하세요").is_err());
        assert!(validate_message("용사", "   ").is_err());
        assert!(validate_message("용사", &"가".repeat(MAX_MESSAGE_LEN)).is_ok());
        assert!(validate_message("용사", &"가".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }
}
