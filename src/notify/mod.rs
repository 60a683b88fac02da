use leptos::logging::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Notification, NotificationOptions, NotificationPermission};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum NotificationAccess {
    #[strum(to_string = "허용됨")]
    Granted,
    #[strum(to_string = "차단됨")]
    Denied,
    #[strum(to_string = "요청 전")]
    Default,
    #[strum(to_string = "지원 안 함")]
    Unsupported,
}

impl NotificationAccess {
    pub fn can_display(self) -> bool {
        self == Self::Granted
    }

    fn from_permission(p: NotificationPermission) -> Self {
        match p {
            NotificationPermission::Granted => Self::Granted,
            NotificationPermission::Denied => Self::Denied,
            _ => Self::Default,
        }
    }
}

/// `typeof Notification !== "undefined"`.
fn is_supported() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::has(&w, &"Notification".into()).ok())
        .unwrap_or(false)
}

pub(crate) fn permission() -> NotificationAccess {
    if !is_supported() {
        return NotificationAccess::Unsupported;
    }
    NotificationAccess::from_permission(Notification::permission())
}

pub(crate) async fn request_permission() -> NotificationAccess {
    if !is_supported() {
        warn!("notifications unsupported in this browser");
        return NotificationAccess::Unsupported;
    }

    let promise = match Notification::request_permission() {
        Ok(p) => p,
        Err(e) => {
            warn!("notification permission request failed: {e:?}");
            return permission();
        }
    };

    match JsFuture::from(promise).await {
        Ok(v) => v
            .as_string()
            .and_then(|s| NotificationPermission::from_js_value(&s.into()))
            .map(NotificationAccess::from_permission)
            .unwrap_or_else(permission),
        Err(e) => {
            warn!("notification permission request rejected: {e:?}");
            permission()
        }
    }
}

/// Shows a notification when permission is granted; otherwise returns `None`
/// without displaying anything.
pub(crate) fn show_browser_notification(title: &str, body: &str) -> Option<Notification> {
    show_with_access(permission(), title, body)
}

fn show_with_access(access: NotificationAccess, title: &str, body: &str) -> Option<Notification> {
    if access == NotificationAccess::Unsupported {
        warn!("notifications unsupported; skipping {title:?}");
        return None;
    }
    if !access.can_display() {
        return None;
    }

    let options = NotificationOptions::new();
    options.set_body(body);
    options.set_tag("party-board");
    match Notification::new_with_options(title, &options) {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("notification failed: {:?}", e.dyn_ref::<js_sys::Error>().map(|e| e.message()));
            None
        }
    }
}

/// New unread messages since `previous`, if a notification is warranted.
pub(crate) fn unread_increase(previous: Option<i64>, current: i64) -> Option<i64> {
    match previous {
        Some(prev) if current > prev => Some(current - prev),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_granted_can_display() {
        assert!(NotificationAccess::Granted.can_display());
        assert!(!NotificationAccess::Denied.can_display());
        assert!(!NotificationAccess::Default.can_display());
        assert!(!NotificationAccess::Unsupported.can_display());
    }

    #[test]
    fn test_denied_returns_none_without_touching_the_api() {
        assert!(show_with_access(NotificationAccess::Denied, "t", "b").is_none());
        assert!(show_with_access(NotificationAccess::Default, "t", "b").is_none());
    }

    #[test]
    fn test_unread_increase_ignores_first_load_and_decreases() {
        assert_eq!(unread_increase(None, 5), None);
        assert_eq!(unread_increase(Some(5), 5), None);
        assert_eq!(unread_increase(Some(5), 3), None);
        assert_eq!(unread_increase(Some(2), 5), Some(3));
    }
}
