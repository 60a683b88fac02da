use crate::components::ui::{Badge, BadgeTone};
use crate::models::{RecruitStatus, TradeKind, TradeStatus};
use leptos::prelude::*;

pub(crate) fn recruit_status_tone(status: RecruitStatus, full: bool) -> BadgeTone {
    match status {
        RecruitStatus::Open if full => BadgeTone::Warning,
        RecruitStatus::Open => BadgeTone::Success,
        RecruitStatus::Closed => BadgeTone::Neutral,
    }
}

pub(crate) fn trade_kind_tone(kind: TradeKind) -> BadgeTone {
    match kind {
        TradeKind::Buy => BadgeTone::Info,
        TradeKind::Sell => BadgeTone::Primary,
    }
}

pub(crate) fn trade_status_tone(status: TradeStatus) -> BadgeTone {
    match status {
        TradeStatus::Active => BadgeTone::Success,
        TradeStatus::Reserved => BadgeTone::Warning,
        TradeStatus::Completed => BadgeTone::Neutral,
    }
}

/// Tone for free-form Notion select values (recruitment status column).
pub(crate) fn label_tone(label: &str) -> BadgeTone {
    if label.contains("마감") || label.contains("완료") {
        BadgeTone::Neutral
    } else if label.contains("모집") {
        BadgeTone::Success
    } else if label.contains("급구") {
        BadgeTone::Danger
    } else {
        BadgeTone::Info
    }
}

#[component]
pub fn RecruitStatusBadge(status: RecruitStatus, #[prop(optional)] full: bool) -> impl IntoView {
    let text = if status == RecruitStatus::Open && full {
        "인원 마감".to_string()
    } else {
        status.to_string()
    };
    view! { <Badge tone=recruit_status_tone(status, full)>{text}</Badge> }
}

#[component]
pub fn TradeKindBadge(kind: TradeKind) -> impl IntoView {
    view! { <Badge tone=trade_kind_tone(kind)>{kind.to_string()}</Badge> }
}

#[component]
pub fn TradeStatusBadge(status: TradeStatus) -> impl IntoView {
    view! { <Badge tone=trade_status_tone(status)>{status.to_string()}</Badge> }
}

#[component]
pub fn LabelBadge(#[prop(into)] label: String) -> impl IntoView {
    let tone = label_tone(&label);
    view! { <Badge tone=tone>{label}</Badge> }
}

#[component]
pub fn TagBadge(#[prop(into)] label: String) -> impl IntoView {
    view! { <Badge class="font-normal">{format!("#{label}")}</Badge> }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same(a: BadgeTone, b: BadgeTone) -> bool {
        std::mem::discriminant(&a) == std::mem::discriminant(&b)
    }

    #[test]
    fn test_label_tone_keywords() {
        assert!(same(label_tone("모집 중"), BadgeTone::Success));
        assert!(same(label_tone("모집 마감"), BadgeTone::Neutral));
        assert!(same(label_tone("급구"), BadgeTone::Danger));
        assert!(same(label_tone("레이드"), BadgeTone::Info));
    }

    #[test]
    fn test_full_open_recruit_is_warning() {
        assert!(same(recruit_status_tone(RecruitStatus::Open, true), BadgeTone::Warning));
        assert!(same(recruit_status_tone(RecruitStatus::Open, false), BadgeTone::Success));
        assert!(same(recruit_status_tone(RecruitStatus::Closed, true), BadgeTone::Neutral));
    }
}
