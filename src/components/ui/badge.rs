use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Badge(
    #[prop(optional)] tone: BadgeTone,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let merged_class = BadgeClass { tone }.with_class(class);

    view! {
        <span data-name="Badge" class=merged_class>
            {children()}
        </span>
    }
}

/* ========================================================== */
/*                       🧬 STRUCT 🧬                         */
/* ========================================================== */

#[derive(TwClass, Default)]
#[tw(class = "inline-flex items-center gap-1 whitespace-nowrap rounded-md border px-2 py-0.5 text-xs font-medium")]
pub struct BadgeClass {
    tone: BadgeTone,
}

#[derive(TwVariant)]
pub enum BadgeTone {
    #[tw(default, class = "border-border bg-muted text-muted-foreground")]
    Neutral,
    #[tw(class = "border-transparent bg-primary text-primary-foreground")]
    Primary,
    #[tw(class = "border-emerald-200 bg-emerald-50 text-emerald-700")]
    Success,
    #[tw(class = "border-amber-200 bg-amber-50 text-amber-700")]
    Warning,
    #[tw(class = "border-red-200 bg-red-50 text-red-700")]
    Danger,
    #[tw(class = "border-sky-200 bg-sky-50 text-sky-700")]
    Info,
}
