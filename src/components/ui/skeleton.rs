use leptos::prelude::*;
use tw_merge::tw_merge;

/// Placeholder block shown while content loads. Takes no children.
#[component]
pub fn Skeleton(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("animate-pulse rounded-md bg-muted", class);

    view! { <div data-name="Skeleton" class=merged_class aria-hidden="true"></div> }
}
