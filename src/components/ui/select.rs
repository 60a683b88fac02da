use crate::util::event_value;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Native `<select>` over `(value, label)` pairs. An empty `placeholder`
/// omits the leading blank option.
#[component]
pub fn NativeSelect(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] placeholder: String,
    options: Vec<(String, String)>,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "border-input h-9 rounded-md border bg-transparent px-2 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50",
        class
    );
    let blank = (!placeholder.is_empty()).then(|| {
        view! { <option value="">{placeholder}</option> }
    });

    view! {
        <select
            data-name="NativeSelect"
            class=merged_class
            id=id
            prop:value=move || bind_value.get()
            on:change=move |ev: web_sys::Event| bind_value.set(event_value(&ev))
        >
            {blank}
            {options
                .into_iter()
                .map(|(value, label)| {
                    let current = value.clone();
                    view! {
                        <option value=value selected=move || bind_value.get() == current>
                            {label}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}
