use crate::util::event_value;
use leptos::prelude::*;
use tw_merge::tw_merge;

const FIELD_BASE: &str = "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground border-input w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50";
const FIELD_FOCUS: &str = "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2";

/// Single-line field bound to a string signal.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] inputmode: String,
    #[prop(optional)] disabled: bool,
    #[prop(optional)] required: bool,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_BASE, FIELD_FOCUS, "flex h-9", class);

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            inputmode=inputmode
            disabled=disabled
            required=required
            prop:value=move || bind_value.get()
            on:input=move |ev: web_sys::Event| bind_value.set(event_value(&ev))
        />
    }
}

#[component]
pub fn Textarea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(default = 4)] rows: u32,
    #[prop(optional)] required: bool,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_BASE, FIELD_FOCUS, "py-2 resize-y", class);

    view! {
        <textarea
            data-name="Textarea"
            class=merged_class
            placeholder=placeholder
            id=id
            rows=rows
            required=required
            prop:value=move || bind_value.get()
            on:input=move |ev: web_sys::Event| bind_value.set(event_value(&ev))
        ></textarea>
    }
}
