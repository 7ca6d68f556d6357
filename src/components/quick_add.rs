//! Quick Add Component
//!
//! Single-line input under a column that creates a task in that column.

use board_core::TaskStatus;
use leptos::prelude::*;

use crate::context::use_board;

#[component]
pub fn QuickAdd(status: TaskStatus) -> impl IntoView {
    let ctx = use_board();
    let (title, set_title) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        ctx.create_task(text, status);
        set_title.set(String::new());
    };

    view! {
        <form class="quick-add" on:submit=submit>
            <input
                type="text"
                placeholder=format!("Add to {}...", status.label())
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <button type="submit">"+"</button>
        </form>
    }
}
