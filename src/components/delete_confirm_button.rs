//! Delete Confirm Button Component
//!
//! Inline delete with a confirm step.

use leptos::prelude::*;

/// Shows a × button. Clicking it asks "Delete?" with confirm and cancel.
/// Clicks never reach the card underneath.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);

    view! {
        <Show
            when=move || confirming.get()
            fallback=move || {
                view! {
                    <button
                        class=button_class.clone()
                        title="Delete task"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_confirming.set(true);
                        }
                    >
                        "×"
                    </button>
                }
            }
        >
            <span class="delete-confirm">
                <span class="delete-confirm-text">"Delete?"</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        on_confirm.run(());
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
