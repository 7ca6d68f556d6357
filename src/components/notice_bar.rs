//! Notice Bar Component
//!
//! Sync outcomes. Info notices dismiss themselves, errors stay until closed.
//! A collapsed panel below shows the logger's recent lines.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::models::NoticeLevel;
use crate::store::{store_dismiss_notice, use_board_store, BoardStateStoreFields};

const INFO_NOTICE_MS: u32 = 4000;

#[component]
pub fn NoticeBar() -> impl IntoView {
    let store = use_board_store();
    let recent = RwSignal::new(Vec::<String>::new());

    view! {
        <div class="notice-bar">
            <For
                each=move || store.notices().get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    if notice.level == NoticeLevel::Info {
                        Timeout::new(INFO_NOTICE_MS, move || store_dismiss_notice(&store, id)).forget();
                    }
                    let class = match notice.level {
                        NoticeLevel::Info => "notice notice-info",
                        NoticeLevel::Error => "notice notice-error",
                    };
                    view! {
                        <div class=class role="status">
                            <span>{notice.message}</span>
                            <button
                                class="notice-close"
                                on:click=move |_| store_dismiss_notice(&store, id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
            <details
                class="log-panel"
                on:toggle=move |_| recent.set(rolling_logger::recent_lines())
            >
                <summary>"Recent log"</summary>
                <pre>{move || recent.with(|lines| lines.join("\n"))}</pre>
            </details>
        </div>
    }
}
