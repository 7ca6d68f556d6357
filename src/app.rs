//! Kanban Board App
//!
//! Header with counters, notice bar and the four-column board.

use board_core::BoardConfig;
use leptos::prelude::*;
use leptos_dragdrop::bind_global_keydown;
use reactive_stores::Store;

use crate::components::{Board, NoticeBar, SummaryCounters};
use crate::context::BoardContext;
use crate::store::{BoardState, BoardStateStoreFields};

#[component]
pub fn App(config: BoardConfig) -> impl IntoView {
    let store = Store::new(BoardState::default());
    provide_context(store);

    let ctx = BoardContext::new(&config, store);
    provide_context(ctx);

    bind_global_keydown(ctx.drag, move |session| ctx.on_cancel(session));
    ctx.reload();

    view! {
        <div class="board-layout">
            <header class="board-header">
                <h1>"Board"</h1>
                <SummaryCounters />
            </header>
            <NoticeBar />
            <Show when=move || store.loading().get()>
                <p class="board-loading">"Loading tasks..."</p>
            </Show>
            <Board />
        </div>
    }
}
