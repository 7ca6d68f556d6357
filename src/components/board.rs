//! Board
//!
//! The four status columns side by side.

use board_core::TaskStatus;
use leptos::prelude::*;

use super::BoardColumn;

#[component]
pub fn Board() -> impl IntoView {
    view! {
        <div class="board">
            {TaskStatus::ALL
                .into_iter()
                .map(|status| view! { <BoardColumn status=status /> })
                .collect_view()}
        </div>
    }
}
