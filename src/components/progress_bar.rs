//! Subtask progress bar, hidden for tasks without subtasks

use board_core::SubtaskProgress;
use leptos::prelude::*;

#[component]
pub fn ProgressBar(progress: Memo<SubtaskProgress>) -> impl IntoView {
    view! {
        <Show when=move || progress.with(|p| p.total > 0)>
            <div class="progress">
                <div class="progress-track">
                    <div
                        class="progress-fill"
                        style:width=move || format!("{}%", progress.with(SubtaskProgress::percent))
                    ></div>
                </div>
                <span class="progress-label">{move || progress.with(SubtaskProgress::label)}</span>
            </div>
        </Show>
    }
}
