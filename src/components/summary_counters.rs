//! Summary Counters Component
//!
//! Per-status task counts, urgent count and the next urgent deadline.

use board_core::{BoardSummary, TaskStatus};
use leptos::prelude::*;

use crate::store::{use_board_store, BoardStateStoreFields};

#[component]
pub fn SummaryCounters() -> impl IntoView {
    let store = use_board_store();
    let summary = Memo::new(move |_| {
        let today = chrono::Local::now().date_naive();
        store.board().with(|b| BoardSummary::from_store(b, today))
    });

    view! {
        <div class="summary">
            <div class="summary-item">
                <span class="summary-value">{move || summary.with(|s| s.total)}</span>
                <span class="summary-label">"Tasks on board"</span>
            </div>
            {TaskStatus::ALL
                .into_iter()
                .map(|status| {
                    view! {
                        <div class="summary-item">
                            <span class="summary-value">{move || summary.with(|s| s.count(status))}</span>
                            <span class="summary-label">{status.label()}</span>
                        </div>
                    }
                })
                .collect_view()}
            <div class="summary-item summary-urgent">
                <span class="summary-value">{move || summary.with(|s| s.urgent)}</span>
                <span class="summary-label">"Urgent"</span>
                <span class="summary-deadline">
                    {move || {
                        summary.with(|s| {
                            s.next_urgent_deadline
                                .map(|d| d.format("%B %-d, %Y").to_string())
                                .unwrap_or_else(|| "No upcoming deadline".to_string())
                        })
                    }}
                </span>
            </div>
        </div>
    }
}
