//! UI Components
//!
//! Reusable Leptos components.

mod assignee_avatars;
mod board;
mod board_column;
mod delete_confirm_button;
mod notice_bar;
mod progress_bar;
mod quick_add;
mod summary_counters;
mod task_card;

pub use assignee_avatars::AssigneeAvatars;
pub use board::Board;
pub use board_column::BoardColumn;
pub use delete_confirm_button::DeleteConfirmButton;
pub use notice_bar::NoticeBar;
pub use progress_bar::ProgressBar;
pub use quick_add::QuickAdd;
pub use summary_counters::SummaryCounters;
pub use task_card::TaskCard;
