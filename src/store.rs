//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.
//!
//! A write guard on any field locks the whole state, so helpers never hold
//! one while calling code that may write again.

use board_core::{Contact, Task, TaskStore};
use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Notice, NoticeLevel};

/// Oldest notices are dropped past this
const MAX_NOTICES: usize = 4;

#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    pub board: TaskStore,
    pub contacts: Vec<Contact>,
    pub notices: Vec<Notice>,
    pub next_notice_id: u32,
    pub loading: bool,
    /// Bumped to rebuild every column from the store
    pub render_epoch: u32,
}

pub type BoardStore = Store<BoardState>;

pub fn use_board_store() -> BoardStore {
    expect_context::<BoardStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy of the task store for a mutation outside any guard
pub fn store_board_snapshot(store: &BoardStore) -> TaskStore {
    store.board().get_untracked()
}

pub fn store_set_board(store: &BoardStore, board: TaskStore) {
    *store.board().write() = board;
}

pub fn store_upsert_task(store: &BoardStore, task: Task) {
    store.board().write().upsert_local(task);
}

pub fn store_set_contacts(store: &BoardStore, contacts: Vec<Contact>) {
    *store.contacts().write() = contacts;
}

pub fn store_set_loading(store: &BoardStore, loading: bool) {
    *store.loading().write() = loading;
}

pub fn store_bump_epoch(store: &BoardStore) {
    *store.render_epoch().write() += 1;
}

/// Append a notice, returns its id
pub fn store_push_notice(store: &BoardStore, level: NoticeLevel, message: String) -> u32 {
    let id = {
        let next_field = store.next_notice_id();
        let mut next = next_field.write();
        *next += 1;
        *next
    };
    let notices_field = store.notices();
    let mut notices = notices_field.write();
    notices.push(Notice { id, level, message });
    if notices.len() > MAX_NOTICES {
        let excess = notices.len() - MAX_NOTICES;
        notices.drain(..excess);
    }
    id
}

pub fn store_dismiss_notice(store: &BoardStore, id: u32) {
    store.notices().write().retain(|n| n.id != id);
}
