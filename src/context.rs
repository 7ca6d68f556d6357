//! Board Context
//!
//! Shared handles provided via Leptos Context API: the state store, the
//! drag controller and the sync coordinator. Board operations triggered
//! from the UI live here so components stay declarative.

use std::rc::Rc;

use board_core::{
    plan_move, BoardConfig, Contact, RemotePersistence, RestRepository, StatusSink,
    SyncCoordinator, SyncEvent, Task, TaskId, TaskStatus, TaskStore,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{DragContext, DragSession, DropResult};

use crate::models::Notice;
use crate::storage::BrowserStorage;
use crate::store::{
    store_board_snapshot, store_bump_epoch, store_push_notice, store_set_board,
    store_set_contacts, store_set_loading, store_upsert_task, BoardStateStoreFields, BoardStore,
};

pub type BoardDrag = DragContext<TaskId, TaskStatus>;

/// Routes sync outcomes into the notice bar
struct NoticeSink {
    store: BoardStore,
}

impl StatusSink for NoticeSink {
    fn report(&self, event: SyncEvent) {
        tracing::debug!("[SYNC] {:?}", event);
        if let Some((level, message)) = Notice::describe(&event) {
            store_push_notice(&self.store, level, message);
        }
    }
}

#[derive(Clone, Copy)]
pub struct BoardContext {
    pub store: BoardStore,
    pub drag: BoardDrag,
    sync: StoredValue<SyncCoordinator, LocalStorage>,
    contacts: StoredValue<Rc<dyn RemotePersistence<Contact>>, LocalStorage>,
}

pub fn use_board() -> BoardContext {
    expect_context::<BoardContext>()
}

impl BoardContext {
    pub fn new(config: &BoardConfig, store: BoardStore) -> Self {
        let sink: Rc<dyn StatusSink> = Rc::new(NoticeSink { store });
        let tasks: Rc<dyn RemotePersistence<Task>> = Rc::new(RestRepository::<Task>::new(
            &config.remote_url,
            &config.tasks_collection,
        ));
        let mut sync = SyncCoordinator::new(tasks, sink);
        if config.use_local_cache {
            match BrowserStorage::local() {
                Ok(storage) => sync = sync.with_cache(Rc::new(storage), &config.snapshot_key),
                Err(e) => tracing::warn!("[APP] local cache off: {}", e),
            }
        }
        let contacts: Rc<dyn RemotePersistence<Contact>> = Rc::new(RestRepository::<Contact>::new(
            &config.remote_url,
            &config.contacts_collection,
        ));

        Self {
            store,
            drag: DragContext::new(config.drop_grace_ms, config.settle_ms),
            sync: StoredValue::new_local(sync),
            contacts: StoredValue::new_local(contacts),
        }
    }

    fn sync(&self) -> SyncCoordinator {
        self.sync.with_value(|sync| sync.clone())
    }

    /// Load tasks, overlay the cached snapshot, then load contacts
    pub fn reload(&self) {
        let ctx = *self;
        store_set_loading(&ctx.store, true);
        spawn_local(async move {
            let sync = ctx.sync();
            // Failures are already reported through the sink
            if let Ok(tasks) = sync.fetch_tasks().await {
                let mut board = TaskStore::new();
                board.replace(tasks);
                let restored = sync.restore(&mut board);
                tracing::info!("[APP] Loaded {} tasks, {} placed from cache", board.len(), restored);
                store_set_board(&ctx.store, board);
                store_bump_epoch(&ctx.store);
            }

            let contacts = ctx.contacts.with_value(Rc::clone);
            match contacts.list().await {
                Ok(list) => store_set_contacts(&ctx.store, list),
                Err(e) => tracing::warn!("[APP] contacts unavailable: {}", e),
            }
            store_set_loading(&ctx.store, false);
        });
    }

    /// Commit a drop and persist it in the background
    pub fn on_drop(&self, result: DropResult<TaskId, TaskStatus>) {
        if result.noop {
            return;
        }
        let sync = self.sync();
        let mut board = store_board_snapshot(&self.store);
        let plan = match plan_move(&board, &result.item, result.zone, result.index) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("[DND] drop of {} ignored: {}", result.item, e);
                store_bump_epoch(&self.store);
                return;
            }
        };

        match sync.commit(&mut board, &plan) {
            Ok(commit) => {
                store_set_board(&self.store, board);
                spawn_local(async move {
                    let _ = sync.persist(commit).await;
                });
            }
            Err(_) => store_bump_epoch(&self.store),
        }
    }

    /// Drag ended without a drop: rebuild columns from the store
    pub fn on_cancel(&self, session: DragSession<TaskId, TaskStatus>) {
        tracing::debug!("[DND] {} returned to {}", session.item, session.origin_zone);
        store_bump_epoch(&self.store);
    }

    /// Create a task at the end of `status`
    pub fn create_task(&self, title: String, status: TaskStatus) {
        let ctx = *self;
        let sync = self.sync();
        let order = self.store.board().with_untracked(|b| b.next_order(status));
        let draft = Task::new(title.trim(), status).with_order(order);
        spawn_local(async move {
            if let Ok(task) = sync.create_task(draft).await {
                store_upsert_task(&ctx.store, task);
            }
        });
    }

    pub fn delete_task(&self, id: TaskId) {
        let sync = self.sync();
        let mut board = store_board_snapshot(&self.store);
        if sync.forget_local(&mut board, &id).is_err() {
            return;
        }
        store_set_board(&self.store, board);
        spawn_local(async move {
            let _ = sync.delete_task(&id).await;
        });
    }

    pub fn toggle_subtask(&self, id: TaskId, index: usize) {
        let sync = self.sync();
        let mut board = store_board_snapshot(&self.store);
        let Ok(task) = sync.toggle_subtask(&mut board, &id, index) else {
            return;
        };
        store_set_board(&self.store, board);
        spawn_local(async move {
            let _ = sync.save_task(&task).await;
        });
    }
}
