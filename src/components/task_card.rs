//! Task Card Component
//!
//! A draggable card. Fields read the task from the store individually,
//! so a subtask toggle only patches the progress bar and checkbox.

use board_core::{Task, TaskId, TaskStatus};
use leptos::prelude::*;
use leptos_dragdrop::{make_on_dragend, make_on_dragstart};

use super::{AssigneeAvatars, DeleteConfirmButton, ProgressBar};
use crate::context::use_board;
use crate::store::BoardStateStoreFields;

#[component]
pub fn TaskCard(id: TaskId, status: TaskStatus) -> impl IntoView {
    let ctx = use_board();
    let store = ctx.store;
    let drag = ctx.drag;

    let task = Memo::new({
        let id = id.clone();
        move |_| store.board().with(|b| b.find_by_id(&id).ok().cloned())
    });
    let field = move |read: fn(&Task) -> String| {
        move || task.with(|t| t.as_ref().map(read).unwrap_or_default())
    };
    let progress = Memo::new(move |_| task.with(|t| t.as_ref().map(Task::progress).unwrap_or_default()));
    let assignees = Signal::derive(move || {
        task.with(|t| t.as_ref().map(|t| t.assigned_to.clone()).unwrap_or_default())
    });
    let subtask_count = Memo::new(move |_| task.with(|t| t.as_ref().map_or(0, |t| t.subtasks.len())));

    let class = {
        let id = id.clone();
        move || {
            let mut c = String::from("task-card");
            drag.with(|d| {
                if d.dimmed_item() == Some(&id) {
                    c.push_str(" dragging");
                }
                if d.settling_item() == Some(&id) {
                    c.push_str(" just-dropped");
                }
            });
            c
        }
    };

    let on_dragstart = make_on_dragstart(drag, id.clone(), move || {
        let order = task.with_untracked(|t| t.as_ref().map_or(0, |t| t.order as usize));
        (status, order)
    });
    let on_dragend = make_on_dragend(drag, move |session| ctx.on_cancel(session));

    let delete_id = id.clone();
    let toggle_id = id.clone();

    view! {
        <article
            class=class
            draggable="true"
            data-drag-id=id.to_string()
            on:dragstart=on_dragstart
            on:dragend=on_dragend
        >
            <div class="card-top">
                <span class="card-category">{field(|t| t.category.clone())}</span>
                <DeleteConfirmButton
                    button_class="card-delete-btn"
                    on_confirm=Callback::new(move |_| ctx.delete_task(delete_id.clone()))
                />
            </div>
            <h3 class="card-title">{field(|t| t.title.clone())}</h3>
            <p class="card-description">{field(|t| t.description.clone())}</p>
            <ProgressBar progress=progress />
            <ul class="card-subtasks">
                <For
                    each=move || 0..subtask_count.get()
                    key=|index| *index
                    children=move |index| {
                        let toggle_id = toggle_id.clone();
                        let done = move || task.with(|t| {
                            t.as_ref().and_then(|t| t.subtasks.get(index)).is_some_and(|s| s.completed)
                        });
                        let text = move || task.with(|t| {
                            t.as_ref().and_then(|t| t.subtasks.get(index)).map(|s| s.text.clone()).unwrap_or_default()
                        });
                        view! {
                            <li class="card-subtask">
                                <label>
                                    <input
                                        type="checkbox"
                                        prop:checked=done
                                        on:change=move |_| ctx.toggle_subtask(toggle_id.clone(), index)
                                    />
                                    {text}
                                </label>
                            </li>
                        }
                    }
                />
            </ul>
            <div class="card-bottom">
                <AssigneeAvatars emails=assignees />
                <span class="card-due">
                    {move || task.with(|t| {
                        t.as_ref().and_then(|t| t.due_date).map(|d| d.format("%d/%m/%Y").to_string())
                    })}
                </span>
                <span class=move || {
                    let priority = task.with(|t| t.as_ref().map(|t| t.priority).unwrap_or_default());
                    format!("card-priority priority-{}", priority.as_str())
                }>
                    {move || task.with(|t| t.as_ref().map(|t| t.priority.as_str()).unwrap_or_default())}
                </span>
            </div>
        </article>
    }
}
