//! Board Column Component
//!
//! One status column: header with count, the drop zone holding the cards
//! and placeholder, and the quick-add input.

use board_core::{TaskId, TaskStatus};
use leptos::prelude::*;
use leptos_dragdrop::{make_on_dragenter, make_on_dragleave, make_on_dragover, make_on_drop};

use super::{QuickAdd, TaskCard};
use crate::context::use_board;
use crate::store::BoardStateStoreFields;

/// One entry in a rendered column
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Card(TaskId),
    Placeholder,
}

/// Column contents with the placeholder spliced in. `placeholder` counts
/// the siblings of `dragged` only, so the source card keeps its own spot.
pub fn layout_slots(ids: &[TaskId], dragged: Option<&TaskId>, placeholder: Option<usize>) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(ids.len() + 1);
    let mut siblings = 0;
    for id in ids {
        let is_dragged = dragged == Some(id);
        if !is_dragged && placeholder == Some(siblings) {
            slots.push(Slot::Placeholder);
        }
        slots.push(Slot::Card(id.clone()));
        if !is_dragged {
            siblings += 1;
        }
    }
    if placeholder.is_some_and(|index| index >= siblings) {
        slots.push(Slot::Placeholder);
    }
    slots
}

#[component]
pub fn BoardColumn(status: TaskStatus) -> impl IntoView {
    let ctx = use_board();
    let store = ctx.store;
    let drag = ctx.drag;

    let ids = Memo::new(move |_| store.board().with(|b| b.column_ids(status)));
    let slots = Memo::new(move |_| {
        let (dragged, placeholder) = drag.with(|c| {
            (c.session().map(|s| s.item.clone()), c.placeholder_in(&status))
        });
        ids.with(|ids| layout_slots(ids, dragged.as_ref(), placeholder))
    });

    let is_over = move || drag.with(|c| c.is_over(&status));
    let placeholder_height = move || {
        let height = drag.with(|c| c.session().map_or(0.0, |s| s.size.height));
        format!("{}px", height)
    };
    let show_empty = move || {
        ids.with(Vec::is_empty)
            && !drag.with(|c| c.is_over(&status) || c.placeholder_in(&status).is_some() || c.is_settling())
    };

    let on_drop = make_on_drop(drag, status, move |result| ctx.on_drop(result));

    view! {
        <section class="board-column">
            <header class="column-header">
                <h2>{status.label()}</h2>
                <span class="column-count">{move || ids.with(Vec::len)}</span>
            </header>
            <div
                class=move || if is_over() { "column-body drag-over" } else { "column-body" }
                data-status=status.as_str()
                on:dragover=make_on_dragover(drag, status)
                on:dragenter=make_on_dragenter(drag, status)
                on:dragleave=make_on_dragleave(drag, status)
                on:drop=on_drop
            >
                <For
                    each=move || {
                        let epoch = store.render_epoch().get();
                        slots.get().into_iter().map(move |slot| (epoch, slot)).collect::<Vec<_>>()
                    }
                    key=|entry| entry.clone()
                    children=move |(_, slot)| match slot {
                        Slot::Card(id) => view! { <TaskCard id=id status=status /> }.into_any(),
                        Slot::Placeholder => view! {
                            <div class="drag-placeholder" style:height=placeholder_height></div>
                        }
                        .into_any(),
                    }
                />
                <Show when=show_empty>
                    <div class="column-empty">{format!("No tasks {}", status.label())}</div>
                </Show>
            </div>
            <QuickAdd status=status />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<TaskId> {
        raw.iter().map(|s| TaskId::from(*s)).collect()
    }

    fn render(slots: &[Slot]) -> String {
        slots
            .iter()
            .map(|s| match s {
                Slot::Card(id) => id.as_str().to_string(),
                Slot::Placeholder => "_".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_no_placeholder() {
        assert_eq!(render(&layout_slots(&ids(&["a", "b"]), None, None)), "a b");
    }

    #[test]
    fn test_placeholder_right_after_source() {
        let column = ids(&["a", "b", "c"]);
        let a = TaskId::from("a");
        assert_eq!(render(&layout_slots(&column, Some(&a), Some(0))), "a _ b c");
        assert_eq!(render(&layout_slots(&column, Some(&a), Some(2))), "a b c _");
    }

    #[test]
    fn test_placeholder_in_other_column() {
        let column = ids(&["x", "y"]);
        let a = TaskId::from("a");
        assert_eq!(render(&layout_slots(&column, Some(&a), Some(1))), "x _ y");
        assert_eq!(render(&layout_slots(&[], Some(&a), Some(0))), "_");
    }
}
