//! Drag Session State Machine
//!
//! `Idle -> Dragging -> {Settling | Idle}`. Pure state, no DOM: the
//! bindings in the crate root feed it measured boxes and events.

use thiserror::Error;

/// Size of the dragged element, used for the placeholder
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

/// Vertical extent of one draggable element inside a zone
#[derive(Clone, Debug, PartialEq)]
pub struct SiblingBox<Id> {
    pub id: Id,
    pub top: f64,
    pub height: f64,
}

impl<Id> SiblingBox<Id> {
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Insertion point: `index` counts the zone's items without the dragged one
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder<Zone> {
    pub zone: Zone,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession<Id, Zone> {
    pub item: Id,
    pub origin_zone: Zone,
    pub origin_index: usize,
    pub size: BoxSize,
    pub placeholder: Placeholder<Zone>,
    /// Source dimmed and placeholder shown; set one frame after start
    pub revealed: bool,
    over_zones: Vec<Zone>,
}

impl<Id, Zone: PartialEq> DragSession<Id, Zone> {
    pub fn is_over(&self, zone: &Zone) -> bool {
        self.over_zones.contains(zone)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragPhase<Id, Zone> {
    Idle,
    Dragging(DragSession<Id, Zone>),
    /// Drop transition running; new drags are refused
    Settling { item: Id, zone: Zone },
}

/// What a drop produced
#[derive(Clone, Debug, PartialEq)]
pub struct DropResult<Id, Zone> {
    pub item: Id,
    pub origin_zone: Zone,
    pub origin_index: usize,
    pub zone: Zone,
    pub index: usize,
    /// Dropped back where it started
    pub noop: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("a drag or drop transition is already in progress")]
    Busy,
    #[error("no drag in progress")]
    NotDragging,
}

/// Index among `siblings` (minus `dragged`) at which the placeholder goes:
/// the first sibling whose midpoint lies below the pointer, or the end.
pub fn insertion_index<Id: PartialEq>(siblings: &[SiblingBox<Id>], dragged: &Id, pointer_y: f64) -> usize {
    let mut best: Option<(usize, f64)> = None;
    let others = siblings.iter().filter(|s| &s.id != dragged);
    let mut count = 0;
    for (index, sibling) in others.enumerate() {
        count = index + 1;
        let offset = pointer_y - sibling.midpoint();
        if offset < 0.0 && best.map_or(true, |(_, closest)| offset > closest) {
            best = Some((index, offset));
        }
    }
    best.map_or(count, |(index, _)| index)
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragController<Id, Zone> {
    phase: DragPhase<Id, Zone>,
}

impl<Id, Zone> Default for DragController<Id, Zone> {
    fn default() -> Self {
        Self { phase: DragPhase::Idle }
    }
}

impl<Id: Clone + PartialEq, Zone: Clone + PartialEq> DragController<Id, Zone> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase<Id, Zone> {
        &self.phase
    }

    pub fn session(&self) -> Option<&DragSession<Id, Zone>> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.phase, DragPhase::Settling { .. })
    }

    /// The item being dragged, once it is shown dimmed
    pub fn dimmed_item(&self) -> Option<&Id> {
        self.session().filter(|s| s.revealed).map(|s| &s.item)
    }

    /// The item whose drop transition is playing
    pub fn settling_item(&self) -> Option<&Id> {
        match &self.phase {
            DragPhase::Settling { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn is_over(&self, zone: &Zone) -> bool {
        self.session().is_some_and(|s| s.is_over(zone))
    }

    /// Placeholder index to render in `zone`, if it is visible there
    pub fn placeholder_in(&self, zone: &Zone) -> Option<usize> {
        self.session()
            .filter(|s| s.revealed && &s.placeholder.zone == zone)
            .map(|s| s.placeholder.index)
    }

    /// Idle -> Dragging. The placeholder starts right after the source.
    pub fn start(
        &mut self,
        item: Id,
        zone: Zone,
        origin_index: usize,
        size: BoxSize,
    ) -> Result<&DragSession<Id, Zone>, DragError> {
        if !matches!(self.phase, DragPhase::Idle) {
            return Err(DragError::Busy);
        }
        self.phase = DragPhase::Dragging(DragSession {
            item,
            origin_zone: zone.clone(),
            origin_index,
            size,
            placeholder: Placeholder { zone, index: origin_index },
            revealed: false,
            over_zones: Vec::new(),
        });
        self.session().ok_or(DragError::NotDragging)
    }

    /// Second step of the start: dim the source, show the placeholder
    pub fn reveal(&mut self) -> bool {
        match &mut self.phase {
            DragPhase::Dragging(session) if !session.revealed => {
                session.revealed = true;
                true
            }
            _ => false,
        }
    }

    pub fn enter_zone(&mut self, zone: Zone) {
        if let DragPhase::Dragging(session) = &mut self.phase {
            if !session.over_zones.contains(&zone) {
                session.over_zones.push(zone);
            }
        }
    }

    pub fn leave_zone(&mut self, zone: &Zone) {
        if let DragPhase::Dragging(session) = &mut self.phase {
            session.over_zones.retain(|z| z != zone);
        }
    }

    /// Where the placeholder would go for this pointer position, if that
    /// differs from where it is now
    pub fn next_placeholder(
        &self,
        zone: &Zone,
        pointer_y: f64,
        siblings: &[SiblingBox<Id>],
    ) -> Option<Placeholder<Zone>> {
        let session = self.session()?;
        let index = insertion_index(siblings, &session.item, pointer_y);
        let next = Placeholder { zone: zone.clone(), index };
        (next != session.placeholder).then_some(next)
    }

    pub fn move_placeholder(&mut self, placeholder: Placeholder<Zone>) {
        if let DragPhase::Dragging(session) = &mut self.phase {
            session.placeholder = placeholder;
        }
    }

    /// Pointer moved over `zone`. Returns the new placeholder only when it
    /// actually moved.
    pub fn drag_over(
        &mut self,
        zone: Zone,
        pointer_y: f64,
        siblings: &[SiblingBox<Id>],
    ) -> Option<Placeholder<Zone>> {
        let next = self.next_placeholder(&zone, pointer_y, siblings);
        self.enter_zone(zone);
        if let Some(placeholder) = &next {
            self.move_placeholder(placeholder.clone());
        }
        next
    }

    /// Dragging -> Settling (or Idle for a drop in place).
    ///
    /// Dropping on a zone the placeholder never visited appends.
    pub fn drop(&mut self, zone: Zone) -> Result<DropResult<Id, Zone>, DragError> {
        let session = match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Dragging(session) => session,
            other => {
                self.phase = other;
                return Err(DragError::NotDragging);
            }
        };

        let index = if session.placeholder.zone == zone {
            session.placeholder.index
        } else {
            usize::MAX
        };
        let noop = zone == session.origin_zone && index == session.origin_index;

        if !noop {
            self.phase = DragPhase::Settling {
                item: session.item.clone(),
                zone: zone.clone(),
            };
        }

        Ok(DropResult {
            item: session.item,
            origin_zone: session.origin_zone,
            origin_index: session.origin_index,
            zone,
            index,
            noop,
        })
    }

    /// Settling -> Idle once the drop transition has played
    pub fn settle(&mut self) -> bool {
        if self.is_settling() {
            self.phase = DragPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Dragging -> Idle without a drop. Returns the discarded session.
    pub fn cancel(&mut self) -> Option<DragSession<Id, Zone>> {
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Dragging(session) => Some(session),
            other => {
                self.phase = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Controller = DragController<&'static str, u8>;

    fn column() -> Vec<SiblingBox<&'static str>> {
        // Three cards, 40px tall, 10px apart
        vec![
            SiblingBox { id: "a", top: 0.0, height: 40.0 },
            SiblingBox { id: "b", top: 50.0, height: 40.0 },
            SiblingBox { id: "c", top: 100.0, height: 40.0 },
        ]
    }

    fn size() -> BoxSize {
        BoxSize { width: 200.0, height: 40.0 }
    }

    #[test]
    fn test_insertion_index() {
        let siblings = column();
        // Dragging "a": the others are [b, c]
        assert_eq!(insertion_index(&siblings, &"a", 10.0), 0);
        assert_eq!(insertion_index(&siblings, &"a", 80.0), 1);
        assert_eq!(insertion_index(&siblings, &"a", 130.0), 2);
        // Pointer exactly on a midpoint goes after it
        assert_eq!(insertion_index(&siblings, &"x", 70.0), 2);
        assert_eq!(insertion_index(&[], &"a", 10.0), 0);
    }

    #[test]
    fn test_start_then_reveal() {
        let mut dnd = Controller::new();
        let session = dnd.start("a", 0, 0, size()).unwrap();
        assert!(!session.revealed);
        assert_eq!(session.placeholder, Placeholder { zone: 0, index: 0 });
        // Nothing visible until the next frame
        assert_eq!(dnd.placeholder_in(&0), None);
        assert_eq!(dnd.dimmed_item(), None);

        assert!(dnd.reveal());
        assert!(!dnd.reveal());
        assert_eq!(dnd.placeholder_in(&0), Some(0));
        assert_eq!(dnd.dimmed_item(), Some(&"a"));
    }

    #[test]
    fn test_second_start_is_busy() {
        let mut dnd = Controller::new();
        dnd.start("a", 0, 0, size()).unwrap();
        assert_eq!(dnd.start("b", 0, 1, size()).unwrap_err(), DragError::Busy);
    }

    #[test]
    fn test_drag_over_reports_only_moves() {
        let mut dnd = Controller::new();
        dnd.start("a", 0, 0, size()).unwrap();
        let siblings = column();

        assert_eq!(dnd.drag_over(0, 10.0, &siblings), None);
        assert_eq!(dnd.drag_over(0, 130.0, &siblings), Some(Placeholder { zone: 0, index: 2 }));
        assert_eq!(dnd.drag_over(0, 135.0, &siblings), None);
        assert!(dnd.is_over(&0));
        assert_eq!(dnd.drag_over(1, 0.0, &[]), Some(Placeholder { zone: 1, index: 0 }));
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let mut dnd = Controller::new();
        dnd.start("b", 0, 1, size()).unwrap();
        let result = dnd.drop(0).unwrap();
        assert!(result.noop);
        assert_eq!(dnd.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_drop_settles_and_blocks_new_drags() {
        let mut dnd = Controller::new();
        dnd.start("a", 0, 0, size()).unwrap();
        dnd.enter_zone(1);
        dnd.drag_over(1, 0.0, &[]);
        let result = dnd.drop(1).unwrap();
        assert_eq!((result.zone, result.index, result.noop), (1, 0, false));
        assert!(!dnd.is_over(&1));

        assert_eq!(dnd.settling_item(), Some(&"a"));
        assert_eq!(dnd.start("b", 0, 0, size()).unwrap_err(), DragError::Busy);
        assert!(dnd.settle());
        assert!(dnd.start("b", 0, 0, size()).is_ok());
    }

    #[test]
    fn test_drop_on_unvisited_zone_appends() {
        let mut dnd = Controller::new();
        dnd.start("a", 0, 0, size()).unwrap();
        let result = dnd.drop(3).unwrap();
        assert_eq!(result.index, usize::MAX);
        assert!(!result.noop);
    }

    #[test]
    fn test_cancel() {
        let mut dnd = Controller::new();
        assert_eq!(dnd.cancel(), None);
        dnd.start("a", 0, 0, size()).unwrap();
        dnd.enter_zone(2);
        let session = dnd.cancel().unwrap();
        assert_eq!(session.item, "a");
        assert_eq!(dnd.phase(), &DragPhase::Idle);
        assert_eq!(dnd.drop(0).unwrap_err(), DragError::NotDragging);
    }

    #[test]
    fn test_cancel_does_not_interrupt_settling() {
        let mut dnd = Controller::new();
        dnd.start("a", 0, 0, size()).unwrap();
        dnd.drop(1).unwrap();
        assert_eq!(dnd.cancel(), None);
        assert!(dnd.is_settling());
    }
}
