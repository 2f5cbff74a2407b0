//! # desim-engine::event
//!
//! Defines the `Event` type and the `EventHandle` used to cancel it, plus
//! the total ordering over `(due_at, priority, id)` that the future-event
//! set sorts by.

use crate::errors::ActionResult;
use crate::scheduler::Scheduler;
use desim_types::id::{EventId, Priority};
use desim_types::time::SimTime;
use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::{Rc, Weak};

/// The action bound to an event: invoked with exclusive access to the
/// model state and the scheduler, once, when the event fires.
pub type Action<S> = Box<dyn FnMut(&mut S, &mut Scheduler<S>) -> ActionResult>;

/// The ordering key used everywhere events are compared: `due_at` ascending,
/// then `priority` ascending (lower value = higher priority), then `id`
/// ascending (earlier-scheduled first). Two distinct live events never
/// compare equal under this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKey {
    pub due_at: SimTime,
    pub priority: Priority,
    pub id: EventId,
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_at
            .cmp(&other.due_at)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// A scheduled, immutable (apart from liveness) event. User code never
/// constructs one directly; it is returned only as an `EventHandle`.
pub struct Event<S> {
    key: EventKey,
    action: Action<S>,
    alive: Rc<Cell<bool>>,
}

impl<S> Event<S> {
    pub(crate) fn new(key: EventKey, action: Action<S>) -> (Self, EventHandle) {
        let alive = Rc::new(Cell::new(true));
        let handle = EventHandle {
            id: key.id,
            alive: Rc::downgrade(&alive),
        };
        (Self { key, action, alive }, handle)
    }

    pub fn id(&self) -> EventId {
        self.key.id
    }

    pub fn due_at(&self) -> SimTime {
        self.key.due_at
    }

    pub fn priority(&self) -> Priority {
        self.key.priority
    }

    pub fn key(&self) -> EventKey {
        self.key
    }

    /// Whether this event has not been cancelled. Checked lazily by the
    /// future-event set before dispatch; cancellation never touches the
    /// heap itself.
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub(crate) fn into_action(self) -> Action<S> {
        self.action
    }
}

impl<S> PartialEq for Event<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<S> Eq for Event<S> {}

impl<S> PartialOrd for Event<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Event<S> {
    /// `BinaryHeap` is a max-heap; reversing the key comparison here turns
    /// it into the min-heap the future-event set needs, so the smallest
    /// `(due_at, priority, id)` tuple is always popped first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key.cmp(&self.key)
    }
}

/// A lightweight, cloneable reference to a scheduled event, usable only to
/// cancel it. Does not own the event: once the event has fired (or the
/// `Event` itself has been dropped for any other reason), the weak
/// reference fails to upgrade and `cancel` becomes a harmless no-op.
#[derive(Clone)]
pub struct EventHandle {
    id: EventId,
    alive: Weak<Cell<bool>>,
}

impl EventHandle {
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Marks the referenced event cancelled. Idempotent; cancelling an
    /// already-fired or already-cancelled event silently does nothing.
    pub fn cancel(&self) {
        if let Some(alive) = self.alive.upgrade() {
            alive.set(false);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self.alive.upgrade() {
            Some(alive) => !alive.get(),
            None => true,
        }
    }
}

impl std::fmt::Debug for EventHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(due_at: SimTime, priority: Priority, id: EventId) -> EventKey {
        EventKey { due_at, priority, id }
    }

    #[test]
    fn orders_by_due_at_first() {
        assert!(key(1, 5, 0) < key(2, 0, 0));
    }

    #[test]
    fn orders_by_priority_on_time_tie() {
        assert!(key(5, 0, 100) < key(5, 1, 0));
    }

    #[test]
    fn orders_by_id_on_full_tie() {
        assert!(key(5, 0, 1) < key(5, 0, 2));
    }

    #[test]
    fn cancel_is_idempotent_and_handle_survives_drop() {
        let (event, handle): (Event<()>, EventHandle) =
            Event::new(key(0, 0, 0), Box::new(|_, _| Ok(())));
        assert!(event.is_alive());
        handle.cancel();
        assert!(!event.is_alive());
        handle.cancel();
        assert!(!event.is_alive());

        drop(event);
        // Cancelling after the event itself is gone must not panic.
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
