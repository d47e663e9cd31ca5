//! Generation-tagged task handles with cooperative cancellation.
//!
//! A view that starts async work (a users fetch) asks its [`TaskSlot`] for a
//! [`TaskHandle`]. Issuing a new handle cancels the previous one, and only the
//! most recent, non-cancelled handle is accepted back when the work completes.
//! This keeps a slow, superseded response from overwriting fresher state, and
//! lets a view that goes away drop whatever is still in flight.
//!
//! ```ignore
//! let mut slot = TaskSlot::new::<Dashboard>();
//! let first = slot.issue();
//! let second = slot.issue();
//!
//! assert!(first.is_cancelled());
//! assert!(!slot.finish(first.id()));
//! assert!(slot.finish(second.id()));
//! ```

use std::any::TypeId;

use log::debug;
use tokio_util::sync::CancellationToken;

/// Unique identifier for an issued task.
///
/// Combines the `TypeId` of the owner (which view started it) with a
/// generation counter. Higher generations were issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self { type_id, generation }
    }

    /// Returns the `TypeId` of the owner that issued this task.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to an issued task.
///
/// Cloning shares the cancellation token: cancelling any clone cancels all of
/// them. The work itself must check the token (`tokio::select!` on
/// [`CancellationToken::cancelled`]); nothing is aborted forcibly.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns a clone of the cancellation token to hand to async work.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// Issues task handles for one owner and remembers which one is current.
#[derive(Debug)]
pub struct TaskSlot {
    owner: TypeId,
    generation: u64,
    current: Option<TaskHandle>,
}

impl TaskSlot {
    /// Creates a slot owned by `T`.
    pub fn new<T: 'static>() -> Self {
        Self {
            owner: TypeId::of::<T>(),
            generation: 0,
            current: None,
        }
    }

    /// Issues a new handle, cancelling the one in flight (if any).
    pub fn issue(&mut self) -> TaskHandle {
        if let Some(previous) = self.current.take() {
            debug!(
                "TaskSlot: superseding task generation {}",
                previous.id().generation()
            );
            previous.cancel();
        }

        self.generation += 1;
        let handle = TaskHandle::new(
            TaskId::new(self.owner, self.generation),
            CancellationToken::new(),
        );
        self.current = Some(handle.clone());
        handle
    }

    /// Returns true if `id` is the in-flight task and it was not cancelled.
    pub fn is_current(&self, id: TaskId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| handle.id() == id && !handle.is_cancelled())
    }

    /// Marks `id` as finished.
    ///
    /// Returns false for a stale or cancelled task, whose result must be
    /// discarded. The slot is left untouched in that case.
    pub fn finish(&mut self, id: TaskId) -> bool {
        if self.is_current(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Cancels the in-flight task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
        }
    }

    /// Returns true while an issued task has neither finished nor been cancelled.
    pub fn in_flight(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }
}
