//! UI-state primitives shared by the Lendsqr dashboard views.
//!
//! - [`TaskSlot`] hands out generation-tagged [`TaskHandle`]s so a view can tell
//!   a fresh async result from a stale one, and cancel work it no longer wants.
//! - [`InteractionBus`] broadcasts "something happened outside" events to
//!   transient UI state (an open row menu) that subscribes only while it is open.

mod interaction;
mod task;

pub use interaction::{Interaction, InteractionBus, Subscription};
pub use task::{TaskHandle, TaskId, TaskSlot};
