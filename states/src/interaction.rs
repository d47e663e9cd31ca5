//! Outside-interaction broadcast with subscriptions scoped to their owner.
//!
//! Transient UI state (an open row action menu, a popover) should close when
//! the user interacts anywhere else or focus leaves the view. The owner of that
//! state subscribes while it is open and drops the [`Subscription`] when it
//! closes; the bus forgets disconnected subscribers on the next emit.

use flume::{Receiver, Sender, TryRecvError};
use log::trace;

/// An interaction that happened outside the subscriber's own element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// A click or key press landed elsewhere in the view.
    OutsideClick,
    /// The view lost focus.
    FocusLost,
}

/// Fan-out of [`Interaction`]s to current subscribers.
#[derive(Debug, Default)]
pub struct InteractionBus {
    subscribers: Vec<Sender<Interaction>>,
}

impl InteractionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber. Dropping the returned value unsubscribes it.
    ///
    /// Subscribers dropped since the last call are forgotten here.
    pub fn subscribe(&mut self) -> Subscription {
        self.subscribers
            .retain(|subscriber| !subscriber.is_disconnected());
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        Subscription { receiver: rx }
    }

    /// Delivers `interaction` to every live subscriber.
    pub fn emit(&mut self, interaction: Interaction) {
        self.subscribers
            .retain(|subscriber| subscriber.send(interaction).is_ok());
        trace!(
            "InteractionBus: delivered {interaction:?} to {} subscriber(s)",
            self.subscribers.len()
        );
    }

    /// Number of subscribers still registered.
    ///
    /// Dropped subscriptions are pruned on the next [`emit`](Self::emit) or
    /// [`subscribe`](Self::subscribe).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|subscriber| !subscriber.is_disconnected())
            .count()
    }
}

/// Receiving end of an [`InteractionBus`] subscription.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Interaction>,
}

impl Subscription {
    /// Drains pending interactions, returning the first one seen.
    pub fn take_pending(&self) -> Option<Interaction> {
        let mut first = None;
        loop {
            match self.receiver.try_recv() {
                Ok(interaction) => {
                    first.get_or_insert(interaction);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return first,
            }
        }
    }
}
