//! Seams towards the chat SDK's event stream.

use std::{fmt, sync::mpsc};

use crate::domain::events::ClientEvent;

/// Receives events pushed by the SDK.
pub trait ClientEventListener {
    fn on_event(&mut self, event: &ClientEvent);
}

/// Forwards events into a channel that the owning view drains on its own
/// schedule.
impl ClientEventListener for mpsc::Sender<ClientEvent> {
    fn on_event(&mut self, event: &ClientEvent) {
        if self.send(event.clone()).is_err() {
            tracing::debug!(
                event = event.kind(),
                "client event dropped: receiving side is gone"
            );
        }
    }
}

/// Listener registration on the SDK. There is no process-wide bus: every
/// listener belongs to the client it was registered on.
pub trait ClientEvents {
    fn subscribe(&self, listener: Box<dyn ClientEventListener + Send>) -> Subscription;
}

impl<T> ClientEvents for &T
where
    T: ClientEvents + ?Sized,
{
    fn subscribe(&self, listener: Box<dyn ClientEventListener + Send>) -> Subscription {
        (*self).subscribe(listener)
    }
}

/// Handle of a registered listener. Dropping it unregisters the listener.
#[must_use = "dropping a subscription unregisters its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
