use std::sync::mpsc;

use crate::domain::{
    channel::Channel, channel_view_state::ChannelViewState, events::ClientEvent,
    session_state::SessionState,
};

use super::{
    contracts::{ClientEvents, Subscription},
    load_messages::{load_messages, LoadMessagesQuery, MessagesSource},
};

const CHANNEL_OPENED: &str = "CHANNEL_SESSION_OPENED";
const CHANNEL_LOAD_FAILED: &str = "CHANNEL_SESSION_LOAD_FAILED";

/// Open channel bound to the SDK's event stream.
///
/// Events are queued by the SDK and folded into the view state by
/// [`ChannelSession::pump`], so all state changes happen on the caller's
/// thread. Dropping the session unregisters its listener.
#[derive(Debug)]
pub struct ChannelSession {
    view: ChannelViewState,
    session: SessionState,
    events: mpsc::Receiver<ClientEvent>,
    subscription: Subscription,
}

impl ChannelSession {
    /// Subscribes first and loads the most recent page second, so that no
    /// message created in between is lost. Overlap is removed by id.
    pub fn open<C>(client: &C, channel: Channel, session: SessionState, page_size: usize) -> Self
    where
        C: MessagesSource + ClientEvents,
    {
        let (tx, rx) = mpsc::channel();
        let subscription = client.subscribe(Box::new(tx));

        let mut view = ChannelViewState::default();
        let channel_id = channel.id.clone();
        view.set_loading(channel);

        let query = LoadMessagesQuery::new(channel_id.clone()).with_limit(page_size);
        match load_messages(client, query) {
            Ok(page) => {
                tracing::info!(
                    code = CHANNEL_OPENED,
                    channel_id = %channel_id,
                    messages = page.messages.len(),
                    "channel opened"
                );
                view.set_ready(page.messages, page.authors);
            }
            Err(error) => {
                tracing::warn!(
                    code = CHANNEL_LOAD_FAILED,
                    channel_id = %channel_id,
                    error = %error,
                    "failed to load channel history"
                );
                view.set_error();
            }
        }

        Self {
            view,
            session,
            events: rx,
            subscription,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn view(&self) -> &ChannelViewState {
        &self.view
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Applies every queued event; returns how many changed the view.
    pub fn pump(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(event) = self.events.try_recv() {
            tracing::trace!(event = event.kind(), "client event received");
            self.session.apply(&event);
            if self.view.apply(&event) {
                changed += 1;
            }
        }
        changed
    }

    /// Unregisters from the SDK and returns the final view state.
    pub fn close(self) -> ChannelViewState {
        self.subscription.unsubscribe();
        self.view
    }
}
