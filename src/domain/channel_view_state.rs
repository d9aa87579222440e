use std::collections::HashMap;

use super::{
    calendar::CalendarZone,
    channel::Channel,
    events::ClientEvent,
    grouping::{group_messages, GroupingPolicy, RenderDirective, TranscriptOrder},
    ids::{ChannelId, UserId},
    message::{MessageRecord, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelUiState {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Distance from the bottom (in pixels) under which the view keeps following
/// new messages.
const STICK_TO_BOTTOM_THRESHOLD_PX: u32 = 50;

/// State of the currently open channel: transcript, authors, typing users and
/// scroll anchoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelViewState {
    channel: Option<Channel>,
    messages: Vec<MessageRecord>,
    authors: HashMap<UserId, User>,
    typing: Vec<UserId>,
    ui_state: ChannelUiState,
    scrolled_up: bool,
}

impl Default for ChannelViewState {
    fn default() -> Self {
        Self {
            channel: None,
            messages: Vec::new(),
            authors: HashMap::new(),
            typing: Vec::new(),
            ui_state: ChannelUiState::Empty,
            scrolled_up: false,
        }
    }
}

impl ChannelViewState {
    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel.as_ref().map(|channel| &channel.id)
    }

    /// Messages in display order (oldest first).
    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    pub fn author(&self, id: &UserId) -> Option<&User> {
        self.authors.get(id)
    }

    pub fn ui_state(&self) -> ChannelUiState {
        self.ui_state
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    pub fn set_loading(&mut self, channel: Channel) {
        self.channel = Some(channel);
        self.messages.clear();
        self.authors.clear();
        self.typing.clear();
        self.ui_state = ChannelUiState::Loading;
        self.scrolled_up = false;
    }

    /// Stores a freshly fetched page. The SDK returns the most recent page
    /// newest-first; the state keeps it oldest-first.
    pub fn set_ready(&mut self, mut newest_first: Vec<MessageRecord>, authors: Vec<User>) {
        newest_first.reverse();
        self.messages = newest_first;
        for author in authors {
            self.remember_user(author);
        }
        self.ui_state = ChannelUiState::Ready;
    }

    pub fn set_error(&mut self) {
        self.ui_state = ChannelUiState::Error;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn remember_user(&mut self, user: User) {
        self.authors.insert(user.id.clone(), user);
    }

    /// Applies an SDK event. Events for other channels are ignored; returns
    /// whether the state changed.
    pub fn apply(&mut self, event: &ClientEvent) -> bool {
        let Some(open_id) = self.channel_id() else {
            return false;
        };
        if event.channel_id() != Some(open_id) {
            return false;
        }

        match event {
            ClientEvent::MessageCreated(record) => {
                if self.messages.iter().any(|known| known.id == record.id) {
                    return false;
                }
                self.messages.push(record.clone());
                true
            }
            ClientEvent::TypingStarted {
                user_id: Some(user_id),
                ..
            } => {
                if self.typing.contains(user_id) {
                    return false;
                }
                self.typing.push(user_id.clone());
                true
            }
            ClientEvent::TypingStarted { user_id: None, .. } => false,
            ClientEvent::TypingStopped {
                user_id: Some(user_id),
                ..
            } => {
                let before = self.typing.len();
                self.typing.retain(|id| id != user_id);
                before != self.typing.len()
            }
            ClientEvent::TypingStopped { user_id: None, .. } => {
                let changed = !self.typing.is_empty();
                self.typing.clear();
                changed
            }
            ClientEvent::Ready { .. } | ClientEvent::LoggedOut => false,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn typing_users(&self) -> &[UserId] {
        &self.typing
    }

    /// Usernames of typing users, in the order they started typing.
    pub fn typing_names(&self) -> Vec<String> {
        self.typing
            .iter()
            .map(|id| {
                self.authors
                    .get(id)
                    .map(|user| user.username.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect()
    }

    pub fn directives(&self, zone: &CalendarZone, policy: &GroupingPolicy) -> Vec<RenderDirective> {
        group_messages(&self.messages, TranscriptOrder::OldestFirst, zone, policy)
    }

    /// Records the viewport position after a scroll.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn on_scroll(&mut self, scroll_top: u32, scroll_height: u32, client_height: u32) {
        let distance_to_bottom = scroll_height
            .saturating_sub(scroll_top)
            .saturating_sub(client_height);
        self.scrolled_up = distance_to_bottom >= STICK_TO_BOTTOM_THRESHOLD_PX;
    }

    /// Whether new messages should scroll the view to the bottom.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn should_stick_to_bottom(&self) -> bool {
        !self.scrolled_up
    }
}
