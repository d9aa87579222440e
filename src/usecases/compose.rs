//! Compose box for one channel: draft text, typing notifications and send.

use crate::domain::{
    ids::ChannelId,
    message::MessageRecord,
    typing_state::{TypingCommand, TypingThrottle, TypingTimings},
};

use super::send_message::{send_message, MessageSender, SendMessageCommand, SendMessageError};

const TYPING_NOTIFY_FAILED: &str = "COMPOSE_TYPING_NOTIFY_FAILED";
const SEND_FAILED: &str = "COMPOSE_SEND_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingSourceError {
    Unauthorized,
    Unavailable,
}

pub trait TypingSource {
    fn start_typing(&self, channel_id: &ChannelId) -> Result<(), TypingSourceError>;
    fn stop_typing(&self, channel_id: &ChannelId) -> Result<(), TypingSourceError>;
}

impl<T: TypingSource + ?Sized> TypingSource for &T {
    fn start_typing(&self, channel_id: &ChannelId) -> Result<(), TypingSourceError> {
        (*self).start_typing(channel_id)
    }

    fn stop_typing(&self, channel_id: &ChannelId) -> Result<(), TypingSourceError> {
        (*self).stop_typing(channel_id)
    }
}

pub struct ComposeSession<C>
where
    C: MessageSender + TypingSource,
{
    client: C,
    channel_id: ChannelId,
    draft: String,
    throttle: TypingThrottle,
}

impl<C> ComposeSession<C>
where
    C: MessageSender + TypingSource,
{
    pub fn new(client: C, channel_id: ChannelId, timings: TypingTimings) -> Self {
        Self {
            client,
            channel_id,
            draft: String::new(),
            throttle: TypingThrottle::new(timings),
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    pub fn is_typing(&self) -> bool {
        self.throttle.is_typing()
    }

    /// Replaces the draft with `text`, as typed at `now_ms`.
    pub fn edit(&mut self, text: impl Into<String>, now_ms: u64) {
        self.draft = text.into();
        let command = self.throttle.on_input(&self.draft, now_ms);
        self.dispatch(command);
    }

    /// Advances the idle timer.
    pub fn tick(&mut self, now_ms: u64) {
        let command = self.throttle.on_tick(now_ms);
        self.dispatch(command);
    }

    /// Sends the draft. The draft is cleared only when the SDK accepted it.
    pub fn submit(&mut self) -> Result<MessageRecord, SendMessageError> {
        if !self.can_send() {
            return Err(SendMessageError::EmptyMessage);
        }

        let command = self.throttle.on_send();
        self.dispatch(command);

        let result = send_message(
            &self.client,
            SendMessageCommand {
                channel_id: self.channel_id.clone(),
                content: self.draft.clone(),
            },
        );

        match &result {
            Ok(record) => {
                tracing::debug!(
                    message_id = %record.id,
                    channel_id = %self.channel_id,
                    "message sent"
                );
                self.draft.clear();
            }
            Err(error) => {
                tracing::warn!(
                    code = SEND_FAILED,
                    channel_id = %self.channel_id,
                    error = %error,
                    "message send failed; draft kept"
                );
            }
        }

        result
    }

    /// Stops typing before the compose box goes away.
    pub fn close(mut self) {
        let command = self.throttle.on_close();
        self.dispatch(command);
    }

    fn dispatch(&self, command: Option<TypingCommand>) {
        let Some(command) = command else {
            return;
        };

        let result = match command {
            TypingCommand::Start => self.client.start_typing(&self.channel_id),
            TypingCommand::Stop => self.client.stop_typing(&self.channel_id),
        };

        if let Err(error) = result {
            tracing::warn!(
                code = TYPING_NOTIFY_FAILED,
                channel_id = %self.channel_id,
                command = ?command,
                error = ?error,
                "typing notification failed"
            );
        }
    }
}
