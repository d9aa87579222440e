//! Use case for posting a message to a channel.
//!
//! Failures are reported to the caller as-is; nothing is retried here.

use crate::domain::{ids::ChannelId, message::MessageRecord};

/// Command to send a message to a specific channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub channel_id: ChannelId,
    pub content: String,
}

/// Errors reported by the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageSourceError {
    /// No signed-in session.
    Unauthorized,
    /// Target channel was not found or is not accessible.
    ChannelNotFound,
    /// Transport failure; the message was not delivered.
    Unavailable,
}

/// Domain-level errors for the send operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendMessageError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("not authorized to send messages")]
    Unauthorized,
    #[error("channel not found")]
    ChannelNotFound,
    #[error("message could not be delivered, try again")]
    TemporarilyUnavailable,
}

pub trait MessageSender {
    /// Posts `content` to the channel and returns the record the SDK created.
    fn send_message(
        &self,
        channel_id: &ChannelId,
        content: &str,
    ) -> Result<MessageRecord, SendMessageSourceError>;
}

impl<T: MessageSender + ?Sized> MessageSender for &T {
    fn send_message(
        &self,
        channel_id: &ChannelId,
        content: &str,
    ) -> Result<MessageRecord, SendMessageSourceError> {
        (*self).send_message(channel_id, content)
    }
}

/// Sends a message to the specified channel.
///
/// Content is trimmed; blank content is rejected without reaching the SDK.
pub fn send_message(
    sender: &dyn MessageSender,
    command: SendMessageCommand,
) -> Result<MessageRecord, SendMessageError> {
    let content = command.content.trim();
    if content.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    sender
        .send_message(&command.channel_id, content)
        .map_err(map_source_error)
}

fn map_source_error(error: SendMessageSourceError) -> SendMessageError {
    match error {
        SendMessageSourceError::Unauthorized => SendMessageError::Unauthorized,
        SendMessageSourceError::ChannelNotFound => SendMessageError::ChannelNotFound,
        SendMessageSourceError::Unavailable => SendMessageError::TemporarilyUnavailable,
    }
}
