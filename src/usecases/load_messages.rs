use crate::domain::{
    ids::ChannelId,
    message::{MessageRecord, User},
};

pub const DEFAULT_MESSAGES_PAGE_SIZE: usize = 50;
const MAX_MESSAGES_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesQuery {
    pub channel_id: ChannelId,
    pub limit: usize,
}

impl LoadMessagesQuery {
    pub fn new(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            limit: DEFAULT_MESSAGES_PAGE_SIZE,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn normalized_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_MESSAGES_PAGE_SIZE,
            value if value > MAX_MESSAGES_PAGE_SIZE => MAX_MESSAGES_PAGE_SIZE,
            value => value,
        }
    }
}

/// The most recent page of a channel, newest message first, together with
/// the authors referenced by it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessagePage {
    pub messages: Vec<MessageRecord>,
    pub authors: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagesSourceError {
    Unauthorized,
    Unavailable,
    ChannelNotFound,
}

pub trait MessagesSource {
    fn list_messages(
        &self,
        channel_id: &ChannelId,
        limit: usize,
    ) -> Result<MessagePage, MessagesSourceError>;
}

impl<T> MessagesSource for &T
where
    T: MessagesSource + ?Sized,
{
    fn list_messages(
        &self,
        channel_id: &ChannelId,
        limit: usize,
    ) -> Result<MessagePage, MessagesSourceError> {
        (*self).list_messages(channel_id, limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadMessagesError {
    #[error("not authorized to read this channel")]
    Unauthorized,
    #[error("message history is temporarily unavailable")]
    TemporarilyUnavailable,
    #[error("message history violated the data contract")]
    DataContractViolation,
    #[error("channel not found")]
    ChannelNotFound,
}

pub fn load_messages(
    source: &dyn MessagesSource,
    query: LoadMessagesQuery,
) -> Result<MessagePage, LoadMessagesError> {
    let limit = query.normalized_limit();
    let page = source
        .list_messages(&query.channel_id, limit)
        .map_err(map_source_error)?;

    if page.messages.len() > limit {
        return Err(LoadMessagesError::DataContractViolation);
    }

    Ok(page)
}

fn map_source_error(error: MessagesSourceError) -> LoadMessagesError {
    match error {
        MessagesSourceError::Unauthorized => LoadMessagesError::Unauthorized,
        MessagesSourceError::Unavailable => LoadMessagesError::TemporarilyUnavailable,
        MessagesSourceError::ChannelNotFound => LoadMessagesError::ChannelNotFound,
    }
}
