use serde::{Deserialize, Serialize};

use super::ids::ChannelId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

impl Channel {
    /// Header title, e.g. `#general`.
    pub fn title(&self) -> String {
        format!("#{}", self.name)
    }
}
