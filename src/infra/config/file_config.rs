use serde::Deserialize;

use crate::infra::config::{AppConfig, GroupingConfig, LogConfig, MessagesConfig, TypingConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub grouping: Option<FileGroupingConfig>,
    pub typing: Option<FileTypingConfig>,
    pub messages: Option<FileMessagesConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(grouping) = self.grouping {
            grouping.merge_into(&mut config.grouping);
        }

        if let Some(typing) = self.typing {
            typing.merge_into(&mut config.typing);
        }

        if let Some(messages) = self.messages {
            messages.merge_into(&mut config.messages);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileGroupingConfig {
    pub tail_window_minutes: Option<u32>,
    pub timezone: Option<String>,
}

impl FileGroupingConfig {
    fn merge_into(self, config: &mut GroupingConfig) {
        if let Some(minutes) = self.tail_window_minutes {
            config.tail_window_minutes = minutes;
        }

        if let Some(timezone) = self.timezone {
            config.timezone = timezone;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTypingConfig {
    pub send_interval_ms: Option<u64>,
    pub idle_timeout_ms: Option<u64>,
}

impl FileTypingConfig {
    fn merge_into(self, config: &mut TypingConfig) {
        if let Some(interval) = self.send_interval_ms {
            config.send_interval_ms = interval;
        }

        if let Some(timeout) = self.idle_timeout_ms {
            config.idle_timeout_ms = timeout;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileMessagesConfig {
    pub page_size: Option<usize>,
}

impl FileMessagesConfig {
    fn merge_into(self, config: &mut MessagesConfig) {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
    }
}
