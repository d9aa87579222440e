use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        calendar::{CalendarZone, InvalidCalendarZone},
        grouping::{GroupingPolicy, DEFAULT_TAIL_WINDOW_MINUTES},
        typing_state::{
            TypingTimings, DEFAULT_TYPING_IDLE_TIMEOUT_MS, DEFAULT_TYPING_SEND_INTERVAL_MS,
        },
    },
    usecases::load_messages::DEFAULT_MESSAGES_PAGE_SIZE,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub grouping: GroupingConfig,
    pub typing: TypingConfig,
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupingConfig {
    /// Gap in minutes at which consecutive messages stop being grouped.
    pub tail_window_minutes: u32,
    /// `local`, `utc`, or a fixed offset such as `+02:00`.
    pub timezone: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            tail_window_minutes: DEFAULT_TAIL_WINDOW_MINUTES,
            timezone: "local".to_owned(),
        }
    }
}

impl GroupingConfig {
    pub fn policy(&self) -> GroupingPolicy {
        GroupingPolicy {
            tail_window_minutes: self.tail_window_minutes,
        }
    }

    pub fn zone(&self) -> Result<CalendarZone, InvalidCalendarZone> {
        self.timezone.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypingConfig {
    pub send_interval_ms: u64,
    pub idle_timeout_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            send_interval_ms: DEFAULT_TYPING_SEND_INTERVAL_MS,
            idle_timeout_ms: DEFAULT_TYPING_IDLE_TIMEOUT_MS,
        }
    }
}

impl TypingConfig {
    pub fn timings(&self) -> TypingTimings {
        TypingTimings {
            send_interval_ms: self.send_interval_ms,
            idle_timeout_ms: self.idle_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagesConfig {
    pub page_size: usize,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_MESSAGES_PAGE_SIZE,
        }
    }
}
