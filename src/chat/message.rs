use chrono::{DateTime, Local, Timelike};
use std::fmt;

/// One chat line. Copied by value into every sink it is broadcast to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub user:    String,
    pub time:    DateTime<Local>,
}

impl Message {
    pub fn new(content: impl Into<String>, user: impl Into<String>) -> Self {
        Self { content: content.into(), user: user.into(), time: Local::now() }
    }
}

/// `HH:MM:SS <user> content`, content passed through verbatim.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02} <{}> {}",
            self.time.hour(),
            self.time.minute(),
            self.time.second(),
            self.user,
            self.content,
        )
    }
}
