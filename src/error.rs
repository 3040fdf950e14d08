use std::{fmt::Display, path::PathBuf};

pub type AppResult<T> = Result<T, AppErr>;

#[derive(thiserror::Error, Debug)]
pub enum AppErr {
    #[error("config: {0}")]
    Config(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("transcript {}: {source}", path.display())]
    Transcript {
        path:   PathBuf,
        source: std::io::Error,
    },
}

/* ── helper: any message into Config ── */
pub fn config<E: Display>(e: E) -> AppErr { AppErr::Config(e.to_string()) }
