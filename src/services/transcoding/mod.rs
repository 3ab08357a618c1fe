mod encoder;
mod orchestrator;
mod retry;

pub use encoder::*;
pub use orchestrator::*;
pub use retry::*;

use crate::error::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum TranscodeError {
    #[error("Invalid resolution `{0}`, expected a value like 720p")]
    InvalidResolution(String),
    #[error("At least one resolution is required")]
    NoResolutions,
    #[error("Transcode queue is full")]
    QueueFull,
    #[error("Transcode queue is closed")]
    QueueClosed,
    #[error("Encoder failed: {0}")]
    Encoder(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
