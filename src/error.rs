use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("no filename bound to the buffer")]
    NoFilename,

    #[error("input stream closed")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
