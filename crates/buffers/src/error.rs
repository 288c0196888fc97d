//! Cursor error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("unexpected end of input")]
    OutOfData,
    #[error("invalid fixed integer width: {0}")]
    InvalidWidth(usize),
}
