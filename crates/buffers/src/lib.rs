//! Checked binary buffer reading utilities for abicodec.
//!
//! # Overview
//!
//! - [`ByteCursor`] - Sequential, forward-only reader over a byte slice
//! - [`WideInt`] - Two's-complement multi-byte integer for 64/128/256-bit
//!   wire values
//!
//! # Example
//!
//! ```
//! use abicodec_buffers::ByteCursor;
//!
//! let data = [0x80, 0x01, 0x03, b'a', b'b', b'c'];
//! let mut cursor = ByteCursor::new(&data);
//!
//! assert_eq!(cursor.read_varuint32().unwrap(), 128);
//! assert_eq!(cursor.read_text().unwrap(), "abc");
//! ```

mod cursor;
mod error;
mod wide_int;

pub use cursor::ByteCursor;
pub use error::CursorError;
pub use wide_int::WideInt;
