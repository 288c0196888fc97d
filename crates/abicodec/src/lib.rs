//! Schema-driven ABI codec.
//!
//! Decodes a compact binary wire format or a generic JSON-like value
//! tree into typed values, driven by a type schema ("ABI") describing
//! primitives, structs, tagged unions, aliases, optional values and
//! arrays.
//!
//! # Overview
//!
//! - [`Abi`] - The schema document model and type resolution
//! - [`AbiValue`] - Generic tree-shaped decoded value
//! - [`CustomType`] - Per-type capability bundle (self-decode,
//!   construct, instance test, schema synthesis)
//! - [`decode`] - The decode facade over the binary and tree drivers
//!
//! # Example
//!
//! ```
//! use abicodec::{decode, Abi, AbiValue, DecodeArgs};
//!
//! let abi = Abi::from_json(r#"{
//!     "structs": [{"name": "point", "fields": [
//!         {"name": "x", "type": "uint32"},
//!         {"name": "y", "type": "string"}
//!     ]}]
//! }"#).unwrap();
//!
//! let data = [0x01, 0x00, 0x00, 0x00, 0x03, b'a', b'b', b'c'];
//! let value = decode(DecodeArgs {
//!     abi: Some(abi),
//!     data: Some(&data),
//!     ..DecodeArgs::new("point")
//! }).unwrap();
//!
//! assert_eq!(value.get("x"), Some(&AbiValue::UInt(1)));
//! assert_eq!(value.get("y"), Some(&AbiValue::Str("abc".to_owned())));
//! ```

mod abi;
mod builtins;
mod context;
mod decoder;
mod error;
mod types;
mod value;

pub use abi::{
    Abi, Field, ResolvedField, ResolvedSchema, ResolvedType, Struct, TypeAlias, TypeId, Variant,
};
pub use builtins::Builtin;
pub use context::{DecodingContext, PathEntry, PathField, MAX_CODING_PATH_DEPTH};
pub use decoder::{decode, DecodeArgs, TypeSelector};
pub use error::DecodeError;
pub use types::{resolve_aliases, AbiSynthesis, CustomType, ResolvedAlias, TypeLookup};
pub use value::{decode_hex, encode_hex, AbiValue};

pub use abicodec_buffers::{ByteCursor, CursorError, WideInt};
