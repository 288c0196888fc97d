//! Built-in primitive types.

use abicodec_buffers::ByteCursor;

use crate::value::decode_hex;
use crate::{AbiValue, CustomType, DecodeError};

/// The fixed built-in primitive table.
///
/// Every member has a binary self-decoder over the cursor and a value
/// coercion for tree input. Caller-supplied custom types may shadow any
/// of these by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    VarUint32,
    VarInt32,
    Float32,
    Float64,
    Float128,
    Bytes,
    String,
}

impl Builtin {
    pub const ALL: [Builtin; 18] = [
        Builtin::Bool,
        Builtin::Int8,
        Builtin::Int16,
        Builtin::Int32,
        Builtin::Int64,
        Builtin::Int128,
        Builtin::Uint8,
        Builtin::Uint16,
        Builtin::Uint32,
        Builtin::Uint64,
        Builtin::Uint128,
        Builtin::VarUint32,
        Builtin::VarInt32,
        Builtin::Float32,
        Builtin::Float64,
        Builtin::Float128,
        Builtin::Bytes,
        Builtin::String,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Int8 => "int8",
            Builtin::Int16 => "int16",
            Builtin::Int32 => "int32",
            Builtin::Int64 => "int64",
            Builtin::Int128 => "int128",
            Builtin::Uint8 => "uint8",
            Builtin::Uint16 => "uint16",
            Builtin::Uint32 => "uint32",
            Builtin::Uint64 => "uint64",
            Builtin::Uint128 => "uint128",
            Builtin::VarUint32 => "varuint32",
            Builtin::VarInt32 => "varint32",
            Builtin::Float32 => "float32",
            Builtin::Float64 => "float64",
            Builtin::Float128 => "float128",
            Builtin::Bytes => "bytes",
            Builtin::String => "string",
        }
    }

    fn decode_binary(self, cursor: &mut ByteCursor) -> Result<AbiValue, DecodeError> {
        let invalid = DecodeError::InvalidValue {
            expected: self.type_name(),
        };
        Ok(match self {
            Builtin::Bool => AbiValue::Bool(cursor.read_byte()? != 0),
            Builtin::Int8 => AbiValue::Int(cursor.read_fixed_int(1, true)?),
            Builtin::Int16 => AbiValue::Int(cursor.read_fixed_int(2, true)?),
            Builtin::Int32 => AbiValue::Int(cursor.read_fixed_int(4, true)?),
            Builtin::Int64 => {
                AbiValue::Int(cursor.read_big_int(8, true)?.to_i64().ok_or(invalid)?)
            }
            Builtin::Int128 => {
                AbiValue::Int128(cursor.read_big_int(16, true)?.to_i128().ok_or(invalid)?)
            }
            Builtin::Uint8 => AbiValue::UInt(cursor.read_fixed_int(1, false)? as u64),
            Builtin::Uint16 => AbiValue::UInt(cursor.read_fixed_int(2, false)? as u64),
            Builtin::Uint32 => AbiValue::UInt(cursor.read_fixed_int(4, false)? as u64),
            Builtin::Uint64 => {
                AbiValue::UInt(cursor.read_big_int(8, false)?.to_u64().ok_or(invalid)?)
            }
            Builtin::Uint128 => {
                AbiValue::UInt128(cursor.read_big_int(16, false)?.to_u128().ok_or(invalid)?)
            }
            Builtin::VarUint32 => AbiValue::UInt(cursor.read_varuint32()? as u64),
            Builtin::VarInt32 => AbiValue::Int(cursor.read_varint32()? as i64),
            Builtin::Float32 => AbiValue::Float(cursor.read_f32()? as f64),
            Builtin::Float64 => AbiValue::Float(cursor.read_f64()?),
            Builtin::Float128 => AbiValue::Bytes(cursor.read_raw(16)?.to_vec()),
            Builtin::Bytes => {
                let len = cursor.read_varuint32()? as usize;
                AbiValue::Bytes(cursor.read_raw(len)?.to_vec())
            }
            Builtin::String => AbiValue::Str(cursor.read_text()?),
        })
    }

    fn coerce(self, value: AbiValue) -> Option<AbiValue> {
        match self {
            Builtin::Bool => matches!(value, AbiValue::Bool(_)).then_some(value),
            Builtin::Int8 => coerce_int(value, i8::MIN as i64, i8::MAX as i64),
            Builtin::Int16 => coerce_int(value, i16::MIN as i64, i16::MAX as i64),
            Builtin::Int32 | Builtin::VarInt32 => {
                coerce_int(value, i32::MIN as i64, i32::MAX as i64)
            }
            Builtin::Int64 => coerce_int(value, i64::MIN, i64::MAX),
            Builtin::Int128 => coerce_int128(value),
            Builtin::Uint8 => coerce_uint(value, u8::MAX as u64),
            Builtin::Uint16 => coerce_uint(value, u16::MAX as u64),
            Builtin::Uint32 | Builtin::VarUint32 => coerce_uint(value, u32::MAX as u64),
            Builtin::Uint64 => coerce_uint(value, u64::MAX),
            Builtin::Uint128 => coerce_uint128(value),
            Builtin::Float32 | Builtin::Float64 => coerce_float(value),
            Builtin::Float128 => match value {
                AbiValue::Bytes(bytes) if bytes.len() == 16 => Some(AbiValue::Bytes(bytes)),
                AbiValue::Str(text) => {
                    let bytes = decode_hex(&text)?;
                    (bytes.len() == 16).then_some(AbiValue::Bytes(bytes))
                }
                _ => None,
            },
            Builtin::Bytes => match value {
                AbiValue::Bytes(_) => Some(value),
                AbiValue::Str(text) => decode_hex(&text).map(AbiValue::Bytes),
                _ => None,
            },
            Builtin::String => matches!(value, AbiValue::Str(_)).then_some(value),
        }
    }
}

fn coerce_int(value: AbiValue, min: i64, max: i64) -> Option<AbiValue> {
    let val = match value {
        AbiValue::Int(val) => val,
        AbiValue::UInt(val) => i64::try_from(val).ok()?,
        // 64-bit integers travel as decimal strings in JSON.
        AbiValue::Str(text) => text.parse().ok()?,
        _ => return None,
    };
    (min..=max).contains(&val).then_some(AbiValue::Int(val))
}

fn coerce_uint(value: AbiValue, max: u64) -> Option<AbiValue> {
    let val = match value {
        AbiValue::UInt(val) => val,
        AbiValue::Int(val) => u64::try_from(val).ok()?,
        AbiValue::Str(text) => text.parse().ok()?,
        _ => return None,
    };
    (val <= max).then_some(AbiValue::UInt(val))
}

fn coerce_int128(value: AbiValue) -> Option<AbiValue> {
    let val = match value {
        AbiValue::Int128(val) => val,
        AbiValue::Int(val) => val as i128,
        AbiValue::UInt(val) => val as i128,
        AbiValue::Str(text) => text.parse().ok()?,
        _ => return None,
    };
    Some(AbiValue::Int128(val))
}

fn coerce_uint128(value: AbiValue) -> Option<AbiValue> {
    let val = match value {
        AbiValue::UInt128(val) => val,
        AbiValue::UInt(val) => val as u128,
        AbiValue::Int(val) => u128::try_from(val).ok()?,
        AbiValue::Str(text) => text.parse().ok()?,
        _ => return None,
    };
    Some(AbiValue::UInt128(val))
}

fn coerce_float(value: AbiValue) -> Option<AbiValue> {
    let val = match value {
        AbiValue::Float(val) => val,
        AbiValue::Int(val) => val as f64,
        AbiValue::UInt(val) => val as f64,
        AbiValue::Str(text) => text.parse().ok()?,
        _ => return None,
    };
    Some(AbiValue::Float(val))
}

impl CustomType for Builtin {
    fn name(&self) -> &str {
        self.type_name()
    }

    fn from_binary(&self, cursor: &mut ByteCursor) -> Option<Result<AbiValue, DecodeError>> {
        Some(self.decode_binary(cursor))
    }

    fn from_value(&self, value: AbiValue, _resolved: bool) -> Result<AbiValue, DecodeError> {
        self.coerce(value).ok_or(DecodeError::InvalidValue {
            expected: self.type_name(),
        })
    }

    fn is_instance(&self, value: &AbiValue) -> bool {
        match self {
            Builtin::Bool => matches!(value, AbiValue::Bool(_)),
            Builtin::Int8
            | Builtin::Int16
            | Builtin::Int32
            | Builtin::Int64
            | Builtin::VarInt32
            | Builtin::Uint8
            | Builtin::Uint16
            | Builtin::Uint32
            | Builtin::Uint64
            | Builtin::VarUint32 => matches!(value, AbiValue::Int(_) | AbiValue::UInt(_)),
            Builtin::Int128 | Builtin::Uint128 => matches!(
                value,
                AbiValue::Int(_) | AbiValue::UInt(_) | AbiValue::Int128(_) | AbiValue::UInt128(_)
            ),
            Builtin::Float32 | Builtin::Float64 => matches!(value, AbiValue::Float(_)),
            Builtin::Float128 | Builtin::Bytes => matches!(value, AbiValue::Bytes(_)),
            Builtin::String => matches!(value, AbiValue::Str(_)),
        }
    }
}
