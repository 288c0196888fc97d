//! [`AbiValue`] — generic tree-shaped decoded value.

use serde_json::Value;

/// A decoded value: the generic tree representation produced by the
/// decode drivers when no custom type governs the result.
///
/// Objects are ordered key/value pairs; declaration order of the schema
/// fields is preserved. Tagged-union values carry the member type name
/// alongside the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiValue {
    Null,
    Bool(bool),
    UInt(u64),
    Int(i64),
    UInt128(u128),
    Int128(i128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<AbiValue>),
    Object(Vec<(String, AbiValue)>),
    Variant(String, Box<AbiValue>),
}

impl AbiValue {
    /// A short name for the value's runtime shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AbiValue::Null => "null",
            AbiValue::Bool(_) => "bool",
            AbiValue::UInt(_) | AbiValue::Int(_) | AbiValue::UInt128(_) | AbiValue::Int128(_) => {
                "integer"
            }
            AbiValue::Float(_) => "float",
            AbiValue::Str(_) => "string",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::Array(_) => "array",
            AbiValue::Object(_) => "object",
            AbiValue::Variant(..) => "variant",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AbiValue::Null)
    }

    /// Looks up a key in an object value.
    pub fn get(&self, key: &str) -> Option<&AbiValue> {
        match self {
            AbiValue::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Renders the value as standard JSON.
    ///
    /// 128-bit integers render as decimal strings and byte payloads as
    /// lowercase hex strings, per the wire format's JSON conventions.
    /// Tagged-union values render as a `[name, payload]` pair.
    pub fn to_json(&self) -> Value {
        match self {
            AbiValue::Null => Value::Null,
            AbiValue::Bool(val) => Value::Bool(*val),
            AbiValue::UInt(val) => Value::from(*val),
            AbiValue::Int(val) => Value::from(*val),
            AbiValue::UInt128(val) => Value::String(val.to_string()),
            AbiValue::Int128(val) => Value::String(val.to_string()),
            AbiValue::Float(val) => serde_json::Number::from_f64(*val)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AbiValue::Str(val) => Value::String(val.clone()),
            AbiValue::Bytes(val) => Value::String(encode_hex(val)),
            AbiValue::Array(items) => Value::Array(items.iter().map(AbiValue::to_json).collect()),
            AbiValue::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, val)| (key.clone(), val.to_json()))
                    .collect(),
            ),
            AbiValue::Variant(name, val) => {
                Value::Array(vec![Value::String(name.clone()), val.to_json()])
            }
        }
    }
}

impl From<Value> for AbiValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AbiValue::Null,
            Value::Bool(val) => AbiValue::Bool(val),
            Value::Number(num) => {
                if let Some(val) = num.as_u64() {
                    AbiValue::UInt(val)
                } else if let Some(val) = num.as_i64() {
                    AbiValue::Int(val)
                } else {
                    AbiValue::Float(num.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(val) => AbiValue::Str(val),
            Value::Array(items) => AbiValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => AbiValue::Object(
                entries
                    .into_iter()
                    .map(|(key, val)| (key, val.into()))
                    .collect(),
            ),
        }
    }
}

/// Lowercase hex rendering of a byte payload.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(char::from_digit((b >> 4) as u32, 16).unwrap_or('0'));
        out.push(char::from_digit((b & 0xf) as u32, 16).unwrap_or('0'));
    }
    out
}

/// Parses a hex string into bytes. `None` on odd length or bad digits.
pub fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    let digits: Vec<u32> = text
        .chars()
        .map(|c| c.to_digit(16))
        .collect::<Option<_>>()?;
    Some(
        digits
            .chunks(2)
            .map(|pair| ((pair[0] << 4) | pair[1]) as u8)
            .collect(),
    )
}
