//! Structural decode drivers and the decode facade.
//!
//! Two parallel recursive algorithms share one decision tree keyed off
//! the resolved type shape (optional / array / struct / variant /
//! terminal): one consumes a [`ByteCursor`] over wire bytes, the other
//! an in-memory [`AbiValue`] tree (JSON text is parsed and routed
//! through the tree driver). [`decode`] is the public entry point.

use std::sync::Arc;

use abicodec_buffers::ByteCursor;

use crate::{
    Abi, AbiValue, CustomType, DecodeError, DecodingContext, TypeId, TypeLookup,
};

/// Identifies the root type of a decode call: either a type name
/// resolved against the schema, or a custom-type descriptor (which may
/// synthesize its own schema).
#[derive(Clone)]
pub enum TypeSelector {
    Name(String),
    Custom(Arc<dyn CustomType>),
}

impl TypeSelector {
    pub fn name(&self) -> &str {
        match self {
            TypeSelector::Name(name) => name,
            TypeSelector::Custom(ty) => ty.name(),
        }
    }
}

impl From<&str> for TypeSelector {
    fn from(name: &str) -> Self {
        TypeSelector::Name(name.to_owned())
    }
}

impl From<String> for TypeSelector {
    fn from(name: String) -> Self {
        TypeSelector::Name(name)
    }
}

impl From<Arc<dyn CustomType>> for TypeSelector {
    fn from(ty: Arc<dyn CustomType>) -> Self {
        TypeSelector::Custom(ty)
    }
}

/// Arguments for [`decode`]. Exactly one of `data`, `object` or `json`
/// must be supplied.
pub struct DecodeArgs<'a> {
    /// Explicit schema; when absent, the root type must synthesize one.
    pub abi: Option<Abi>,
    /// Wire bytes; selects the binary driver.
    pub data: Option<&'a [u8]>,
    /// In-memory value tree; selects the tree driver.
    pub object: Option<AbiValue>,
    /// JSON text; parsed, then routed through the tree driver.
    pub json: Option<&'a str>,
    /// Root type to decode.
    pub ty: TypeSelector,
    /// Additional descriptors to register; shadow built-ins by name.
    pub custom_types: Vec<Arc<dyn CustomType>>,
}

impl<'a> DecodeArgs<'a> {
    pub fn new(ty: impl Into<TypeSelector>) -> Self {
        Self {
            abi: None,
            data: None,
            object: None,
            json: None,
            ty: ty.into(),
            custom_types: Vec::new(),
        }
    }
}

enum Input<'a> {
    Data(&'a [u8]),
    Object(AbiValue),
}

/// Decodes one value per the supplied arguments.
///
/// Returns a plain structural value (object / array / tagged variant)
/// when no descriptor governs the type, or a descriptor-constructed
/// value when one does. Any error raised during the recursive descent
/// is caught exactly once and rethrown as
/// [`DecodeError::Decoding`] carrying the rendered coding path;
/// [`DecodeError::InvalidJson`], [`DecodeError::NothingToDecode`] and
/// [`DecodeError::AbiSynthesisFailed`] occur before a context exists
/// and surface directly.
pub fn decode(args: DecodeArgs) -> Result<AbiValue, DecodeError> {
    let supplied = usize::from(args.data.is_some())
        + usize::from(args.object.is_some())
        + usize::from(args.json.is_some());
    if supplied != 1 {
        return Err(DecodeError::NothingToDecode);
    }

    let mut custom_types = args.custom_types;
    if let TypeSelector::Custom(root) = &args.ty {
        custom_types.push(Arc::clone(root));
    }

    let abi = match args.abi {
        Some(abi) => abi,
        None => {
            let synthesis = match &args.ty {
                TypeSelector::Custom(root) => root.synthesize_abi(),
                TypeSelector::Name(_) => None,
            };
            match synthesis {
                Some(synthesis) => {
                    custom_types.extend(synthesis.types);
                    synthesis.abi
                }
                None => {
                    return Err(DecodeError::AbiSynthesisFailed(args.ty.name().to_owned()));
                }
            }
        }
    };

    let input = if let Some(data) = args.data {
        Input::Data(data)
    } else if let Some(object) = args.object {
        Input::Object(object)
    } else if let Some(json) = args.json {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Input::Object(parsed.into())
    } else {
        return Err(DecodeError::NothingToDecode);
    };

    let lookup = TypeLookup::build(&custom_types);
    let schema = abi.resolve_type(args.ty.name());
    let mut ctx = DecodingContext::new(&lookup, &schema, schema.root());

    let result = match &input {
        Input::Data(data) => {
            let mut cursor = ByteCursor::new(data);
            decode_binary(&mut ctx, &mut cursor, schema.root())
        }
        Input::Object(value) => decode_object(&mut ctx, value, schema.root()),
    };
    result.map_err(|source| DecodeError::Decoding {
        path: ctx.coding_path_string(),
        source: Box::new(source),
    })
}

/// Binary-stream-driven recursive descent.
fn decode_binary(
    ctx: &mut DecodingContext,
    cursor: &mut ByteCursor,
    ty: TypeId,
) -> Result<AbiValue, DecodeError> {
    ctx.check_depth()?;
    let schema = ctx.schema;
    let node = schema.get(ty);
    if node.is_extension && !cursor.can_read(1) {
        return Ok(AbiValue::Null);
    }
    if node.is_optional && cursor.read_byte()? == 0 {
        return Ok(AbiValue::Null);
    }
    if node.is_array {
        // The element count is untrusted; capacity grows as elements
        // actually decode.
        let len = cursor.read_varuint32()? as usize;
        let mut items = Vec::new();
        for index in 0..len {
            ctx.push_index(index, ty);
            let item = decode_binary_scalar(ctx, cursor, ty)?;
            items.push(item);
            ctx.pop();
        }
        Ok(AbiValue::Array(items))
    } else {
        decode_binary_scalar(ctx, cursor, ty)
    }
}

fn decode_binary_scalar(
    ctx: &mut DecodingContext,
    cursor: &mut ByteCursor,
    ty: TypeId,
) -> Result<AbiValue, DecodeError> {
    let schema = ctx.schema;
    let resolved = ctx.resolve_aliases(ty);
    let descriptor = resolved.descriptor;
    if let Some(custom) = &descriptor {
        if let Some(result) = custom.from_binary(cursor) {
            return result;
        }
    }
    let node = schema.get(resolved.ty);
    if resolved.followed && (node.is_optional || node.is_array || node.is_extension) {
        // The alias target carries modifiers of its own; the full driver
        // consumes them. The path entry keeps modifier-only alias cycles
        // accountable to the depth guard.
        ctx.push_name(&node.name, resolved.ty);
        let value = decode_binary(ctx, cursor, resolved.ty)?;
        ctx.pop();
        return construct(&descriptor, value);
    }
    if let Some(fields) = &node.fields {
        let mut object = Vec::with_capacity(fields.len());
        for field in fields {
            ctx.push_name(&field.name, field.ty);
            let value = decode_binary(ctx, cursor, field.ty)?;
            object.push((field.name.clone(), value));
            ctx.pop();
        }
        construct(&descriptor, AbiValue::Object(object))
    } else if let Some(members) = &node.variant {
        let index = cursor.read_byte()?;
        let Some(&member) = members.get(index as usize) else {
            return Err(DecodeError::UnknownVariantIndex {
                type_name: node.type_name(),
                index,
            });
        };
        ctx.push_name(&format!("v{index}"), member);
        let value = decode_binary(ctx, cursor, member)?;
        ctx.pop();
        let tagged = AbiValue::Variant(schema.get(member).type_name(), Box::new(value));
        construct(&descriptor, tagged)
    } else if descriptor.is_some() {
        // A descriptor with neither shape nor self-decoder cannot
        // materialize anything.
        Err(DecodeError::InvalidType(node.type_name()))
    } else {
        Err(DecodeError::UnknownType(node.type_name()))
    }
}

/// Tree-driven recursive descent, mirroring the binary driver's
/// decision shape over an already-materialized value.
fn decode_object(
    ctx: &mut DecodingContext,
    value: &AbiValue,
    ty: TypeId,
) -> Result<AbiValue, DecodeError> {
    ctx.check_depth()?;
    let schema = ctx.schema;
    let node = schema.get(ty);
    if value.is_null() {
        if node.is_optional || node.is_extension {
            return Ok(AbiValue::Null);
        }
        return Err(DecodeError::UnexpectedNull(node.type_name()));
    }
    if node.is_array {
        let AbiValue::Array(items) = value else {
            return Err(DecodeError::ExpectedArray(node.type_name()));
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            ctx.push_index(index, ty);
            let decoded = decode_object_scalar(ctx, item, ty)?;
            out.push(decoded);
            ctx.pop();
        }
        Ok(AbiValue::Array(out))
    } else {
        decode_object_scalar(ctx, value, ty)
    }
}

fn decode_object_scalar(
    ctx: &mut DecodingContext,
    value: &AbiValue,
    ty: TypeId,
) -> Result<AbiValue, DecodeError> {
    let schema = ctx.schema;
    let resolved = ctx.resolve_aliases(ty);
    let descriptor = resolved.descriptor;
    let node = schema.get(resolved.ty);
    if resolved.followed && (node.is_optional || node.is_array || node.is_extension) {
        ctx.push_name(&node.name, resolved.ty);
        let decoded = decode_object(ctx, value, resolved.ty)?;
        ctx.pop();
        return construct(&descriptor, decoded);
    }
    if let Some(fields) = &node.fields {
        if let Some(custom) = &descriptor {
            // Idempotent re-decode: recognized instances pass through.
            if custom.is_instance(value) {
                return Ok(value.clone());
            }
        }
        let AbiValue::Object(input) = value else {
            return Err(DecodeError::ExpectedObject(node.type_name()));
        };
        let mut object = Vec::with_capacity(fields.len());
        for field in fields {
            let item = input
                .iter()
                .find(|(key, _)| key == &field.name)
                .map(|(_, val)| val)
                .unwrap_or(&AbiValue::Null);
            ctx.push_name(&field.name, field.ty);
            let decoded = decode_object(ctx, item, field.ty)?;
            object.push((field.name.clone(), decoded));
            ctx.pop();
        }
        construct(&descriptor, AbiValue::Object(object))
    } else if let Some(members) = &node.variant {
        let members = members.clone();
        let tagged = match value {
            AbiValue::Array(pair) if pair.len() == 2 => match &pair[0] {
                AbiValue::Str(name) => Some((name.clone(), &pair[1])),
                _ => None,
            },
            AbiValue::Variant(name, payload) => Some((name.clone(), payload.as_ref())),
            _ => None,
        };
        let (tag, payload) = match tagged {
            Some(tagged) => tagged,
            None => {
                // No explicit tag: match the value's runtime shape against
                // the member descriptors, in declaration order.
                let detected = members.iter().find_map(|&member| {
                    let member_node = schema.get(member);
                    let candidate = ctx.descriptor(&member_node.name)?;
                    candidate
                        .is_instance(value)
                        .then(|| member_node.type_name())
                });
                match detected {
                    Some(name) => (name, value),
                    None => {
                        return Err(DecodeError::UnknownVariantType {
                            type_name: node.type_name(),
                            name: value.kind().to_owned(),
                        });
                    }
                }
            }
        };
        let found = members
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, member)| schema.get(member).type_name() == tag);
        let Some((index, member)) = found else {
            return Err(DecodeError::UnknownVariantType {
                type_name: node.type_name(),
                name: tag,
            });
        };
        ctx.push_name(&format!("v{index}"), member);
        let decoded = decode_object(ctx, payload, member)?;
        ctx.pop();
        let tagged = AbiValue::Variant(schema.get(member).type_name(), Box::new(decoded));
        construct(&descriptor, tagged)
    } else {
        match &descriptor {
            Some(custom) => custom.from_value(value.clone(), false),
            None => Err(DecodeError::UnknownType(node.type_name())),
        }
    }
}

fn construct(
    descriptor: &Option<Arc<dyn CustomType>>,
    value: AbiValue,
) -> Result<AbiValue, DecodeError> {
    match descriptor {
        Some(custom) => custom.from_value(value, true),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_decode() {
        let args = DecodeArgs {
            abi: Some(Abi::default()),
            ..DecodeArgs::new("uint8")
        };
        assert!(matches!(decode(args), Err(DecodeError::NothingToDecode)));

        let data = [1u8];
        let args = DecodeArgs {
            abi: Some(Abi::default()),
            data: Some(&data),
            json: Some("1"),
            ..DecodeArgs::new("uint8")
        };
        assert!(matches!(decode(args), Err(DecodeError::NothingToDecode)));
    }

    #[test]
    fn test_bare_name_cannot_synthesize_abi() {
        let data = [1u8];
        let args = DecodeArgs {
            data: Some(&data),
            ..DecodeArgs::new("mystery")
        };
        assert!(matches!(
            decode(args),
            Err(DecodeError::AbiSynthesisFailed(name)) if name == "mystery"
        ));
    }

    #[test]
    fn test_invalid_json_is_not_path_wrapped() {
        let args = DecodeArgs {
            abi: Some(Abi::default()),
            json: Some("{not json"),
            ..DecodeArgs::new("uint8")
        };
        assert!(matches!(decode(args), Err(DecodeError::InvalidJson(_))));
    }
}
