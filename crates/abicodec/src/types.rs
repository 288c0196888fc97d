//! Custom-type descriptors and the type lookup.

use std::collections::HashMap;
use std::sync::Arc;

use abicodec_buffers::ByteCursor;

use crate::{Abi, AbiValue, Builtin, DecodeError, ResolvedSchema, TypeId};

/// Schema information produced by a self-describing root type, along
/// with any additional descriptors the synthesis discovered.
pub struct AbiSynthesis {
    pub abi: Abi,
    pub types: Vec<Arc<dyn CustomType>>,
}

/// Per-type capability bundle used to materialize typed values from
/// structural data.
///
/// Implementations provide any subset of the optional capabilities: a
/// direct wire self-decoder, a constructor from a decoded tree value,
/// a runtime instance test, and a self-describing schema.
pub trait CustomType {
    /// Canonical type name, as it appears in schemas.
    fn name(&self) -> &str;

    /// Decodes the value straight off the wire. `None` when the type has
    /// no custom wire encoding.
    fn from_binary(&self, _cursor: &mut ByteCursor) -> Option<Result<AbiValue, DecodeError>> {
        None
    }

    /// Constructs an instance from a decoded value.
    ///
    /// `resolved` is true when nested custom-type fields have already
    /// been materialized by the decode drivers; the constructor may then
    /// trust child values instead of re-resolving them. Expected to be
    /// idempotent for values it already recognizes.
    fn from_value(&self, value: AbiValue, _resolved: bool) -> Result<AbiValue, DecodeError> {
        Ok(value)
    }

    /// True when the candidate value is already an instance of this type.
    fn is_instance(&self, _value: &AbiValue) -> bool {
        false
    }

    /// Self-describing schema synthesis, for roots decoded without an
    /// explicit ABI.
    fn synthesize_abi(&self) -> Option<AbiSynthesis> {
        None
    }
}

/// Immutable mapping from type name to custom-type descriptor.
pub struct TypeLookup {
    map: HashMap<String, Arc<dyn CustomType>>,
}

impl TypeLookup {
    /// Merges the built-in primitive table with the supplied descriptors.
    /// Later entries shadow earlier ones with the same name.
    pub fn build(custom: &[Arc<dyn CustomType>]) -> Self {
        let mut map: HashMap<String, Arc<dyn CustomType>> = HashMap::new();
        for builtin in Builtin::ALL {
            map.insert(builtin.type_name().to_owned(), Arc::new(builtin));
        }
        for ty in custom {
            map.insert(ty.name().to_owned(), Arc::clone(ty));
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CustomType>> {
        self.map.get(name)
    }
}

/// Result of following an alias chain.
pub struct ResolvedAlias {
    /// Terminal node of the walk.
    pub ty: TypeId,
    /// Descriptor registered for the outermost matching name along the
    /// chain, if any.
    pub descriptor: Option<Arc<dyn CustomType>>,
    /// True when at least one alias link was followed.
    pub followed: bool,
}

/// Follows an alias chain to its terminal concrete shape.
///
/// The walk stops at the first node carrying structure (fields or
/// variant), at the first target carrying its own optional/array/
/// extension modifiers (the drivers re-enter to consume them, which is
/// how chain modifiers compose onto the final shape), or when the
/// chain ends. The descriptor attached is the one registered for the
/// outermost name encountered; a step cap bounds malformed cyclic
/// chains.
pub fn resolve_aliases(
    schema: &ResolvedSchema,
    id: TypeId,
    lookup: &TypeLookup,
) -> ResolvedAlias {
    let mut cur = id;
    let mut descriptor = lookup.get(&schema.get(cur).name).cloned();
    let mut followed = false;
    for _ in 0..schema.len() {
        let Some(next) = schema.get(cur).alias else {
            break;
        };
        let node = schema.get(next);
        let modified = node.is_optional || node.is_array || node.is_extension;
        if descriptor.is_none() && !modified {
            // A modified target's stripped name describes its elements,
            // not the whole; its descriptor must not attach here.
            descriptor = lookup.get(&node.name).cloned();
        }
        cur = next;
        followed = true;
        if modified || node.fields.is_some() || node.variant.is_some() {
            break;
        }
    }
    ResolvedAlias {
        ty: cur,
        descriptor,
        followed,
    }
}
