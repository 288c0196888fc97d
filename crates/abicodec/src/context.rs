//! Per-decode-call state: the coding path and depth policing.

use std::sync::Arc;

use crate::types::{resolve_aliases, ResolvedAlias};
use crate::{CustomType, DecodeError, ResolvedSchema, TypeId, TypeLookup};

/// Maximum coding-path depth before a decode fails with
/// [`DecodeError::MaxDepthExceeded`]. Bounds stack growth against
/// self-referential or deeply nested schemas on both drivers.
pub const MAX_CODING_PATH_DEPTH: usize = 32;

/// One step of the coding path: a struct field name, an array index,
/// or `v<index>` for a chosen variant arm.
#[derive(Debug, Clone)]
pub enum PathField {
    Name(String),
    Index(usize),
}

#[derive(Debug, Clone)]
pub struct PathEntry {
    pub field: PathField,
    pub ty: TypeId,
}

/// Mutable state threaded through one top-level decode call.
///
/// Carries the active type lookup (read-only for the duration) and the
/// stack of coding-path entries used for error attribution and depth
/// policing. Drivers push one entry per nesting step and pop on
/// success; the `?` unwind leaves the stack intact on failure so the
/// facade can render the path at the point of error.
pub struct DecodingContext<'a> {
    pub types: &'a TypeLookup,
    pub schema: &'a ResolvedSchema,
    pub coding_path: Vec<PathEntry>,
}

impl<'a> DecodingContext<'a> {
    pub fn new(types: &'a TypeLookup, schema: &'a ResolvedSchema, root: TypeId) -> Self {
        Self {
            types,
            schema,
            coding_path: vec![PathEntry {
                field: PathField::Name("root".to_owned()),
                ty: root,
            }],
        }
    }

    pub fn push_name(&mut self, name: &str, ty: TypeId) {
        self.coding_path.push(PathEntry {
            field: PathField::Name(name.to_owned()),
            ty,
        });
    }

    pub fn push_index(&mut self, index: usize, ty: TypeId) {
        self.coding_path.push(PathEntry {
            field: PathField::Index(index),
            ty,
        });
    }

    pub fn pop(&mut self) {
        self.coding_path.pop();
    }

    pub fn check_depth(&self) -> Result<(), DecodeError> {
        if self.coding_path.len() > MAX_CODING_PATH_DEPTH {
            return Err(DecodeError::MaxDepthExceeded);
        }
        Ok(())
    }

    pub fn resolve_aliases(&self, id: TypeId) -> ResolvedAlias {
        resolve_aliases(self.schema, id, self.types)
    }

    pub fn descriptor(&self, name: &str) -> Option<&Arc<dyn CustomType>> {
        self.types.get(name)
    }

    /// Renders the coding path as a dotted string: numeric indices bare,
    /// named fields annotated with their type name in angle brackets.
    pub fn coding_path_string(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.coding_path.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match &entry.field {
                PathField::Index(index) => out.push_str(&index.to_string()),
                PathField::Name(name) => {
                    out.push_str(name);
                    out.push('<');
                    out.push_str(&self.schema.get(entry.ty).type_name());
                    out.push('>');
                }
            }
        }
        out
    }
}
