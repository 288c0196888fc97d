//! ABI schema document model and type resolution.
//!
//! An [`Abi`] is the JSON-shaped schema describing aliases, structs and
//! tagged unions for a family of values. [`Abi::resolve_type`]
//! dereferences a (possibly suffixed) type name into a
//! [`ResolvedSchema`]: an arena of [`ResolvedType`] nodes addressed by
//! [`TypeId`], memoized by full type name so self-referential schemas
//! resolve into finite cyclic graphs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ABI type schema: aliases, structs and variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Abi {
    #[serde(default)]
    pub version: String,
    /// Alias definitions (`new_type_name` is a synonym for `type`).
    #[serde(default)]
    pub types: Vec<TypeAlias>,
    #[serde(default)]
    pub structs: Vec<Struct>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAlias {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Struct {
    pub name: String,
    /// Name of the base struct whose fields precede this struct's own.
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub types: Vec<String>,
}

impl Abi {
    /// Parses an ABI from its JSON document form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn get_struct(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn get_variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn get_alias(&self, name: &str) -> Option<&TypeAlias> {
        self.types.iter().find(|t| t.new_type_name == name)
    }

    /// Resolves a type name (with any `$`/`?`/`[]` suffixes) into an
    /// arena of resolved type nodes rooted at the named type.
    ///
    /// Resolution never fails: names with no definition become bare
    /// terminal nodes, reported as unknown at decode time unless a
    /// custom type covers them.
    pub fn resolve_type(&self, name: &str) -> ResolvedSchema {
        let mut resolver = Resolver {
            abi: self,
            nodes: Vec::new(),
            memo: HashMap::new(),
        };
        let root = resolver.resolve(name);
        ResolvedSchema {
            nodes: resolver.nodes,
            root,
        }
    }
}

/// Index of a [`ResolvedType`] within its [`ResolvedSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub ty: TypeId,
}

/// The fully-dereferenced shape of a schema type reference.
///
/// At most one of `fields`, `variant` or `alias` is populated; the
/// optional/array/extension modifiers compose independently on top of
/// the base shape.
#[derive(Debug, Clone, Default)]
pub struct ResolvedType {
    /// Canonical name, suffixes stripped.
    pub name: String,
    pub is_optional: bool,
    pub is_array: bool,
    /// Binary-extension field: may be absent at the end of the stream.
    pub is_extension: bool,
    /// Alias chain link.
    pub alias: Option<TypeId>,
    /// Struct shape: ordered fields, base-struct fields flattened in front.
    pub fields: Option<Vec<ResolvedField>>,
    /// Tagged-union shape: ordered members, position is the discriminant.
    pub variant: Option<Vec<TypeId>>,
}

impl ResolvedType {
    /// Display name with suffixes restored, used in diagnostics and
    /// variant tagging.
    pub fn type_name(&self) -> String {
        let mut name = self.name.clone();
        if self.is_array {
            name.push_str("[]");
        }
        if self.is_optional {
            name.push('?');
        }
        if self.is_extension {
            name.push('$');
        }
        name
    }
}

/// Arena of resolved type nodes for one root type.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    nodes: Vec<ResolvedType>,
    root: TypeId,
}

impl ResolvedSchema {
    pub fn root(&self) -> TypeId {
        self.root
    }

    pub fn get(&self, id: TypeId) -> &ResolvedType {
        &self.nodes[id.0 as usize]
    }

    /// Arena size; bounds the alias-chain walk.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

struct Resolver<'a> {
    abi: &'a Abi,
    nodes: Vec<ResolvedType>,
    memo: HashMap<String, TypeId>,
}

impl<'a> Resolver<'a> {
    fn resolve(&mut self, full_name: &str) -> TypeId {
        if let Some(&id) = self.memo.get(full_name) {
            return id;
        }
        // Reserve the slot before descending so self-referential schemas
        // terminate.
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(ResolvedType::default());
        self.memo.insert(full_name.to_owned(), id);

        let mut node = ResolvedType::default();
        let mut name = full_name;
        // Reference suffix order: `$`, then `?`, then `[]`.
        if let Some(stripped) = name.strip_suffix('$') {
            name = stripped;
            node.is_extension = true;
        }
        if let Some(stripped) = name.strip_suffix('?') {
            name = stripped;
            node.is_optional = true;
        }
        if let Some(stripped) = name.strip_suffix("[]") {
            name = stripped;
            node.is_array = true;
        }
        node.name = name.to_owned();

        let abi = self.abi;
        if let Some(alias) = abi.get_alias(name) {
            node.alias = Some(self.resolve(&alias.ty));
        } else if let Some(strct) = abi.get_struct(name) {
            node.fields = Some(self.resolve_struct_fields(strct));
        } else if let Some(variant) = abi.get_variant(name) {
            node.variant = Some(variant.types.iter().map(|ty| self.resolve(ty)).collect());
        }

        self.nodes[id.0 as usize] = node;
        id
    }

    fn resolve_struct_fields(&mut self, strct: &'a Struct) -> Vec<ResolvedField> {
        let abi = self.abi;
        let mut chain = vec![strct];
        let mut seen = vec![strct.name.as_str()];
        let mut cur = strct;
        while !cur.base.is_empty() {
            match abi.get_struct(&cur.base) {
                Some(base) if !seen.contains(&base.name.as_str()) => {
                    seen.push(&base.name);
                    chain.push(base);
                    cur = base;
                }
                // Unknown or cyclic base: stop the chain.
                _ => break,
            }
        }
        let mut fields = Vec::new();
        for strct in chain.iter().rev() {
            for field in &strct.fields {
                let ty = self.resolve(&field.ty);
                fields.push(ResolvedField {
                    name: field.name.clone(),
                    ty,
                });
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn abi(doc: serde_json::Value) -> Abi {
        serde_json::from_value(doc).expect("abi")
    }

    #[test]
    fn test_suffix_parsing() {
        let schema = Abi::default().resolve_type("uint8[]?$");
        let root = schema.get(schema.root());
        assert_eq!(root.name, "uint8");
        assert!(root.is_array);
        assert!(root.is_optional);
        assert!(root.is_extension);
        assert_eq!(root.type_name(), "uint8[]?$");
    }

    #[test]
    fn test_suffix_order_is_significant() {
        // A `?` before `[]` does not parse as optional; only the trailing
        // suffixes in `$`, `?`, `[]` order strip.
        let schema = Abi::default().resolve_type("uint8?[]");
        let root = schema.get(schema.root());
        assert_eq!(root.name, "uint8?");
        assert!(root.is_array);
        assert!(!root.is_optional);
    }

    #[test]
    fn test_struct_resolution() {
        let abi = abi(json!({
            "structs": [
                {"name": "pair", "fields": [
                    {"name": "x", "type": "uint32"},
                    {"name": "y", "type": "string"},
                ]},
            ],
        }));
        let schema = abi.resolve_type("pair");
        let root = schema.get(schema.root());
        let fields = root.fields.as_ref().expect("fields");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "x");
        assert_eq!(schema.get(fields[0].ty).name, "uint32");
        assert_eq!(schema.get(fields[1].ty).name, "string");
    }

    #[test]
    fn test_base_fields_flattened_in_front() {
        let abi = abi(json!({
            "structs": [
                {"name": "base", "fields": [{"name": "id", "type": "uint64"}]},
                {"name": "derived", "base": "base", "fields": [
                    {"name": "memo", "type": "string"},
                ]},
            ],
        }));
        let schema = abi.resolve_type("derived");
        let fields = schema.get(schema.root()).fields.as_ref().expect("fields");
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "memo"]);
    }

    #[test]
    fn test_cyclic_base_stops() {
        let abi = abi(json!({
            "structs": [
                {"name": "a", "base": "b", "fields": [{"name": "x", "type": "uint8"}]},
                {"name": "b", "base": "a", "fields": [{"name": "y", "type": "uint8"}]},
            ],
        }));
        let schema = abi.resolve_type("a");
        let fields = schema.get(schema.root()).fields.as_ref().expect("fields");
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["y", "x"]);
    }

    #[test]
    fn test_alias_chain() {
        let abi = abi(json!({
            "types": [
                {"new_type_name": "id", "type": "scalar"},
                {"new_type_name": "scalar", "type": "uint64"},
            ],
        }));
        let schema = abi.resolve_type("id");
        let root = schema.get(schema.root());
        let mid = schema.get(root.alias.expect("alias"));
        assert_eq!(mid.name, "scalar");
        let terminal = schema.get(mid.alias.expect("alias"));
        assert_eq!(terminal.name, "uint64");
        assert!(terminal.alias.is_none());
    }

    #[test]
    fn test_self_referential_alias_is_finite() {
        let abi = abi(json!({
            "types": [{"new_type_name": "node", "type": "node[]?"}],
        }));
        let schema = abi.resolve_type("node");
        let root = schema.get(schema.root());
        let target = schema.get(root.alias.expect("alias"));
        assert!(target.is_array);
        assert!(target.is_optional);
        // The chain loops back to the memoized root node.
        assert_eq!(target.alias, Some(schema.root()));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_variant_resolution() {
        let abi = abi(json!({
            "variants": [{"name": "value", "types": ["uint32", "string"]}],
        }));
        let schema = abi.resolve_type("value");
        let members = schema.get(schema.root()).variant.as_ref().expect("variant");
        assert_eq!(members.len(), 2);
        assert_eq!(schema.get(members[0]).name, "uint32");
        assert_eq!(schema.get(members[1]).name, "string");
    }

    #[test]
    fn test_abi_json_round_trip() {
        let doc = json!({
            "version": "abi/1.1",
            "types": [{"new_type_name": "id", "type": "uint64"}],
            "structs": [{"name": "row", "base": "", "fields": [{"name": "id", "type": "id"}]}],
            "variants": [{"name": "key", "types": ["id", "string"]}],
        });
        let abi: Abi = serde_json::from_value(doc).expect("abi");
        assert_eq!(abi.version, "abi/1.1");
        assert_eq!(abi.get_alias("id").map(|a| a.ty.as_str()), Some("uint64"));
        assert_eq!(abi.get_struct("row").map(|s| s.fields.len()), Some(1));
        assert_eq!(abi.get_variant("key").map(|v| v.types.len()), Some(2));
    }
}
