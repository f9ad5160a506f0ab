//! Core types shared by extraction and matching.

use std::sync::Arc;

use serde_json::Value;

use crate::error::MatchError;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Structural description of what a schema requires at one nesting level.
///
/// Shapes depend only on the schema type, never on a JSON instance, so they
/// are built once and shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Scalar or otherwise opaque value. Always satisfied once present.
    Leaf,
    /// Record with named members.
    Object(Arc<ObjectShape>),
    /// Sequence whose every element must satisfy the inner shape.
    ArrayOf(Box<Shape>),
    /// String-keyed map whose every value must satisfy the inner shape.
    MapOf(Box<Shape>),
}

impl Shape {
    /// Short name of the variant, used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Leaf => "leaf",
            Shape::Object(_) => "object",
            Shape::ArrayOf(_) => "array",
            Shape::MapOf(_) => "map",
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Shape::Object(Arc::new(ObjectShape {
            name: name.into(),
            fields,
        }))
    }

    pub fn array_of(inner: Shape) -> Self {
        Shape::ArrayOf(Box::new(inner))
    }

    pub fn map_of(inner: Shape) -> Self {
        Shape::MapOf(Box::new(inner))
    }
}

/// The JSON-visible members of a record type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectShape {
    /// Type name, for diagnostics only.
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// One declared, JSON-visible member of an object shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key looked up in the JSON object.
    pub name: String,
    pub shape: Shape,
    /// Declared as omitted-when-empty on serialization.
    pub omit_empty: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            omit_empty: false,
        }
    }

    pub fn omit_empty(mut self, omit_empty: bool) -> Self {
        self.omit_empty = omit_empty;
        self
    }
}

/// An object shape that is valid as the root of a coverage check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootShape(Arc<ObjectShape>);

impl RootShape {
    /// Wrap a shape for use at the root.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::InvalidRootSchema` unless the shape is an object.
    pub fn new(shape: Shape) -> Result<Self, MatchError> {
        match shape {
            Shape::Object(object) => Ok(RootShape(object)),
            other => Err(MatchError::InvalidRootSchema {
                type_name: other.kind().to_string(),
            }),
        }
    }

    pub fn object(&self) -> &ObjectShape {
        &self.0
    }

    pub fn into_shape(self) -> Shape {
        Shape::Object(self.0)
    }
}

/// How a member without an explicit JSON name is looked up.
///
/// The default reproduces the classic behaviour of using the declared
/// member name verbatim, so `MsgRateIn` is looked up as `"MsgRateIn"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameFallback {
    /// Use the declared member name unchanged.
    #[default]
    Declared,
    /// Lower-case the whole declared name.
    Lowercase,
    /// Lower-case only the first character (`MsgRateIn` -> `msgRateIn`).
    LowerCamel,
}

impl NameFallback {
    /// Compute the JSON key for a member declared as `name`.
    pub fn apply(&self, name: &str) -> String {
        match self {
            NameFallback::Declared => name.to_string(),
            NameFallback::Lowercase => name.to_lowercase(),
            NameFallback::LowerCamel => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    /// Parse a policy name as accepted on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "declared" => Some(NameFallback::Declared),
            "lowercase" => Some(NameFallback::Lowercase),
            "lower-camel" => Some(NameFallback::LowerCamel),
            _ => None,
        }
    }
}

/// Options for a coverage check.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// When true, members declared omit-when-empty may be absent without
    /// being reported. Defaults to false: every declared member is required.
    pub allow_missing_omitempty: bool,
    /// Lookup policy for members without an explicit JSON name.
    pub name_fallback: NameFallback,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerate absent omit-when-empty members.
    pub fn allow_missing_omitempty(mut self, allow: bool) -> Self {
        self.allow_missing_omitempty = allow;
        self
    }

    pub fn name_fallback(mut self, fallback: NameFallback) -> Self {
        self.name_fallback = fallback;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_fallback_apply() {
        assert_eq!(NameFallback::Declared.apply("MsgRateIn"), "MsgRateIn");
        assert_eq!(NameFallback::Lowercase.apply("MsgRateIn"), "msgratein");
        assert_eq!(NameFallback::LowerCamel.apply("MsgRateIn"), "msgRateIn");
        assert_eq!(NameFallback::LowerCamel.apply(""), "");
    }

    #[test]
    fn name_fallback_parse() {
        assert_eq!(NameFallback::parse("declared"), Some(NameFallback::Declared));
        assert_eq!(
            NameFallback::parse("lower-camel"),
            Some(NameFallback::LowerCamel)
        );
        assert_eq!(NameFallback::parse("snake"), None);
    }

    #[test]
    fn root_shape_rejects_non_objects() {
        let err = RootShape::new(Shape::array_of(Shape::Leaf)).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidRootSchema { ref type_name } if type_name == "array"
        ));
        assert!(RootShape::new(Shape::object("Empty", vec![])).is_ok());
    }

    #[test]
    fn match_options_builder() {
        let opts = MatchOptions::new()
            .allow_missing_omitempty(true)
            .name_fallback(NameFallback::Lowercase);
        assert!(opts.allow_missing_omitempty);
        assert_eq!(opts.name_fallback, NameFallback::Lowercase);
    }
}
