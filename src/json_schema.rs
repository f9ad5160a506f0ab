//! Shapes derived from JSON Schema documents.
//!
//! Lets a payload be checked against a schema file instead of a compiled
//! Rust type. Only structure is read: `properties`, `items`,
//! `additionalProperties`, `allOf` and local `$ref`s. Every listed
//! property is treated as required unless annotated with `x-coverage`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::MatchError;
use crate::loader::navigate_fragment;
use crate::types::{json_type_name, FieldDescriptor, RootShape, Shape};

/// Property annotation controlling how a field is checked.
pub const COVERAGE_ANNOTATION: &str = "x-coverage";

/// Build the shape described by a JSON Schema document.
///
/// # Errors
///
/// Returns `MatchError::InvalidSchema` for non-local or dangling `$ref`s,
/// reference cycles, or malformed `properties`/`x-coverage` values.
pub fn shape_from_json_schema(schema: &Value) -> Result<Shape, MatchError> {
    let mut builder = ShapeBuilder {
        document: schema,
        active_refs: HashSet::new(),
    };
    builder.shape(schema, "#")
}

/// Build the root shape described by a JSON Schema document.
///
/// # Errors
///
/// As [`shape_from_json_schema`], plus `MatchError::InvalidRootSchema` if the
/// document does not describe an object.
pub fn root_from_json_schema(schema: &Value) -> Result<RootShape, MatchError> {
    RootShape::new(shape_from_json_schema(schema)?)
}

struct ShapeBuilder<'a> {
    document: &'a Value,
    /// `$ref`s currently being expanded, for cycle detection.
    active_refs: HashSet<String>,
}

impl<'a> ShapeBuilder<'a> {
    fn shape(&mut self, schema: &'a Value, path: &str) -> Result<Shape, MatchError> {
        let Value::Object(map) = schema else {
            // `true`/`false` schemas carry no structure
            return Ok(Shape::Leaf);
        };

        if let Some(reference) = map.get("$ref") {
            return self.follow_ref(reference, path);
        }

        if is_object_schema(map) {
            let fields = self.object_fields(map, path)?;
            if fields.is_empty() && !map.contains_key("properties") && !map.contains_key("allOf") {
                if let Some(additional) = map.get("additionalProperties").filter(|v| v.is_object()) {
                    let element =
                        self.shape(additional, &format!("{}/additionalProperties", path))?;
                    return Ok(Shape::map_of(element));
                }
            }
            return Ok(Shape::object(schema_name(map, path), fields));
        }

        if is_array_schema(map) {
            let element = match map.get("items") {
                Some(items) => self.shape(items, &format!("{}/items", path))?,
                None => Shape::Leaf,
            };
            return Ok(Shape::array_of(element));
        }

        if map.contains_key("allOf") {
            let fields = self.object_fields(map, path)?;
            if !fields.is_empty() {
                return Ok(Shape::object(schema_name(map, path), fields));
            }
        }

        Ok(Shape::Leaf)
    }

    fn follow_ref(&mut self, reference: &Value, path: &str) -> Result<Shape, MatchError> {
        let Value::String(reference) = reference else {
            return Err(MatchError::InvalidSchema {
                message: format!(
                    "$ref at {} must be a string, got {}",
                    path,
                    json_type_name(reference)
                ),
            });
        };
        if !reference.starts_with('#') {
            return Err(MatchError::InvalidSchema {
                message: format!("only local $ref is supported, got '{}' at {}", reference, path),
            });
        }
        if !self.active_refs.insert(reference.clone()) {
            return Err(MatchError::InvalidSchema {
                message: format!("cyclic $ref '{}' at {}", reference, path),
            });
        }

        let target = navigate_fragment(self.document, reference)?;
        let shape = self.shape(target, reference);
        self.active_refs.remove(reference);
        shape
    }

    /// Fields from `properties` followed by those of object `allOf` branches.
    fn object_fields(
        &mut self,
        map: &'a Map<String, Value>,
        path: &str,
    ) -> Result<Vec<FieldDescriptor>, MatchError> {
        let mut fields = Vec::new();

        match map.get("properties") {
            None => {}
            Some(Value::Object(properties)) => {
                for (name, property) in properties {
                    let property_path = format!("{}/properties/{}", path, name);
                    let Some(omit_empty) = coverage_mode(property, &property_path)? else {
                        continue;
                    };
                    let shape = self.shape(property, &property_path)?;
                    fields.push(FieldDescriptor::new(name.clone(), shape).omit_empty(omit_empty));
                }
            }
            Some(other) => {
                return Err(MatchError::InvalidSchema {
                    message: format!(
                        "properties at {} must be an object, got {}",
                        path,
                        json_type_name(other)
                    ),
                })
            }
        }

        if let Some(Value::Array(branches)) = map.get("allOf") {
            for (i, branch) in branches.iter().enumerate() {
                if let Shape::Object(object) = self.shape(branch, &format!("{}/allOf/{}", path, i))? {
                    for field in &object.fields {
                        if !fields.iter().any(|f: &FieldDescriptor| f.name == field.name) {
                            fields.push(field.clone());
                        }
                    }
                }
            }
        }

        Ok(fields)
    }
}

/// `None` if the property is skipped, otherwise whether it may be absent.
fn coverage_mode(property: &Value, path: &str) -> Result<Option<bool>, MatchError> {
    match property.get(COVERAGE_ANNOTATION) {
        None => Ok(Some(false)),
        Some(Value::String(mode)) => match mode.as_str() {
            "skip" => Ok(None),
            "optional" => Ok(Some(true)),
            "required" => Ok(Some(false)),
            other => Err(MatchError::InvalidSchema {
                message: format!(
                    "unknown {} \"{}\" at {}: expected skip, optional, or required",
                    COVERAGE_ANNOTATION, other, path
                ),
            }),
        },
        Some(other) => Err(MatchError::InvalidSchema {
            message: format!(
                "invalid {} at {}: expected string, got {}",
                COVERAGE_ANNOTATION,
                path,
                json_type_name(other)
            ),
        }),
    }
}

fn has_type(map: &Map<String, Value>, expected: &str) -> bool {
    match map.get("type") {
        Some(Value::String(t)) => t == expected,
        Some(Value::Array(types)) => types.iter().any(|t| t == expected),
        _ => false,
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    has_type(map, "object") || map.contains_key("properties")
}

fn is_array_schema(map: &Map<String, Value>) -> bool {
    has_type(map, "array") || map.contains_key("items")
}

fn schema_name(map: &Map<String, Value>, path: &str) -> String {
    map.get("title")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| path.to_string())
}
