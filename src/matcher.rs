//! Structural matching of JSON documents against schema shapes.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::declare::Schema;
use crate::error::MatchError;
use crate::extract::shape_of;
use crate::loader::load_json_bytes;
use crate::path::FieldPath;
use crate::types::{json_type_name, MatchOptions, ObjectShape, RootShape, Shape};

/// Outcome of a coverage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// True iff every required field is present.
    pub matched: bool,
    /// Paths of missing fields, in traversal order.
    pub missing: Vec<String>,
}

impl MatchReport {
    fn from_missing(missing: Vec<String>) -> Self {
        Self {
            matched: missing.is_empty(),
            missing,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.matched
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matched)?;
        for path in &self.missing {
            write!(f, "\n{}", path)?;
        }
        Ok(())
    }
}

/// Checks JSON documents for the presence of every declared field.
///
/// Each call owns its own traversal state, so one matcher can be shared
/// freely, including across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    options: MatchOptions,
}

impl Matcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Check a parsed document against a root shape.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::RootNotObject` if the document root is not an object.
    pub fn check(&self, root: &RootShape, document: &Value) -> Result<MatchReport, MatchError> {
        let Value::Object(object) = document else {
            return Err(MatchError::RootNotObject {
                actual: json_type_name(document).to_string(),
            });
        };

        let span = tracing::info_span!("coverage_check", schema = %root.object().name);
        let _enter = span.enter();

        let mut missing = Vec::new();
        let matched = self.check_object(object, root.object(), &FieldPath::root(), &mut missing);
        debug_assert_eq!(matched, missing.is_empty());

        tracing::debug!(matched, missing = missing.len(), "coverage check finished");
        Ok(MatchReport::from_missing(missing))
    }

    /// Parse `bytes` and check them against a root shape.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::InvalidJson` for malformed input, or
    /// `MatchError::RootNotObject` if the document root is not an object.
    pub fn check_bytes(&self, root: &RootShape, bytes: &[u8]) -> Result<MatchReport, MatchError> {
        let document = load_json_bytes(bytes)?;
        self.check(root, &document)
    }

    /// Check a parsed document against the declared structure of `T`.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::InvalidRootSchema` if `T` is not a record type,
    /// or `MatchError::RootNotObject` if the document root is not an object.
    pub fn check_type<T: Schema>(&self, document: &Value) -> Result<MatchReport, MatchError> {
        let root = shape_of::<T>(self.options.name_fallback)?;
        self.check(&root, document)
    }

    fn check_value(
        &self,
        value: &Value,
        shape: &Shape,
        path: &FieldPath,
        missing: &mut Vec<String>,
    ) -> bool {
        tracing::trace!(path = %path, shape = shape.kind(), "descending");

        match (shape, value) {
            (Shape::Leaf, _) => true,
            (Shape::Object(object), Value::Object(map)) => {
                self.check_object(map, object, path, missing)
            }
            (Shape::ArrayOf(element), Value::Array(items)) => {
                let mut ret = true;
                for (i, item) in items.iter().enumerate() {
                    ret = self.check_value(item, element, &path.index(i), missing) && ret;
                }
                ret
            }
            (Shape::MapOf(element), Value::Object(map)) => {
                let mut ret = true;
                for (key, item) in map {
                    ret = self.check_value(item, element, &path.key(key), missing) && ret;
                }
                ret
            }
            // Container shape, but the document holds something else here
            (_, other) => {
                record(missing, path.to_string(), shape.kind(), json_type_name(other));
                false
            }
        }
    }

    fn check_object(
        &self,
        object: &Map<String, Value>,
        shape: &ObjectShape,
        path: &FieldPath,
        missing: &mut Vec<String>,
    ) -> bool {
        let mut ret = true;
        for field in &shape.fields {
            let child = path.field(&field.name);
            match object.get(&field.name) {
                Some(value) => {
                    ret = self.check_value(value, &field.shape, &child, missing) && ret;
                }
                None if field.omit_empty && self.options.allow_missing_omitempty => {
                    tracing::trace!(path = %child, "omitempty field absent");
                }
                None => {
                    record(missing, child.to_string(), field.shape.kind(), "absent");
                    ret = false;
                }
            }
        }
        ret
    }
}

fn record(missing: &mut Vec<String>, path: String, expected: &str, found: &str) {
    tracing::debug!(path = %path, expected, found, "missing field");
    missing.push(path);
}

/// Every field path `root` requires, with `[]` standing for any array
/// index and `[*]` for any map key.
pub fn declared_paths(root: &RootShape) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(root.object(), "", &mut paths);
    paths
}

fn collect_paths(object: &ObjectShape, prefix: &str, paths: &mut Vec<String>) {
    for field in &object.fields {
        let path = format!("{}.{}", prefix, field.name);
        paths.push(path.clone());
        collect_nested(&field.shape, path, paths);
    }
}

fn collect_nested(shape: &Shape, path: String, paths: &mut Vec<String>) {
    match shape {
        Shape::Leaf => {}
        Shape::Object(object) => collect_paths(object, &path, paths),
        Shape::ArrayOf(element) => collect_nested(element, format!("{}[]", path), paths),
        Shape::MapOf(element) => collect_nested(element, format!("{}[*]", path), paths),
    }
}

/// Check JSON bytes against `T` with default options.
///
/// # Errors
///
/// See [`Matcher::check_bytes`] and [`Matcher::check_type`].
pub fn match_json<T: Schema>(bytes: &[u8]) -> Result<MatchReport, MatchError> {
    let document = load_json_bytes(bytes)?;
    match_value::<T>(&document)
}

/// Check a JSON string against `T` with default options.
///
/// # Errors
///
/// See [`match_json`].
pub fn match_str<T: Schema>(json: &str) -> Result<MatchReport, MatchError> {
    match_json::<T>(json.as_bytes())
}

/// Check a parsed document against `T` with default options.
///
/// # Errors
///
/// See [`Matcher::check_type`].
pub fn match_value<T: Schema>(document: &Value) -> Result<MatchReport, MatchError> {
    Matcher::default().check_type::<T>(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDescriptor;
    use serde_json::json;

    fn root(fields: Vec<FieldDescriptor>) -> RootShape {
        RootShape::new(Shape::object("Root", fields)).unwrap()
    }

    fn leaf(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, Shape::Leaf)
    }

    #[test]
    fn reports_missing_top_level_field() {
        let shape = root(vec![leaf("a"), leaf("b"), leaf("c")]);
        let report = Matcher::default()
            .check(&shape, &json!({"a": 1, "b": 2}))
            .unwrap();
        assert!(!report.matched);
        assert_eq!(report.missing, [".c"]);
    }

    #[test]
    fn leaf_accepts_any_value() {
        let shape = root(vec![leaf("a")]);
        for value in [json!(null), json!([1]), json!({"x": 1}), json!("s")] {
            let report = Matcher::default()
                .check(&shape, &json!({ "a": value }))
                .unwrap();
            assert!(report.matched);
        }
    }

    #[test]
    fn missing_container_is_not_recursed_into() {
        let inner = Shape::object("Inner", vec![leaf("x"), leaf("y")]);
        let shape = root(vec![FieldDescriptor::new("inner", inner)]);
        let report = Matcher::default().check(&shape, &json!({})).unwrap();
        assert_eq!(report.missing, [".inner"]);
    }

    #[test]
    fn type_mismatch_reported_at_container_path() {
        let shape = root(vec![
            FieldDescriptor::new("obj", Shape::object("Obj", vec![leaf("x")])),
            FieldDescriptor::new("list", Shape::array_of(Shape::Leaf)),
            FieldDescriptor::new("map", Shape::map_of(Shape::Leaf)),
        ]);
        let report = Matcher::default()
            .check(&shape, &json!({"obj": "nope", "list": {}, "map": null}))
            .unwrap();
        assert_eq!(report.missing, [".obj", ".list", ".map"]);
    }

    #[test]
    fn siblings_checked_after_failure() {
        let inner = Shape::object("Inner", vec![leaf("x")]);
        let shape = root(vec![
            FieldDescriptor::new("first", inner.clone()),
            FieldDescriptor::new("second", inner),
        ]);
        let report = Matcher::default()
            .check(&shape, &json!({"first": {}, "second": {}}))
            .unwrap();
        assert_eq!(report.missing, [".first.x", ".second.x"]);
    }

    #[test]
    fn omitempty_tolerated_only_when_enabled() {
        let shape = root(vec![leaf("a").omit_empty(true), leaf("b")]);
        let document = json!({"b": 1});

        let strict = Matcher::default().check(&shape, &document).unwrap();
        assert_eq!(strict.missing, [".a"]);

        let lenient = Matcher::new(MatchOptions::new().allow_missing_omitempty(true))
            .check(&shape, &document)
            .unwrap();
        assert!(lenient.matched);
    }

    #[test]
    fn non_object_root_is_an_error() {
        let shape = root(vec![leaf("a")]);
        let err = Matcher::default().check(&shape, &json!([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            MatchError::RootNotObject { ref actual } if actual == "array"
        ));
    }

    #[test]
    fn check_bytes_rejects_malformed_json() {
        let shape = root(vec![leaf("a")]);
        let err = Matcher::default()
            .check_bytes(&shape, b"{\"a\": ")
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidJson { .. }));
    }

    #[test]
    fn report_display() {
        let report = MatchReport::from_missing(vec![".a".into(), ".b[0].c".into()]);
        assert_eq!(report.to_string(), "false\n.a\n.b[0].c");
        assert_eq!(MatchReport::from_missing(vec![]).to_string(), "true");
    }

    #[test]
    fn declared_paths_lists_every_field() {
        let item = Shape::object("Item", vec![leaf("id")]);
        let shape = root(vec![
            FieldDescriptor::new("items", Shape::array_of(item.clone())),
            FieldDescriptor::new("byKey", Shape::map_of(item)),
            leaf("name"),
        ]);
        assert_eq!(
            declared_paths(&shape),
            [".items", ".items[].id", ".byKey", ".byKey[*].id", ".name"]
        );
    }
}
