//! JSON Field Coverage
//!
//! Checks that a JSON document contains every field a schema declares,
//! recursively through nested objects, arrays and maps, and reports the
//! access path of each missing field.
//!
//! Typical use is confirming that a captured API response or a test
//! fixture exercises every documented field.
//!
//! # Example
//!
//! ```
//! use json_coverage::{match_str, Schema, StructDecl, TypeRef};
//!
//! struct Partition;
//!
//! impl Schema for Partition {
//!     fn declare() -> TypeRef {
//!         StructDecl::new("Partition")
//!             .field::<Vec<String>>("Publishers", "publishers")
//!             .into()
//!     }
//! }
//!
//! struct Stats;
//!
//! impl Schema for Stats {
//!     fn declare() -> TypeRef {
//!         StructDecl::new("Stats")
//!             .field::<f64>("MsgRateIn", "msgRateIn")
//!             .field::<Vec<std::collections::HashMap<String, Partition>>>("Partitions", "partitions")
//!             .field::<String>("Scratch", "-")
//!             .into()
//!     }
//! }
//!
//! let report = match_str::<Stats>(r#"{"partitions": [{"p-0": {}}]}"#).unwrap();
//!
//! assert!(!report.matched);
//! assert_eq!(report.missing, [".msgRateIn", r#".partitions[0]["p-0"].publishers"#]);
//! ```
//!
//! # Path Format
//!
//! | Segment | Rendered |
//! |---------|----------|
//! | Object member `name` | `.name` |
//! | Array element `3` | `[3]` |
//! | Map entry `"k"` | `["k"]` |
//!
//! # Rules
//!
//! - A field is missing iff it is declared (and not excluded) but its key is
//!   absent from the JSON object at that path.
//! - A container whose JSON value has the wrong type is reported at its own
//!   path and not descended into.
//! - Extra JSON keys never affect the result.

mod declare;
mod error;
mod extract;
mod json_schema;
mod loader;
mod matcher;
mod path;
mod types;

pub use declare::{JsonTag, MemberDecl, Schema, StructDecl, TypeRef, EXCLUDED_TAG, OMIT_EMPTY};
pub use error::MatchError;
pub use extract::{extract, shape_of, shape_of_type};
pub use json_schema::{root_from_json_schema, shape_from_json_schema, COVERAGE_ANNOTATION};
pub use loader::{is_url, load_json, load_json_auto, load_json_bytes, load_json_str, navigate_fragment};
pub use matcher::{declared_paths, match_json, match_str, match_value, MatchReport, Matcher};
pub use path::{render_path, FieldPath, PathSegment};
pub use types::{
    json_type_name, FieldDescriptor, MatchOptions, NameFallback, ObjectShape, RootShape, Shape,
};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
