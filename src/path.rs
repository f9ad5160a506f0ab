//! Field access paths.
//!
//! Paths render as `.statsA.partitions[0]["p-0"].publishers`: named members
//! are prefixed with `.`, array indices and map keys are bracketed.

use std::fmt;
use std::sync::Arc;

/// One step from a value to a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named object member.
    Field(String),
    /// Array element.
    Index(usize),
    /// Map entry.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{}", name),
            PathSegment::Index(i) => write!(f, "[{}]", i),
            PathSegment::Key(key) => write!(f, "[\"{}\"]", key),
        }
    }
}

/// Render segments left to right into a locator string.
pub fn render_path(segments: &[PathSegment]) -> String {
    segments.iter().map(ToString::to_string).collect()
}

/// Immutable position in a document.
///
/// Descending returns a new path that shares its parent, so a path handed
/// to a child can never disturb the caller's own position.
#[derive(Debug, Clone, Default)]
pub struct FieldPath {
    node: Option<Arc<Node>>,
}

#[derive(Debug)]
struct Node {
    parent: FieldPath,
    segment: PathSegment,
    depth: usize,
}

impl FieldPath {
    /// The empty path at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&self, segment: PathSegment) -> Self {
        FieldPath {
            node: Some(Arc::new(Node {
                parent: self.clone(),
                segment,
                depth: self.depth() + 1,
            })),
        }
    }

    pub fn field(&self, name: &str) -> Self {
        self.push(PathSegment::Field(name.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    pub fn key(&self, key: &str) -> Self {
        self.push(PathSegment::Key(key.to_string()))
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.node.as_ref().map_or(0, |node| node.depth)
    }

    pub fn is_root(&self) -> bool {
        self.node.is_none()
    }

    /// Segments from the root outwards.
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut segments = Vec::with_capacity(self.depth());
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            segments.push(node.segment.clone());
            current = node.parent.node.as_deref();
        }
        segments.reverse();
        segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_path(&self.segments()))
    }
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.depth() == other.depth() && self.segments() == other.segments()
    }
}

impl Eq for FieldPath {}
