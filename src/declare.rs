//! Schema type declarations.
//!
//! A schema type describes its own structure by implementing [`Schema`].
//! Std containers and scalars are already covered; record types declare
//! their members with [`StructDecl`]:
//!
//! ```
//! use json_coverage::{Schema, StructDecl, TypeRef};
//!
//! struct Publisher {
//!     address: String,
//!     msg_rate_in: f64,
//! }
//!
//! impl Schema for Publisher {
//!     fn declare() -> TypeRef {
//!         StructDecl::new("Publisher")
//!             .field::<String>("Address", "address")
//!             .field::<f64>("MsgRateIn", "msgRateIn,omitempty")
//!             .into()
//!     }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

/// Exclusion sentinel for a member's JSON tag.
pub const EXCLUDED_TAG: &str = "-";

/// Option that marks a member as omitted when empty.
pub const OMIT_EMPTY: &str = "omitempty";

/// A type that can describe its own structure for coverage checking.
pub trait Schema: 'static {
    fn declare() -> TypeRef;
}

/// Declared type of a schema member, before reduction to a [`Shape`](crate::Shape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Scalar,
    /// Transparent wrapper (`Option`, `Box`, `Rc`, `Arc`).
    Pointer(Box<TypeRef>),
    Sequence(Box<TypeRef>),
    /// String-keyed map.
    Map(Box<TypeRef>),
    Struct(StructDecl),
}

impl TypeRef {
    /// Declared type of `T`.
    pub fn of<T: Schema>() -> TypeRef {
        T::declare()
    }

    pub fn pointer(inner: TypeRef) -> TypeRef {
        TypeRef::Pointer(Box::new(inner))
    }

    pub fn sequence(inner: TypeRef) -> TypeRef {
        TypeRef::Sequence(Box::new(inner))
    }

    pub fn map(inner: TypeRef) -> TypeRef {
        TypeRef::Map(Box::new(inner))
    }

    /// Strip every pointer layer.
    pub fn unwrap_pointers(&self) -> &TypeRef {
        let mut current = self;
        while let TypeRef::Pointer(inner) = current {
            current = inner;
        }
        current
    }

    /// Human-readable name for diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            TypeRef::Scalar => "scalar".to_string(),
            TypeRef::Pointer(inner) => format!("*{}", inner.display_name()),
            TypeRef::Sequence(inner) => format!("[]{}", inner.display_name()),
            TypeRef::Map(inner) => format!("map[string]{}", inner.display_name()),
            TypeRef::Struct(decl) => decl.name.clone(),
        }
    }
}

/// A record type: fixed named members with declared types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub members: Vec<MemberDecl>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add an exported member with a JSON tag (`"name"`, `"name,omitempty"`, `"-"`).
    pub fn field<T: Schema>(self, name: &str, tag: &str) -> Self {
        self.member(MemberDecl::new(name, TypeRef::of::<T>()).tag(tag))
    }

    /// Add an exported member without a JSON tag.
    pub fn untagged<T: Schema>(self, name: &str) -> Self {
        self.member(MemberDecl::new(name, TypeRef::of::<T>()))
    }

    /// Add a member that is not externally visible.
    pub fn unexported<T: Schema>(self, name: &str) -> Self {
        self.member(MemberDecl::new(name, TypeRef::of::<T>()).exported(false))
    }

    pub fn member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }
}

impl From<StructDecl> for TypeRef {
    fn from(decl: StructDecl) -> Self {
        TypeRef::Struct(decl)
    }
}

/// One declared member of a [`StructDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDecl {
    pub name: String,
    pub exported: bool,
    /// Raw JSON tag, if one was declared.
    pub tag: Option<String>,
    pub ty: TypeRef,
}

impl MemberDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            exported: true,
            tag: None,
            ty,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Parsed form of the JSON tag.
    pub fn json_tag(&self) -> JsonTag<'_> {
        self.tag.as_deref().map(JsonTag::parse).unwrap_or_default()
    }
}

/// Parsed JSON tag of the form `name[,option...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonTag<'a> {
    /// Explicit JSON name; `None` when the name part is empty.
    pub name: Option<&'a str>,
    pub excluded: bool,
    pub omit_empty: bool,
}

impl<'a> JsonTag<'a> {
    /// Parse a raw tag. Only the exact tag `"-"` excludes a member; `"-,"`
    /// names it `"-"`.
    pub fn parse(raw: &'a str) -> Self {
        if raw == EXCLUDED_TAG {
            return JsonTag {
                name: None,
                excluded: true,
                omit_empty: false,
            };
        }

        let mut parts = raw.split(',');
        let name = parts.next().filter(|n| !n.is_empty());
        let omit_empty = parts.any(|opt| opt == OMIT_EMPTY);

        JsonTag {
            name,
            excluded: false,
            omit_empty,
        }
    }
}

// --- Std impls ---

macro_rules! scalar_schema {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Schema for $ty {
                fn declare() -> TypeRef {
                    TypeRef::Scalar
                }
            }
        )*
    };
}

scalar_schema!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    (),
    String,
    &'static str,
    serde_json::Value,
    serde_json::Number,
);

macro_rules! pointer_schema {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Schema> Schema for $wrapper<T> {
                fn declare() -> TypeRef {
                    TypeRef::pointer(T::declare())
                }
            }
        )*
    };
}

pointer_schema!(Option, Box, Rc, Arc);

macro_rules! sequence_schema {
    ($($seq:ident),*) => {
        $(
            impl<T: Schema> Schema for $seq<T> {
                fn declare() -> TypeRef {
                    TypeRef::sequence(T::declare())
                }
            }
        )*
    };
}

sequence_schema!(Vec, VecDeque, BTreeSet);

impl<T: Schema, S: 'static> Schema for HashSet<T, S> {
    fn declare() -> TypeRef {
        TypeRef::sequence(T::declare())
    }
}

impl<T: Schema, const N: usize> Schema for [T; N] {
    fn declare() -> TypeRef {
        TypeRef::sequence(T::declare())
    }
}

impl<V: Schema, S: 'static> Schema for HashMap<String, V, S> {
    fn declare() -> TypeRef {
        TypeRef::map(V::declare())
    }
}

impl<V: Schema> Schema for BTreeMap<String, V> {
    fn declare() -> TypeRef {
        TypeRef::map(V::declare())
    }
}

impl<V: Schema, S: 'static> Schema for IndexMap<String, V, S> {
    fn declare() -> TypeRef {
        TypeRef::map(V::declare())
    }
}
