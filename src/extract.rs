//! Field descriptor extraction - reduces declared types to shapes.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::declare::{Schema, StructDecl, TypeRef};
use crate::error::MatchError;
use crate::types::{FieldDescriptor, NameFallback, RootShape, Shape};

type ShapeCache = RwLock<HashMap<(TypeId, NameFallback), RootShape>>;

static ROOT_SHAPES: Lazy<ShapeCache> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Produce the JSON-visible members of a record type, in declaration order.
///
/// Members that are not exported, or whose tag is the exclusion sentinel,
/// are skipped. Members without a tag name are looked up under the name
/// given by `fallback`.
pub fn extract(decl: &StructDecl, fallback: NameFallback) -> Vec<FieldDescriptor> {
    decl.members
        .iter()
        .filter(|member| member.exported)
        .filter_map(|member| {
            let tag = member.json_tag();
            if tag.excluded {
                return None;
            }
            let name = match tag.name {
                Some(name) => name.to_string(),
                None => fallback.apply(&member.name),
            };
            Some(
                FieldDescriptor::new(name, shape_of_type(&member.ty, fallback))
                    .omit_empty(tag.omit_empty),
            )
        })
        .collect()
}

/// Reduce a declared type to its shape, unwrapping pointer layers first.
pub fn shape_of_type(ty: &TypeRef, fallback: NameFallback) -> Shape {
    match ty.unwrap_pointers() {
        TypeRef::Scalar => Shape::Leaf,
        TypeRef::Sequence(inner) => Shape::array_of(shape_of_type(inner, fallback)),
        TypeRef::Map(inner) => Shape::map_of(shape_of_type(inner, fallback)),
        TypeRef::Struct(decl) => Shape::object(decl.name.clone(), extract(decl, fallback)),
        // unwrap_pointers never yields a pointer
        TypeRef::Pointer(_) => Shape::Leaf,
    }
}

/// Root shape of a schema type, memoized per type and naming policy.
///
/// # Errors
///
/// Returns `MatchError::InvalidRootSchema` if `T` (after unwrapping
/// pointers) is not a record type.
pub fn shape_of<T: Schema>(fallback: NameFallback) -> Result<RootShape, MatchError> {
    let key = (TypeId::of::<T>(), fallback);

    if let Some(cached) = ROOT_SHAPES
        .read()
        .ok()
        .and_then(|cache| cache.get(&key).cloned())
    {
        return Ok(cached);
    }

    let ty = T::declare();
    let root = match ty.unwrap_pointers() {
        TypeRef::Struct(_) => RootShape::new(shape_of_type(&ty, fallback))?,
        _ => {
            return Err(MatchError::InvalidRootSchema {
                type_name: type_name::<T>().to_string(),
            })
        }
    };
    tracing::debug!(
        schema = type_name::<T>(),
        fields = root.object().fields.len(),
        "extracted root shape"
    );

    if let Ok(mut cache) = ROOT_SHAPES.write() {
        cache.insert(key, root.clone());
    }
    Ok(root)
}
