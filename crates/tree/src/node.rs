//! Node types and the typed property facility.
//!
//! A grammar is described by a set of [`NodeType`] values. Each type is an
//! immutable, cheaply clonable handle carrying a name, a top-node flag, and
//! a table of type-erased properties. Properties are attached when the
//! grammar is built, so looking one up during a highlight pass costs a map
//! probe on the type and never allocates per node.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_PROP_ID: AtomicU32 = AtomicU32::new(0);

/// A typed key for per-node-type properties.
///
/// Each key gets a process-unique id when created. The same key value must
/// be used for both attaching (via [`NodeProp::set`]) and reading (via
/// [`NodeProp::get`]); a fresh key never sees values attached under another.
pub struct NodeProp<T> {
    id: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> NodeProp<T> {
    /// Creates a new property key with a fresh id.
    pub fn new() -> Self {
        Self {
            id: NEXT_PROP_ID.fetch_add(1, Ordering::Relaxed),
            _marker: PhantomData,
        }
    }

    /// Wraps a value into an entry that node-type construction accepts.
    pub fn set(&self, value: T) -> PropEntry {
        PropEntry {
            id: self.id,
            value: Arc::new(value),
        }
    }

    /// Reads this property off a node type, if attached.
    pub fn get<'a>(&self, ty: &'a NodeType) -> Option<&'a T> {
        ty.inner.props.get(&self.id).and_then(|v| v.downcast_ref::<T>())
    }
}

impl<T: Send + Sync + 'static> Default for NodeProp<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One attached property: a key id paired with its type-erased value.
#[derive(Clone)]
pub struct PropEntry {
    id: u32,
    value: Arc<dyn Any + Send + Sync>,
}

/// Yields properties to attach per node type when a grammar is extended.
pub trait PropSource {
    /// Returns the entry to attach to `ty`, or `None` to leave it unchanged.
    fn props_for(&self, ty: &NodeType) -> Option<PropEntry>;
}

/// A node type in a grammar.
///
/// Equality is identity: two `NodeType` values compare equal only when they
/// are clones of the same underlying definition. Extending a node set
/// produces new definitions, so grammars should be extended before trees
/// are built from their types.
#[derive(Clone)]
pub struct NodeType {
    inner: Arc<NodeTypeData>,
}

struct NodeTypeData {
    name: String,
    top: bool,
    props: HashMap<u32, Arc<dyn Any + Send + Sync>>,
}

impl NodeType {
    /// Defines a regular node type.
    pub fn new(name: &str) -> Self {
        Self::define(name, false)
    }

    /// Defines a language top node type.
    ///
    /// Top nodes mark the root of a language scope; scoped highlighters are
    /// re-filtered when the walker enters one.
    pub fn top(name: &str) -> Self {
        Self::define(name, true)
    }

    fn define(name: &str, top: bool) -> Self {
        Self {
            inner: Arc::new(NodeTypeData {
                name: name.to_string(),
                top,
                props: HashMap::new(),
            }),
        }
    }

    /// Returns a copy of this type with one more property attached.
    pub fn with_prop(&self, entry: PropEntry) -> Self {
        let mut props = self.inner.props.clone();
        props.insert(entry.id, entry.value);
        Self {
            inner: Arc::new(NodeTypeData {
                name: self.inner.name.clone(),
                top: self.inner.top,
                props,
            }),
        }
    }

    /// The node type's name, as matched by selector pieces.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether this is a language top node.
    pub fn is_top(&self) -> bool {
        self.inner.top
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for NodeType {}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.inner.name)
            .field("top", &self.inner.top)
            .finish()
    }
}

/// The ordered collection of a grammar's node types.
pub struct NodeSet {
    types: Vec<NodeType>,
}

impl NodeSet {
    /// Creates a node set from the grammar's types.
    pub fn new(types: Vec<NodeType>) -> Self {
        Self { types }
    }

    /// All types in the set, in definition order.
    pub fn types(&self) -> &[NodeType] {
        &self.types
    }

    /// Looks a type up by name.
    pub fn get(&self, name: &str) -> Option<&NodeType> {
        self.types.iter().find(|t| t.name() == name)
    }

    /// Returns a new set where each type carries whatever `source` yields
    /// for it. Types the source ignores are shared, not copied.
    pub fn extend(&self, source: &dyn PropSource) -> NodeSet {
        NodeSet {
            types: self
                .types
                .iter()
                .map(|ty| match source.props_for(ty) {
                    Some(entry) => ty.with_prop(entry),
                    None => ty.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prop_roundtrip() {
        let prop: NodeProp<u32> = NodeProp::new();
        let ty = NodeType::new("Word").with_prop(prop.set(7));
        assert_eq!(prop.get(&ty), Some(&7));
    }

    #[test]
    fn test_prop_missing() {
        let prop: NodeProp<u32> = NodeProp::new();
        let ty = NodeType::new("Word");
        assert_eq!(prop.get(&ty), None);
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        let a: NodeProp<u32> = NodeProp::new();
        let b: NodeProp<u32> = NodeProp::new();
        let ty = NodeType::new("Word").with_prop(a.set(1));
        assert_eq!(a.get(&ty), Some(&1));
        assert_eq!(b.get(&ty), None);
    }

    #[test]
    fn test_node_type_identity() {
        let a = NodeType::new("Word");
        let b = NodeType::new("Word");
        assert_eq!(a, a.clone());
        assert_ne!(a, b, "same-name definitions are still distinct types");
    }

    #[test]
    fn test_top_flag() {
        assert!(NodeType::top("Document").is_top());
        assert!(!NodeType::new("Word").is_top());
    }

    #[test]
    fn test_extend_attaches_per_name() {
        struct ForWord(NodeProp<&'static str>);
        impl PropSource for ForWord {
            fn props_for(&self, ty: &NodeType) -> Option<PropEntry> {
                (ty.name() == "Word").then(|| self.0.set("styled"))
            }
        }

        let source = ForWord(NodeProp::new());
        let set = NodeSet::new(vec![NodeType::new("Word"), NodeType::new("Space")]);
        let extended = set.extend(&source);

        let word = extended.get("Word").unwrap();
        let space = extended.get("Space").unwrap();
        assert_eq!(source.0.get(word), Some(&"styled"));
        assert_eq!(source.0.get(space), None);
        assert!(word != set.get("Word").unwrap(), "extension defines new types");
    }
}
