//! The highlight tag lattice.
//!
//! Tags are interned, process-unique values forming a DAG: a tag defined
//! with a parent is a more specific variant of it, and a [`Modifier`]
//! applied to a tag produces a derived tag that is more specific still.
//! Every tag materializes its full *specificity chain* at creation — the
//! ordered list of itself and everything it falls back to — so style lookup
//! is a linear scan with no graph traversal.
//!
//! Modifier application is idempotent and commutative, and the result is
//! interned: `definition(constant(t))` and `constant(definition(t))` are
//! the same value, not merely equal ones. Interning happens through an
//! instance cache carried by each modifier.
//!
//! Tags and modifiers are expected to be created during initialization;
//! once published they are immutable and freely shareable across threads.

use crate::error::HighlightError;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_TAG_ID: AtomicU32 = AtomicU32::new(0);
static NEXT_MODIFIER_ID: AtomicU32 = AtomicU32::new(0);

/// A node in the highlight tag lattice.
///
/// Cloning is cheap (`Arc`-backed); equality compares the interned
/// identity.
#[derive(Clone)]
pub struct Tag {
    inner: Arc<TagData>,
}

struct TagData {
    id: u32,
    name: Option<String>,
    /// For a modified tag, the unmodified tag it was derived from.
    base: Option<Tag>,
    /// Modifiers applied to `base`, sorted by modifier id.
    modified: Vec<Modifier>,
    /// The specificity chain minus the tag itself, most specific first.
    ancestors: Vec<Tag>,
}

impl Tag {
    /// Defines a fresh unmodified tag, optionally below a parent.
    ///
    /// The parent must itself be unmodified; deriving below a modified tag
    /// is rejected with [`HighlightError::IllegalTagDerivation`].
    pub fn define(name: Option<&str>, parent: Option<&Tag>) -> Result<Tag, HighlightError> {
        if let Some(parent) = parent {
            if !parent.modifiers().is_empty() {
                return Err(HighlightError::IllegalTagDerivation {
                    parent: parent.to_string(),
                    child: name.unwrap_or("<anonymous>").to_string(),
                });
            }
        }
        Ok(Self::define_unchecked(name, parent))
    }

    /// Defines a tag without the modified-parent check. Callers must pass
    /// an unmodified parent.
    pub(crate) fn define_unchecked(name: Option<&str>, parent: Option<&Tag>) -> Tag {
        let mut ancestors = Vec::new();
        if let Some(parent) = parent {
            ancestors.extend(parent.set().cloned());
        }
        Tag {
            inner: Arc::new(TagData {
                id: NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed),
                name: name.map(str::to_string),
                base: None,
                modified: Vec::new(),
                ancestors,
            }),
        }
    }

    /// Defines a modifier.
    pub fn define_modifier(name: Option<&str>) -> Modifier {
        Modifier {
            inner: Arc::new(ModifierData {
                id: NEXT_MODIFIER_ID.fetch_add(1, Ordering::Relaxed),
                name: name.map(str::to_string),
                instances: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The tag's process-unique id.
    pub fn id(&self) -> u32 {
        self.inner.id
    }

    /// The tag's debug label, if it was given one.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// For a modified tag, the unmodified tag it was derived from.
    pub fn base(&self) -> Option<&Tag> {
        self.inner.base.as_ref()
    }

    /// The modifiers applied to this tag, sorted by modifier id.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.inner.modified
    }

    /// The specificity chain: this tag first, then everything it falls
    /// back to, ordered by decreasing modifier count and then decreasing
    /// base specificity.
    pub fn set(&self) -> impl Iterator<Item = &Tag> {
        std::iter::once(self).chain(self.inner.ancestors.iter())
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Tag {}

impl std::hash::Hash for Tag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.inner.base, &self.inner.name) {
            (_, Some(name)) => write!(f, "{name}"),
            (Some(base), None) => {
                for m in &self.inner.modified {
                    write!(f, "{m}(")?;
                }
                write!(f, "{base}")?;
                for _ in &self.inner.modified {
                    write!(f, ")")?;
                }
                Ok(())
            }
            (None, None) => write!(f, "tag#{}", self.inner.id),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

/// A tag modifier: an idempotent, commutative tag-to-tag mapping.
///
/// Each modifier carries the cache that interns the tags it participates
/// in, so repeated applications hand back the same value.
#[derive(Clone)]
pub struct Modifier {
    inner: Arc<ModifierData>,
}

struct ModifierData {
    id: u32,
    name: Option<String>,
    instances: Mutex<Vec<Tag>>,
}

impl Modifier {
    /// The modifier's process-unique id.
    pub fn id(&self) -> u32 {
        self.inner.id
    }

    /// The modifier's debug label, if it was given one.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Applies this modifier to a tag.
    ///
    /// Applying a modifier the tag already carries returns the tag itself.
    /// Otherwise the result is interned per (base, modifier set), which is
    /// what makes application commutative down to identity.
    pub fn apply(&self, tag: &Tag) -> Tag {
        if tag.modifiers().contains(self) {
            return tag.clone();
        }
        let base = tag.base().unwrap_or(tag).clone();
        let mut mods = tag.modifiers().to_vec();
        mods.push(self.clone());
        mods.sort_by_key(Modifier::id);
        Self::interned(&base, &mods)
    }

    /// Returns the unique tag for `base` with exactly `mods` applied,
    /// creating and registering it on first use.
    fn interned(base: &Tag, mods: &[Modifier]) -> Tag {
        if mods.is_empty() {
            return base.clone();
        }
        if let Some(existing) = mods[0].find_instance(base, mods) {
            return existing;
        }

        // The chain runs through every modifier subset, largest first, and
        // within a subset through the unmodified ancestors of the base,
        // most specific first. The combination of the full set with the
        // base itself is the tag being built and leads the chain.
        let mut ancestors = Vec::new();
        for subset in power_set(mods) {
            for anc in base.set() {
                if !anc.modifiers().is_empty() {
                    continue;
                }
                if subset.len() == mods.len() && anc == base {
                    continue;
                }
                ancestors.push(Self::interned(anc, &subset));
            }
        }

        let tag = Tag {
            inner: Arc::new(TagData {
                id: NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed),
                name: None,
                base: Some(base.clone()),
                modified: mods.to_vec(),
                ancestors,
            }),
        };
        for m in mods {
            m.register(tag.clone());
        }
        tag
    }

    fn find_instance(&self, base: &Tag, mods: &[Modifier]) -> Option<Tag> {
        let instances = self
            .inner
            .instances
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        instances
            .iter()
            .find(|t| t.base() == Some(base) && t.modifiers() == mods)
            .cloned()
    }

    fn register(&self, tag: Tag) {
        self.inner
            .instances
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tag);
    }
}

impl PartialEq for Modifier {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Modifier {}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "mod#{}", self.inner.id),
        }
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifier({self})")
    }
}

/// All subsets of `mods`, ordered by decreasing size. The full set comes
/// first and the empty set last; generation order is stable within a size.
fn power_set(mods: &[Modifier]) -> Vec<Vec<Modifier>> {
    let mut sets: Vec<Vec<Modifier>> = vec![Vec::new()];
    for m in mods {
        for i in 0..sets.len() {
            let mut with = sets[i].clone();
            with.push(m.clone());
            sets.push(with);
        }
    }
    sets.sort_by(|a, b| b.len().cmp(&a.len()));
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Tag {
        Tag::define(Some(name), None).unwrap()
    }

    fn chain(tag: &Tag) -> Vec<String> {
        tag.set().map(Tag::to_string).collect()
    }

    #[test]
    fn test_unmodified_chain_is_self_then_parents() {
        let name = named("name");
        let variable = Tag::define(Some("variableName"), Some(&name)).unwrap();
        assert_eq!(chain(&variable), ["variableName", "name"]);
        assert_eq!(chain(&name), ["name"]);
    }

    #[test]
    fn test_parent_chain_included_in_order() {
        let a = named("a");
        let b = Tag::define(Some("b"), Some(&a)).unwrap();
        let c = Tag::define(Some("c"), Some(&b)).unwrap();
        assert_eq!(chain(&c), ["c", "b", "a"]);
    }

    #[test]
    fn test_derive_from_modified_rejected() {
        let def = Tag::define_modifier(Some("definition"));
        let base = named("variableName");
        let modified = def.apply(&base);
        let err = Tag::define(Some("child"), Some(&modified)).unwrap_err();
        assert!(matches!(err, HighlightError::IllegalTagDerivation { .. }));
        assert!(err.to_string().contains("definition(variableName)"));
    }

    #[test]
    fn test_modifier_idempotent_identity() {
        let def = Tag::define_modifier(Some("definition"));
        let tag = named("variableName");
        let once = def.apply(&tag);
        let twice = def.apply(&once);
        assert_eq!(once, twice);
        assert_eq!(once.id(), twice.id());
    }

    #[test]
    fn test_modifier_commutative_identity() {
        let def = Tag::define_modifier(Some("definition"));
        let con = Tag::define_modifier(Some("constant"));
        let tag = named("variableName");
        let ab = def.apply(&con.apply(&tag));
        let ba = con.apply(&def.apply(&tag));
        assert_eq!(ab.id(), ba.id());
    }

    #[test]
    fn test_modified_chain_single_modifier() {
        let def = Tag::define_modifier(Some("definition"));
        let name = named("name");
        let variable = Tag::define(Some("variableName"), Some(&name)).unwrap();
        let tag = def.apply(&variable);
        assert_eq!(
            chain(&tag),
            [
                "definition(variableName)",
                "definition(name)",
                "variableName",
                "name",
            ]
        );
    }

    #[test]
    fn test_modified_chain_two_modifiers() {
        let m1 = Tag::define_modifier(Some("m1"));
        let m2 = Tag::define_modifier(Some("m2"));
        let base = named("base");
        let tag = m2.apply(&m1.apply(&base));
        // Subsets by decreasing size, then bases by decreasing specificity.
        assert_eq!(
            chain(&tag),
            ["m1(m2(base))", "m1(base)", "m2(base)", "base"]
        );
    }

    #[test]
    fn test_modified_chain_two_modifiers_with_parent() {
        let m1 = Tag::define_modifier(Some("m1"));
        let m2 = Tag::define_modifier(Some("m2"));
        let parent = named("parent");
        let base = Tag::define(Some("base"), Some(&parent)).unwrap();
        let tag = m1.apply(&m2.apply(&base));
        assert_eq!(
            chain(&tag),
            [
                "m1(m2(base))",
                "m1(m2(parent))",
                "m1(base)",
                "m1(parent)",
                "m2(base)",
                "m2(parent)",
                "base",
                "parent",
            ]
        );
    }

    #[test]
    fn test_chain_entries_strictly_more_general() {
        let m1 = Tag::define_modifier(None);
        let m2 = Tag::define_modifier(None);
        let parent = named("parent");
        let base = Tag::define(Some("base"), Some(&parent)).unwrap();
        let tag = m1.apply(&m2.apply(&base));

        let entries: Vec<Tag> = tag.set().cloned().collect();
        assert_eq!(entries[0], tag);
        let base_of = |t: &Tag| t.base().unwrap_or(t).clone();
        let head_mods = tag.modifiers().len();
        let head_base_depth = base_of(&tag).set().count();
        for entry in &entries[1..] {
            let fewer_mods = entry.modifiers().len() < head_mods;
            let more_general_base = entry.modifiers().len() == head_mods
                && base_of(entry).set().count() < head_base_depth;
            assert!(
                fewer_mods || more_general_base,
                "{entry} should be more general than {tag}"
            );
        }
    }

    #[test]
    fn test_interning_shares_intermediate_tags() {
        let def = Tag::define_modifier(Some("definition"));
        let name = named("name");
        let variable = Tag::define(Some("variableName"), Some(&name)).unwrap();
        let tag = def.apply(&variable);
        let def_name = def.apply(&name);
        // The chain entry for definition(name) is the interned tag itself.
        assert!(tag.set().any(|t| *t == def_name));
    }

    #[test]
    fn test_anonymous_display_is_stable() {
        let tag = Tag::define(None, None).unwrap();
        assert_eq!(tag.to_string(), format!("tag#{}", tag.id()));
    }

    #[test]
    fn test_modified_display_nests_modifiers() {
        let def = Tag::define_modifier(Some("definition"));
        let con = Tag::define_modifier(Some("constant"));
        let tag = con.apply(&def.apply(&named("x")));
        let rendered = tag.to_string();
        assert!(rendered.contains("x"));
        assert!(rendered.contains("definition("));
        assert!(rendered.contains("constant("));
    }
}
