//! Highlighters: mapping tag sequences to class strings.
//!
//! A [`Highlighter`] is a value pairing a style function with an optional
//! scope predicate. The style function resolves tags to classes; the scope
//! predicate restricts the highlighter to languages whose top node it
//! accepts. Several highlighters compose by concatenating their non-empty
//! results in order.
//!
//! [`tag_highlighter`] builds the common table-driven kind: classes keyed
//! by tag id, resolved by scanning each input tag's specificity chain and
//! taking the first hit, so a theme can declare a style at any level of the
//! tag lattice and cover everything below it.

use crate::tag::Tag;
use crate::tags::tags;
use glint_tree::NodeType;
use once_cell::sync::Lazy;
use std::collections::HashMap;

type StyleFn = dyn Fn(&[Tag]) -> Option<String> + Send + Sync;
type ScopeFn = dyn Fn(&NodeType) -> bool + Send + Sync;

/// A style function with an optional language scope.
pub struct Highlighter {
    style: Box<StyleFn>,
    scope: Option<Box<ScopeFn>>,
}

impl Highlighter {
    /// Creates a highlighter from a style function.
    pub fn new(style: impl Fn(&[Tag]) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            style: Box::new(style),
            scope: None,
        }
    }

    /// Restricts this highlighter to languages whose top node the
    /// predicate accepts.
    pub fn with_scope(mut self, scope: impl Fn(&NodeType) -> bool + Send + Sync + 'static) -> Self {
        self.scope = Some(Box::new(scope));
        self
    }

    /// Resolves a tag sequence to a class string.
    pub fn style(&self, tags: &[Tag]) -> Option<String> {
        (self.style)(tags)
    }

    /// Whether this highlighter applies under the given top node. A
    /// highlighter without a scope applies everywhere.
    pub fn scope_accepts(&self, ty: &NodeType) -> bool {
        self.scope.as_ref().map_or(true, |scope| scope(ty))
    }
}

/// Composes highlighters over a tag sequence: every non-empty result,
/// space-joined, in highlighter order.
pub(crate) fn compose_style(highlighters: &[&Highlighter], tags: &[Tag]) -> String {
    let mut classes = String::new();
    for h in highlighters {
        if let Some(cls) = h.style(tags) {
            if cls.is_empty() {
                continue;
            }
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(&cls);
        }
    }
    classes
}

/// One entry of a tag-to-class table.
pub struct StyleEntry {
    tags: Vec<Tag>,
    class: String,
}

impl StyleEntry {
    /// Maps a single tag to a class string.
    pub fn new(tag: &Tag, class: &str) -> Self {
        Self {
            tags: vec![tag.clone()],
            class: class.to_string(),
        }
    }

    /// Maps several tags to the same class string.
    pub fn group(tags: &[Tag], class: &str) -> Self {
        Self {
            tags: tags.to_vec(),
            class: class.to_string(),
        }
    }
}

/// Options for [`tag_highlighter`].
#[derive(Default)]
pub struct TagHighlighterOptions {
    /// A class added to every styled range, before per-tag classes.
    pub all: Option<String>,
    /// A scope predicate restricting the highlighter to matching top
    /// nodes.
    pub scope: Option<Box<ScopeFn>>,
}

/// Builds a table-driven highlighter.
///
/// For each input tag the table is probed along the tag's specificity
/// chain; the first entry found contributes one class and ends the scan
/// for that tag. The result is `None` when nothing matched and no `all`
/// class was configured.
pub fn tag_highlighter(entries: Vec<StyleEntry>, options: TagHighlighterOptions) -> Highlighter {
    let mut map: HashMap<u32, String> = HashMap::new();
    for entry in entries {
        for tag in &entry.tags {
            map.insert(tag.id(), entry.class.clone());
        }
    }
    let all = options.all;

    let highlighter = Highlighter::new(move |tags| {
        let mut classes = all.clone();
        for tag in tags {
            for sub in tag.set() {
                if let Some(cls) = map.get(&sub.id()) {
                    match &mut classes {
                        Some(acc) => {
                            acc.push(' ');
                            acc.push_str(cls);
                        }
                        None => classes = Some(cls.clone()),
                    }
                    break;
                }
            }
        }
        classes
    });

    match options.scope {
        Some(scope) => Highlighter {
            scope: Some(scope),
            ..highlighter
        },
        None => highlighter,
    }
}

static CLASS_HIGHLIGHTER: Lazy<Highlighter> = Lazy::new(|| {
    let t = tags();
    tag_highlighter(
        vec![
            StyleEntry::new(&t.link, "hl-link"),
            StyleEntry::new(&t.heading, "hl-heading"),
            StyleEntry::new(&t.emphasis, "hl-emphasis"),
            StyleEntry::new(&t.strong, "hl-strong"),
            StyleEntry::new(&t.keyword, "hl-keyword"),
            StyleEntry::new(&t.atom, "hl-atom"),
            StyleEntry::new(&t.boolean, "hl-bool"),
            StyleEntry::new(&t.url, "hl-url"),
            StyleEntry::new(&t.label_name, "hl-labelName"),
            StyleEntry::new(&t.inserted, "hl-inserted"),
            StyleEntry::new(&t.deleted, "hl-deleted"),
            StyleEntry::new(&t.literal, "hl-literal"),
            StyleEntry::new(&t.string, "hl-string"),
            StyleEntry::new(&t.number, "hl-number"),
            StyleEntry::group(
                &[
                    t.regexp.clone(),
                    t.escape.clone(),
                    t.special.apply(&t.string),
                ],
                "hl-string2",
            ),
            StyleEntry::new(&t.variable_name, "hl-variableName"),
            StyleEntry::new(&t.local.apply(&t.variable_name), "hl-variableName hl-local"),
            StyleEntry::new(
                &t.definition.apply(&t.variable_name),
                "hl-variableName hl-definition",
            ),
            StyleEntry::new(&t.special.apply(&t.variable_name), "hl-variableName2"),
            StyleEntry::new(
                &t.definition.apply(&t.property_name),
                "hl-propertyName hl-definition",
            ),
            StyleEntry::new(&t.type_name, "hl-typeName"),
            StyleEntry::new(&t.namespace, "hl-namespace"),
            StyleEntry::new(&t.class_name, "hl-className"),
            StyleEntry::new(&t.macro_name, "hl-macroName"),
            StyleEntry::new(&t.property_name, "hl-propertyName"),
            StyleEntry::new(&t.operator, "hl-operator"),
            StyleEntry::new(&t.comment, "hl-comment"),
            StyleEntry::new(&t.meta, "hl-meta"),
            StyleEntry::new(&t.invalid, "hl-invalid"),
            StyleEntry::new(&t.punctuation, "hl-punctuation"),
        ],
        TagHighlighterOptions::default(),
    )
});

/// The stock highlighter mapping the standard vocabulary to stable,
/// `hl-`-prefixed class names.
pub fn class_highlighter() -> &'static Highlighter {
    &CLASS_HIGHLIGHTER
}
