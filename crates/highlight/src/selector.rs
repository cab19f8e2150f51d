//! Selector compilation and rule matching.
//!
//! A style map pairs selector strings with tags. Each selector part names a
//! target node, optionally prefixed with an ancestor context
//! (`Parent/Child`), suffixed with `!` (opaque: descendants are replaced)
//! or `/...` (inherit: descendants are included), with `*` matching any one
//! ancestor and JSON-quoted pieces escaping reserved characters.
//!
//! Compilation happens once, when a language is defined: [`style_tags`]
//! turns the map into per-node-name [`Rule`] chains and hands them back as
//! a [`PropSource`] so they can be attached to the grammar's node types
//! under the reserved [`rule_prop`] key. At highlight time,
//! [`matched_rule`] only walks a precompiled chain; nothing is parsed or
//! allocated per node.

use crate::error::{HighlightError, Result};
use crate::tag::Tag;
use glint_tree::{NodeProp, NodeType, PropEntry, PropSource, TreeCursor};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

static RULE_PROP: Lazy<NodeProp<Rule>> = Lazy::new(NodeProp::new);

/// The reserved node-type property under which compiled rule chains are
/// attached.
pub fn rule_prop() -> &'static NodeProp<Rule> {
    &RULE_PROP
}

/// Matches one selector piece: a JSON string literal or a run of
/// unreserved characters.
static PIECE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:"(?:[^"\\]|\\.)*"|[^/!]+)"#).expect("piece pattern is valid"));

/// How a rule's tags apply to the matched node's subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// Style the node itself only.
    Normal,
    /// Style the node and propagate the classes to its descendants.
    Inherit,
    /// Style the node and do not descend into it.
    Opaque,
}

/// The compiled form of one selector part.
///
/// Rules for the same target name are linked through [`Rule::next`],
/// deepest context first; at equal depth the later-compiled rule comes
/// first and wins ties.
#[derive(Clone)]
pub struct Rule {
    inner: Arc<RuleData>,
}

struct RuleData {
    tags: Vec<Tag>,
    mode: RuleMode,
    context: Option<Vec<String>>,
    next: Option<Rule>,
}

impl Rule {
    /// The tags this rule applies.
    pub fn tags(&self) -> &[Tag] {
        &self.inner.tags
    }

    /// How the tags apply to the subtree.
    pub fn mode(&self) -> RuleMode {
        self.inner.mode
    }

    /// Ancestor name patterns, outermost first; an empty string matches
    /// any ancestor. `None` when the rule is unconditional.
    pub fn context(&self) -> Option<&[String]> {
        self.inner.context.as_deref()
    }

    /// The next rule to try for the same node name.
    pub fn next(&self) -> Option<&Rule> {
        self.inner.next.as_ref()
    }

    /// The context depth this rule requires.
    pub fn depth(&self) -> usize {
        self.inner.context.as_ref().map_or(0, Vec::len)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("tags", &self.inner.tags)
            .field("mode", &self.inner.mode)
            .field("context", &self.inner.context)
            .finish()
    }
}

/// A compiled style map: per-target-name rule chains.
///
/// Attach it to a grammar with [`glint_tree::NodeSet::extend`]; it yields
/// each chain head under the [`rule_prop`] key.
#[derive(Debug)]
pub struct StyleTags {
    rules: HashMap<String, Rule>,
}

impl StyleTags {
    /// The chain head compiled for a node name, if any.
    pub fn rule_for(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }
}

impl PropSource for StyleTags {
    fn props_for(&self, ty: &NodeType) -> Option<PropEntry> {
        self.rules
            .get(ty.name())
            .map(|rule| rule_prop().set(rule.clone()))
    }
}

struct PendingRule {
    tags: Vec<Tag>,
    mode: RuleMode,
    context: Option<Vec<String>>,
    index: usize,
}

impl PendingRule {
    fn depth(&self) -> usize {
        self.context.as_ref().map_or(0, Vec::len)
    }
}

/// Compiles a style map into per-node-name rule chains.
///
/// Each entry pairs a selector string (one or more whitespace-separated
/// parts) with the tags those parts apply. Malformed parts are rejected
/// with [`HighlightError::InvalidSelector`] naming the offending part.
pub fn style_tags(spec: &[(&str, &[Tag])]) -> Result<StyleTags> {
    let mut by_name: HashMap<String, Vec<PendingRule>> = HashMap::new();
    let mut index = 0;

    for (selector, tags) in spec {
        for part in selector.split_whitespace() {
            let (mut pieces, mode) = compile_part(part)?;
            let target = pieces.pop().unwrap_or_default();
            if target.is_empty() {
                return Err(HighlightError::InvalidSelector(part.to_string()));
            }
            let context = if pieces.is_empty() { None } else { Some(pieces) };
            by_name.entry(target).or_default().push(PendingRule {
                tags: tags.to_vec(),
                mode,
                context,
                index,
            });
            index += 1;
        }
    }

    let mut rules = HashMap::new();
    for (name, mut pending) in by_name {
        // Deeper contexts are tried first; at equal depth the later part
        // sorts earlier and wins.
        pending.sort_by(|a, b| b.depth().cmp(&a.depth()).then(b.index.cmp(&a.index)));
        let mut next = None;
        for p in pending.into_iter().rev() {
            next = Some(Rule {
                inner: Arc::new(RuleData {
                    tags: p.tags,
                    mode: p.mode,
                    context: p.context,
                    next,
                }),
            });
        }
        if let Some(head) = next {
            rules.insert(name, head);
        }
    }

    trace!(targets = rules.len(), "compiled style map");
    Ok(StyleTags { rules })
}

/// Splits one selector part into its pieces and mode.
fn compile_part(part: &str) -> Result<(Vec<String>, RuleMode)> {
    let invalid = || HighlightError::InvalidSelector(part.to_string());
    let mut pieces = Vec::new();
    let mut mode = RuleMode::Normal;
    let mut pos = 0;

    loop {
        let rest = &part[pos..];
        if rest == "..." && pos > 0 {
            mode = RuleMode::Inherit;
            break;
        }
        let matched = PIECE.find(rest).ok_or_else(invalid)?;
        let text = matched.as_str();
        let piece = if text == "*" {
            String::new()
        } else if text.starts_with('"') {
            serde_json::from_str::<String>(text).map_err(|_| invalid())?
        } else {
            text.to_string()
        };
        pieces.push(piece);
        pos += text.len();
        if pos == part.len() {
            break;
        }
        let sep = part.as_bytes()[pos];
        pos += 1;
        if pos == part.len() && sep == b'!' {
            mode = RuleMode::Opaque;
            break;
        }
        if sep != b'/' {
            return Err(invalid());
        }
    }

    Ok((pieces, mode))
}

/// Finds the first rule on the cursor's node whose context matches.
///
/// This is the lookup the tree walker performs per node; it is exposed so
/// integrations can inspect how a position resolves. Unknown node types
/// and failed contexts yield `None`.
pub fn matched_rule(cursor: &TreeCursor<'_>) -> Option<Rule> {
    let mut rule = rule_prop().get(cursor.node_type());
    while let Some(r) = rule {
        let matches = match r.context() {
            None => true,
            Some(ctx) => cursor.match_context(ctx),
        };
        if matches {
            return Some(r.clone());
        }
        rule = r.next();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::tags;
    use glint_tree::{NodeSet, Tree};

    fn compile(spec: &[(&str, &[Tag])]) -> StyleTags {
        style_tags(spec).expect("selector should compile")
    }

    fn chain_depths(rule: &Rule) -> Vec<usize> {
        let mut depths = Vec::new();
        let mut cur = Some(rule.clone());
        while let Some(r) = cur {
            depths.push(r.depth());
            cur = r.next().cloned();
        }
        depths
    }

    #[test]
    fn test_plain_target() {
        let t = tags();
        let compiled = compile(&[("String", &[t.string.clone()])]);
        let rule = compiled.rule_for("String").unwrap();
        assert_eq!(rule.tags(), &[t.string.clone()]);
        assert_eq!(rule.mode(), RuleMode::Normal);
        assert_eq!(rule.context(), None);
        assert!(rule.next().is_none());
    }

    #[test]
    fn test_context_path() {
        let t = tags();
        let compiled = compile(&[("String/Escape", &[t.escape.clone()])]);
        let rule = compiled.rule_for("Escape").unwrap();
        assert_eq!(rule.context(), Some(&["String".to_string()][..]));
        assert!(compiled.rule_for("String").is_none());
    }

    #[test]
    fn test_deep_context_path() {
        let t = tags();
        let compiled = compile(&[("A/B/C", &[t.keyword.clone()])]);
        let rule = compiled.rule_for("C").unwrap();
        assert_eq!(
            rule.context(),
            Some(&["A".to_string(), "B".to_string()][..])
        );
    }

    #[test]
    fn test_inner_dots_are_a_name_not_a_mode() {
        // "..." only means inherit at the end of a part; elsewhere it is
        // an ordinary piece.
        let t = tags();
        let compiled = compile(&[("A/.../B", &[t.keyword.clone()])]);
        let rule = compiled.rule_for("B").unwrap();
        assert_eq!(
            rule.context(),
            Some(&["A".to_string(), "...".to_string()][..])
        );
        assert_eq!(rule.mode(), RuleMode::Normal);
    }

    #[test]
    fn test_wildcard_compiles_to_empty_piece() {
        let t = tags();
        let compiled = compile(&[("*/B", &[t.keyword.clone()])]);
        let rule = compiled.rule_for("B").unwrap();
        assert_eq!(rule.context(), Some(&[String::new()][..]));
    }

    #[test]
    fn test_inherit_mode() {
        let t = tags();
        let compiled = compile(&[("Italic/...", &[t.emphasis.clone()])]);
        let rule = compiled.rule_for("Italic").unwrap();
        assert_eq!(rule.mode(), RuleMode::Inherit);
        assert_eq!(rule.context(), None);
    }

    #[test]
    fn test_opaque_mode() {
        let t = tags();
        let compiled = compile(&[("Attribute!", &[t.meta.clone()])]);
        let rule = compiled.rule_for("Attribute").unwrap();
        assert_eq!(rule.mode(), RuleMode::Opaque);
    }

    #[test]
    fn test_opaque_with_context() {
        let t = tags();
        let compiled = compile(&[("Tag/Attribute!", &[t.meta.clone()])]);
        let rule = compiled.rule_for("Attribute").unwrap();
        assert_eq!(rule.mode(), RuleMode::Opaque);
        assert_eq!(rule.depth(), 1);
    }

    #[test]
    fn test_quoted_piece_allows_reserved_characters() {
        let t = tags();
        let compiled = compile(&[(r#""a/b""#, &[t.string.clone()])]);
        assert!(compiled.rule_for("a/b").is_some());

        let compiled = compile(&[(r#""...""#, &[t.string.clone()])]);
        assert!(compiled.rule_for("...").is_some());

        let compiled = compile(&[(r#""*""#, &[t.string.clone()])]);
        assert!(compiled.rule_for("*").is_some(), "a quoted star is a name, not a wildcard");
    }

    #[test]
    fn test_multiple_parts_in_one_selector() {
        let t = tags();
        let compiled = compile(&[("String Number", &[t.literal.clone()])]);
        assert!(compiled.rule_for("String").is_some());
        assert!(compiled.rule_for("Number").is_some());
    }

    #[test]
    fn test_chain_ordered_by_depth() {
        let t = tags();
        let compiled = compile(&[
            ("B", &[t.name.clone()]),
            ("X/A/B", &[t.keyword.clone()]),
            ("A/B", &[t.string.clone()]),
        ]);
        let rule = compiled.rule_for("B").unwrap();
        assert_eq!(chain_depths(rule), [2, 1, 0]);
    }

    #[test]
    fn test_equal_depth_later_rule_wins() {
        let t = tags();
        let compiled = compile(&[
            ("B", &[t.name.clone()]),
            ("B", &[t.keyword.clone()]),
        ]);
        let rule = compiled.rule_for("B").unwrap();
        assert_eq!(rule.tags(), &[t.keyword.clone()]);
        assert_eq!(rule.next().unwrap().tags(), &[t.name.clone()]);
    }

    #[test]
    fn test_invalid_selectors_rejected() {
        let t = tags();
        let bad = [
            "!", "*", "A/*", "A/", "/A", "A!B", r#""unterminated"#, "A//B",
        ];
        for selector in bad {
            let result = style_tags(&[(selector, &[t.name.clone()])]);
            assert!(
                matches!(result, Err(HighlightError::InvalidSelector(_))),
                "selector {selector:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_names_offending_part() {
        let t = tags();
        let err = style_tags(&[("Good bad!x", &[t.name.clone()])]).unwrap_err();
        assert_eq!(err.to_string(), "invalid selector path: bad!x");
    }

    #[test]
    fn test_matched_rule_prefers_deeper_context() {
        let t = tags();
        let compiled = compile(&[
            ("B", &[t.name.clone()]),
            ("A/B", &[t.keyword.clone()]),
        ]);
        let a = glint_tree::NodeType::new("A");
        let b = glint_tree::NodeType::new("B");
        let set = NodeSet::new(vec![a, b]).extend(&compiled);
        let b_ty = set.get("B").unwrap().clone();
        let a_ty = set.get("A").unwrap().clone();

        let tree = Tree::new(
            a_ty,
            vec![Tree::leaf(b_ty.clone(), 2)],
            vec![1],
            4,
        );
        let mut cursor = tree.cursor();
        cursor.first_child();
        let rule = matched_rule(&cursor).unwrap();
        assert_eq!(rule.tags(), &[t.keyword.clone()]);

        // The same node type outside the context falls back to the
        // shallower rule.
        let lone = Tree::leaf(b_ty, 2);
        let lone = Tree::new(glint_tree::NodeType::new("Other"), vec![lone], vec![0], 2);
        let mut cursor = lone.cursor();
        cursor.first_child();
        let rule = matched_rule(&cursor).unwrap();
        assert_eq!(rule.tags(), &[t.name.clone()]);
    }

    #[test]
    fn test_matched_rule_unknown_type() {
        let tree = Tree::leaf(glint_tree::NodeType::new("Unstyled"), 3);
        assert!(matched_rule(&tree.cursor()).is_none());
    }
}
