//! The tree walker: turning a styled tree into a span stream.
//!
//! [`highlight_tree`] recurses over a cursor, resolves a rule per node,
//! composes the active highlighters into a class string, and feeds a
//! [`SpanBuilder`] that coalesces adjacent equal-class ranges before
//! emitting. Emission order is strictly left to right and only non-empty
//! class strings are reported.
//!
//! Inherited classes flow down to descendants for inherit-mode rules,
//! opaque rules cut recursion off, and mounted sub-trees are traversed
//! with their own scope-filtered highlighter set: an overlay mount
//! interleaves inner-tree slices with host children, a full mount replaces
//! the host's children and drops inherited classes at the boundary.

use crate::highlighter::{compose_style, Highlighter};
use crate::selector::{matched_rule, RuleMode};
use glint_tree::{Tree, TreeCursor};
use tracing::trace;

/// Highlights `tree` over `[from, to)`.
///
/// `emit` receives half-open, strictly increasing, non-overlapping ranges
/// with non-empty class strings; adjacent ranges with the same classes are
/// merged before emission.
pub fn highlight_tree(
    tree: &Tree,
    highlighters: &[&Highlighter],
    from: usize,
    to: usize,
    mut emit: impl FnMut(usize, usize, &str),
) {
    trace!(from, to, "highlight pass");
    let mut builder = SpanBuilder {
        at: from,
        class: String::new(),
        emit: &mut emit,
    };
    let mut cursor = tree.cursor();
    highlight_range(&mut builder, highlighters, &mut cursor, 0, from, to, "", highlighters);
    builder.flush(to);
}

/// Accumulates the currently open span and coalesces equal-class runs.
struct SpanBuilder<'e> {
    at: usize,
    class: String,
    emit: &'e mut dyn FnMut(usize, usize, &str),
}

impl SpanBuilder<'_> {
    /// Closes the open span at `at` and opens a new one with `class`,
    /// unless the class is unchanged (which extends the open span).
    fn start_span(&mut self, at: usize, class: &str) {
        if class != self.class {
            self.flush(at);
            if at > self.at {
                self.at = at;
            }
            self.class.clear();
            self.class.push_str(class);
        }
    }

    /// Emits the open span up to `to`, if it is non-empty and styled. The
    /// position only ever moves forward, in `start_span`.
    fn flush(&mut self, to: usize) {
        if to > self.at && !self.class.is_empty() {
            (self.emit)(self.at, to, &self.class);
        }
    }
}

fn highlight_range<'h>(
    builder: &mut SpanBuilder<'_>,
    all: &[&'h Highlighter],
    cursor: &mut TreeCursor<'_>,
    base: usize,
    from: usize,
    to: usize,
    inherited: &str,
    active: &[&'h Highlighter],
) {
    let start = base + cursor.from();
    let end = base + cursor.to();
    if start >= to || end <= from {
        return;
    }

    let node_type = cursor.node_type();
    let scoped: Vec<&'h Highlighter>;
    let active: &[&'h Highlighter] = if node_type.is_top() {
        scoped = all
            .iter()
            .copied()
            .filter(|h| h.scope_accepts(node_type))
            .collect();
        &scoped
    } else {
        active
    };

    let mut cls = inherited.to_string();
    let mut inherited = inherited.to_string();
    let mut opaque = false;
    if let Some(rule) = matched_rule(cursor) {
        let tag_cls = compose_style(active, rule.tags());
        if !tag_cls.is_empty() {
            if !cls.is_empty() {
                cls.push(' ');
            }
            cls.push_str(&tag_cls);
            if rule.mode() == RuleMode::Inherit {
                if !inherited.is_empty() {
                    inherited.push(' ');
                }
                inherited.push_str(&tag_cls);
            }
        }
        opaque = rule.mode() == RuleMode::Opaque;
    }

    builder.start_span(from.max(start), &cls);
    if opaque {
        return;
    }

    let mounted = cursor.tree().mounted();
    match mounted.and_then(|m| m.overlay().map(|ranges| (m, ranges))) {
        Some((mount, ranges)) => {
            // Inner slices get their own scope filtering and never inherit
            // host classes; host children fill the gaps between slices.
            let inner_active: Vec<&'h Highlighter> = all
                .iter()
                .copied()
                .filter(|h| h.scope_accepts(mount.tree().node_type()))
                .collect();
            let has_child = cursor.first_child();
            let mut pos = start;
            let mut i = 0;
            loop {
                let next = ranges.get(i);
                let next_pos = next.map_or(end, |r| start + r.from);
                let gap_from = from.max(pos);
                let gap_to = to.min(next_pos);
                if gap_from < gap_to && has_child {
                    loop {
                        if base + cursor.from() >= gap_to {
                            break;
                        }
                        highlight_range(builder, all, cursor, base, gap_from, gap_to, &inherited, active);
                        builder.start_span(gap_to.min(base + cursor.to()), &cls);
                        if base + cursor.to() >= next_pos || !cursor.next_sibling() {
                            break;
                        }
                    }
                }
                let Some(next) = next else { break };
                if start + next.from > to {
                    break;
                }
                pos = start + next.to;
                if pos > from {
                    let mut inner = mount.tree().cursor();
                    highlight_range(
                        builder,
                        all,
                        &mut inner,
                        start,
                        from.max(start + next.from),
                        to.min(pos),
                        "",
                        &inner_active,
                    );
                    builder.start_span(to.min(pos), &cls);
                }
                i += 1;
            }
            if has_child {
                cursor.parent();
            }
        }
        None => {
            if cursor.first_child() {
                // A full mount swaps in another language's tree; inherited
                // classes stop at that boundary.
                let inherited = if mounted.is_some() {
                    String::new()
                } else {
                    inherited
                };
                loop {
                    let child_to = base + cursor.to();
                    if child_to <= from {
                        if !cursor.next_sibling() {
                            break;
                        }
                        continue;
                    }
                    if base + cursor.from() >= to {
                        break;
                    }
                    highlight_range(builder, all, cursor, base, from, to, &inherited, active);
                    builder.start_span(to.min(child_to), &cls);
                    if !cursor.next_sibling() {
                        break;
                    }
                }
                cursor.parent();
            }
        }
    }
}
