//! Text emission: turning styled ranges into line-aware output.
//!
//! [`highlight_code`] wraps the tree walker for callers that want text
//! rather than offsets. It emits every byte of the requested window
//! exactly once, in order: styled ranges with their class string,
//! everything in between with an empty class, and each newline as a
//! [`put_break`](highlight_code) call instead of text.

use crate::highlighter::Highlighter;
use crate::walk::highlight_tree;
use glint_tree::Tree;

/// Emits `code[from..to]` as a stream of `put_text(text, classes)` and
/// `put_break()` calls.
///
/// Unstyled stretches are emitted with an empty class string. Newlines are
/// never included in text: each `\n` becomes exactly one `put_break()`
/// splitting the surrounding text.
pub fn highlight_code(
    code: &str,
    tree: &Tree,
    highlighters: &[&Highlighter],
    from: usize,
    to: usize,
    mut put_text: impl FnMut(&str, &str),
    mut put_break: impl FnMut(),
) {
    let mut pos = from;
    highlight_tree(tree, highlighters, from, to, |span_from, span_to, classes| {
        write_to(code, &mut pos, span_from, "", &mut put_text, &mut put_break);
        write_to(code, &mut pos, span_to, classes, &mut put_text, &mut put_break);
    });
    write_to(code, &mut pos, to, "", &mut put_text, &mut put_break);
}

/// Advances the emission position to `target`, splitting on newlines.
fn write_to(
    code: &str,
    pos: &mut usize,
    target: usize,
    classes: &str,
    put_text: &mut impl FnMut(&str, &str),
    put_break: &mut impl FnMut(),
) {
    if target <= *pos {
        return;
    }
    let mut text = &code[*pos..target];
    while let Some(brk) = text.find('\n') {
        if brk > 0 {
            put_text(&text[..brk], classes);
        }
        put_break();
        text = &text[brk + 1..];
    }
    if !text.is_empty() {
        put_text(text, classes);
    }
    *pos = target;
}
