//! Utility token decomposition.
//!
//! A token is a colon-separated chain read from the end:
//!
//! ```text
//! sm:hover:!bg-primary
//! ^^ ^^^^^ ^^^^^^^^^^^
//! |  |     base class, `!` marks it important
//! variants, applied left to right
//! ```
//!
//! Colons inside `[...]` or `(...)` do not split, so arbitrary variants such as
//! `[&:hover_figure]` stay one segment. Inside an arbitrary variant `_` stands
//! for a space (`\_` for a literal underscore) and `&` for the element itself.

use crate::parser::variants::{Variant, VariantTable};

/// One observed utility token, decomposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassToken {
    /// The token exactly as observed; the generated selector escapes this.
    pub raw: String,
    pub base_class: String,
    pub variants: Vec<Variant>,
    pub important: bool,
    /// Variant segments that did not resolve and were dropped.
    pub ignored: Vec<String>,
}

impl ClassToken {
    /// Parses a raw token. Never fails: unresolved variant segments are
    /// dropped and listed in [`ClassToken::ignored`].
    pub fn parse(raw: &str, table: &VariantTable) -> Self {
        let mut segments = split_segments(raw);
        let base = segments.pop().unwrap_or_default();

        let (important, base_class) = match base.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, base),
        };

        let mut variants = Vec::with_capacity(segments.len());
        let mut ignored = Vec::new();
        for segment in segments {
            match resolve_segment(segment, table) {
                Some(variant) => variants.push(variant),
                None => {
                    log::trace!("token `{raw}`: ignoring variant segment `{segment}`");
                    ignored.push(segment.to_string());
                }
            }
        }

        Self {
            raw: raw.to_string(),
            base_class: base_class.to_string(),
            variants,
            important,
            ignored,
        }
    }

    /// No variants and not important: the bare utility.
    pub fn is_plain(&self) -> bool {
        self.variants.is_empty() && !self.important
    }

    /// Every written variant segment resolved.
    pub fn is_complete(&self) -> bool {
        self.ignored.is_empty()
    }
}

/// Splits a token on `:` outside brackets and parentheses.
pub(crate) fn split_segments(token: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in token.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                segments.push(&token[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&token[start..]);
    segments
}

fn resolve_segment(segment: &str, table: &VariantTable) -> Option<Variant> {
    if segment.is_empty() {
        return None;
    }
    match segment
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(inner) => decode_arbitrary(inner).map(Variant::arbitrary),
        None => table.resolve(segment),
    }
}

/// Decodes the body of an arbitrary variant, rejecting anything that could
/// break out of the selector.
fn decode_arbitrary(inner: &str) -> Option<String> {
    if inner.trim().is_empty() || inner.contains(['{', '}', ';']) {
        return None;
    }

    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('_') => decoded.push('_'),
                Some(other) => {
                    decoded.push('\\');
                    decoded.push(other);
                }
                None => decoded.push('\\'),
            },
            '_' => decoded.push(' '),
            _ => decoded.push(c),
        }
    }
    Some(decoded)
}
