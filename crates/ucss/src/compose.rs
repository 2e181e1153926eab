//! Rule composition: one token + one utility body → one rendered rule.
//!
//! Variants are applied left to right to a selector that starts as the
//! escaped token class:
//!
//! ```text
//! dark:hover:sm:bg-primary
//!
//! .dark\:hover\:sm\:bg-primary        start
//! + nested  ".dark &"                 kept aside as a nested block
//! + pseudo  ":hover"                  appended
//! + media   "@media (min-width: 640px)" wraps the finished rule
//!
//! @media (min-width: 640px) { .dark\:hover\:sm\:bg-primary:hover { .dark & { background-color: var(--primary); } } }
//! ```
//!
//! Rendered rules are always a single line so the assembler can order them
//! line by line.

use std::fmt;

use crate::parser::{ClassToken, VariantKind};
use crate::types::GeneratedUtility;

/// A fully composed rule, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRule {
    pub selector: String,
    /// Nested block selectors, outermost first.
    pub nested: Vec<String>,
    /// The at-rule wrapping the whole rule, if any.
    pub media: Option<String>,
    pub body: String,
}

impl ComposedRule {
    pub fn is_conditional(&self) -> bool {
        self.media.is_some()
    }
}

impl fmt::Display for ComposedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(media) = &self.media {
            write!(f, "{media} {{ ")?;
        }
        write!(f, "{} {{ ", self.selector)?;
        for nested in &self.nested {
            write!(f, "{nested} {{ ")?;
        }
        f.write_str(&self.body)?;
        for _ in &self.nested {
            f.write_str(" }")?;
        }
        f.write_str(" }")?;
        if self.media.is_some() {
            f.write_str(" }")?;
        }
        Ok(())
    }
}

/// Composes the rule for `token` styled by `utility`.
pub fn compose(token: &ClassToken, utility: &GeneratedUtility) -> ComposedRule {
    let body = if token.important {
        add_important(&utility.body)
    } else {
        utility.body.clone()
    };
    let token_selector = format!(".{}", escape_class(&token.raw));

    let (selector, tail) = match &utility.selector_override {
        None => (token_selector, String::new()),
        Some(info) if token.is_plain() => {
            return ComposedRule {
                selector: info.selector.clone(),
                nested: Vec::new(),
                media: None,
                body,
            };
        }
        // Decorating one branch of a `:where()` group must not touch the others
        Some(info) if info.grouped => (token_selector, String::new()),
        Some(info) => {
            let (replaced, subject_end) =
                replace_class(&info.selector, &utility.class_name, &token_selector);
            let (head, tail) = replaced.split_at(subject_end.unwrap_or(replaced.len()));
            (head.to_string(), tail.to_string())
        }
    };

    apply_variants(token, selector, tail, body)
}

/// Applies `token`'s variants. Pseudo-classes attach to the end of `selector`,
/// which holds the token's class; `tail` is the rest of a contextual selector
/// after that class (`.dark .card > *` splits as `.dark .card` + ` > *`).
fn apply_variants(
    token: &ClassToken,
    mut selector: String,
    mut tail: String,
    body: String,
) -> ComposedRule {
    let mut nested = Vec::new();
    let mut media = None;

    for variant in &token.variants {
        match variant.kind {
            VariantKind::Pseudo => selector.push_str(&variant.selector),
            VariantKind::Flat => {
                selector.push_str(&tail);
                tail.clear();
                selector = variant.selector.replace('&', &selector);
            }
            VariantKind::Nested => nested.push(variant.selector.trim().to_string()),
            VariantKind::Media => {
                if let Some(previous) = media.replace(variant.selector.clone()) {
                    log::debug!(
                        "token `{}`: media variant `{previous}` replaced by `{}`",
                        token.raw,
                        variant.selector
                    );
                }
            }
        }
    }
    selector.push_str(&tail);

    ComposedRule {
        selector,
        nested,
        media,
        body,
    }
}

/// Escapes a class name for use after `.` in a selector.
///
/// Every character outside `[a-zA-Z0-9-]` gets a backslash; a leading digit
/// is written as a hex escape.
///
/// # Example
///
/// ```
/// use ucss::compose::escape_class;
///
/// assert_eq!(escape_class("hover:bg-primary"), r"hover\:bg-primary");
/// assert_eq!(escape_class("!text-error"), r"\!text-error");
/// assert_eq!(escape_class("2xl:flex"), r"\32 xl\:flex");
/// ```
pub fn escape_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 8);
    for (i, c) in class.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Appends ` !important` to every declaration that lacks it, at any depth.
///
/// Every declaration comes out terminated by `;`, including a last one that
/// was written without it. Selectors of nested blocks (text ending in `{`)
/// are left alone.
pub fn add_important(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 16);
    let mut segment = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in body.chars() {
        if let Some(q) = quote {
            segment.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                segment.push(c);
            }
            '(' => {
                depth += 1;
                segment.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                segment.push(c);
            }
            ';' if depth == 0 => {
                push_declaration(&mut out, &segment, true);
                out.push(';');
                segment.clear();
            }
            '}' if depth == 0 => {
                push_declaration(&mut out, &segment, false);
                out.push('}');
                segment.clear();
            }
            '{' if depth == 0 => {
                out.push_str(&segment);
                out.push('{');
                segment.clear();
            }
            _ => segment.push(c),
        }
    }
    push_declaration(&mut out, &segment, false);
    out
}

/// `terminated` is false when no `;` follows the declaration in the source.
fn push_declaration(out: &mut String, declaration: &str, terminated: bool) {
    let trimmed = declaration.trim_end();
    if trimmed.trim().is_empty() || !trimmed.contains(':') {
        out.push_str(declaration);
        return;
    }
    out.push_str(trimmed);
    if !trimmed.contains("!important") {
        out.push_str(" !important");
    }
    if !terminated {
        out.push(';');
    }
    out.push_str(&declaration[trimmed.len()..]);
}

/// Replaces the class `name` in `selector` with `replacement`, matching whole
/// class names only (`.card` does not match `.card-body`).
///
/// Also returns the byte offset just past the last replacement.
fn replace_class(selector: &str, name: &str, replacement: &str) -> (String, Option<usize>) {
    let needle = format!(".{}", escape_class(name));
    let mut out = String::with_capacity(selector.len() + replacement.len());
    let mut rest = selector;
    let mut subject_end = None;

    while let Some(pos) = rest.find(&needle) {
        let after = &rest[pos + needle.len()..];
        let boundary = after
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '\\'));
        out.push_str(&rest[..pos]);
        if boundary {
            out.push_str(replacement);
            subject_end = Some(out.len());
        } else {
            out.push_str(&needle);
        }
        rest = after;
    }
    out.push_str(rest);
    (out, subject_end)
}
