//! Theme stylesheet and utility token parsing.
//!
//! This module provides everything that reads text:
//!
//! - [`extract_variables`]: Theme custom properties (`--primary: #336699;`)
//! - [`extract_custom_utilities`]: Hand-authored utility rules
//! - [`ClassToken`]: One observed utility token split into base, variants, `!`
//! - [`VariantTable`]: Variant name to selector lookup
//! - Selector types: [`Selector`], [`CompoundSelector`], [`ComplexSelector`]
//!
//! ## Submodules
//!
//! - [`custom`]: Custom utility extraction (`@utility`, class rules, `@layer`)
//! - [`selectors`]: Selector parsing (type, class, ID, combinators, `:where()`)
//! - [`stylesheet`]: Selector data structures and subject-class lookup
//! - [`token`]: Utility token decomposition
//! - [`variables`]: Theme variable extraction
//! - [`variants`]: The variant table
//!
//! ## Example
//!
//! ```rust
//! use ucss::parser::{ClassToken, VariantTable};
//!
//! let table = VariantTable::new();
//! let token = ClassToken::parse("sm:hover:!bg-primary", &table);
//!
//! assert_eq!(token.base_class, "bg-primary");
//! assert!(token.important);
//! assert_eq!(token.variants.len(), 2);
//! ```

pub mod custom;
pub mod selectors;
pub mod stylesheet;
pub mod token;
pub mod variables;
pub mod variants;

pub use crate::parser::custom::{Statement, extract_custom_utilities, parse_statements};
pub use crate::parser::stylesheet::{
    Combinator, ComplexSelector, CompoundSelector, Selector, SelectorList, SelectorPart,
};
pub use crate::parser::token::ClassToken;
pub use crate::parser::variables::extract_variables;
pub use crate::parser::variants::{Variant, VariantKind, VariantTable};

use nom::{
    IResult,
    bytes::complete::take_while1,
    error::{Error, ErrorKind},
};

/// Parses a plain CSS identifier (alphanumeric characters, dashes, and underscores).
///
/// Used for property names, pseudo-class names and type selectors.
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parses a CSS identifier that may contain backslash escapes (`hover\:flex`).
///
/// Returns the unescaped name, so `.sm\:flex` yields `sm:flex`. Hex escapes
/// (`\32 xl`) are decoded, consuming one optional trailing space.
pub fn parse_escaped_ident(input: &str) -> IResult<&str, String> {
    let mut out = String::new();
    let mut chars = input.char_indices().peekable();
    let mut end = 0;

    while let Some(&(i, c)) = chars.peek() {
        if c == '\\' {
            chars.next();
            let mut hex = String::new();
            while let Some(&(_, h)) = chars.peek() {
                if h.is_ascii_hexdigit() && hex.len() < 6 {
                    hex.push(h);
                    chars.next();
                } else {
                    break;
                }
            }
            if !hex.is_empty() {
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                out.push(decoded);
                if let Some(&(_, ' ')) = chars.peek() {
                    chars.next();
                }
            } else if let Some((_, escaped)) = chars.next() {
                out.push(escaped);
            } else {
                break;
            }
            end = chars.peek().map(|&(j, _)| j).unwrap_or(input.len());
        } else if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
            chars.next();
            end = i + c.len_utf8();
        } else {
            break;
        }
    }

    if out.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::AlphaNumeric)));
    }
    Ok((&input[end..], out))
}

/// Removes `/* ... */` block comments, leaving string literals untouched.
pub fn strip_comments(source: &str) -> String {
    let mut clean = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            clean.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    clean.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
            clean.push(c);
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(inner) = chars.next() {
                if inner == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
            continue;
        }
        clean.push(c);
    }
    clean
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits `input` on `separator`, ignoring separators nested in `()` or `[]`
/// and inside quoted strings.
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Takes a statement prelude: everything before the first `{`, `;` or `}`
/// that is neither quoted nor escaped.
///
/// Fails on empty input or when the prelude would be empty.
pub(crate) fn take_prelude(input: &str) -> IResult<&str, &str> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut end = input.len();

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' | ';' | '}' => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    if end == 0 {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeTill1)));
    }
    Ok((&input[end..], &input[..end]))
}

/// Finds the byte offset of the `}` matching the `{` at the start of `input`.
///
/// Quoted strings are skipped. Returns `None` when the block never closes.
pub(crate) fn find_block_end(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_skips_quoted_and_escaped_delimiters() {
        let (rest, prelude) = take_prelude(r#"a[title="}"] { color: blue; }"#).unwrap();
        assert_eq!(prelude, r#"a[title="}"] "#);
        assert_eq!(rest, "{ color: blue; }");

        let (rest, prelude) = take_prelude(r".w-\{ { }").unwrap();
        assert_eq!(prelude, r".w-\{ ");
        assert_eq!(rest, "{ }");

        assert!(take_prelude("{ }").is_err());
        assert!(take_prelude("").is_err());
    }

    #[test]
    fn strip_comments_keeps_strings() {
        let css = r#"a { content: "/* not a comment */"; } /* gone */ b {}"#;
        let clean = strip_comments(css);
        assert!(clean.contains("/* not a comment */"));
        assert!(!clean.contains("gone"));
    }

    #[test]
    fn escaped_ident_decodes_backslashes() {
        let (rest, name) = parse_escaped_ident(r"sm\:hover\:flex { }").unwrap();
        assert_eq!(name, "sm:hover:flex");
        assert_eq!(rest, " { }");
    }

    #[test]
    fn escaped_ident_decodes_hex() {
        let (_, name) = parse_escaped_ident(r"\32 xl\:flex").unwrap();
        assert_eq!(name, "2xl:flex");
    }

    #[test]
    fn split_top_level_respects_parens() {
        let parts = split_top_level(":where(.a, .b), .c", ',');
        assert_eq!(parts, vec![":where(.a, .b)", " .c"]);
    }

    #[test]
    fn block_end_skips_nested_and_strings() {
        let input = r#"{ a { b: "}" } }tail"#;
        let end = find_block_end(input).unwrap();
        assert_eq!(&input[end + 1..], "tail");
        assert_eq!(find_block_end("{ open"), None);
    }
}
