//! Theme variable extraction.
//!
//! Theme variables are ordinary CSS custom properties declared anywhere in the
//! theme stylesheet (usually under `:root` or `@theme`):
//!
//! ```css
//! :root {
//!     --primary: #336699;
//!     --spacing-4: 1rem;
//!     --breakpoint-sm: 40rem;
//! }
//! ```
//!
//! ## Processing Steps
//!
//! 1. Block comments (`/* */`) are stripped
//! 2. Every `--name: value` that starts a declaration is read in document order
//! 3. Names outside the recognized [`ThemeNamespace`]s are discarded
//! 4. A later declaration of the same name overwrites the earlier one

use crate::parser::strip_comments;
use crate::types::theme::{ThemeNamespace, ThemeVariable, ThemeVariables};
use nom::{
    IResult,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    sequence::{preceded, tuple},
};

/// Extracts recognized theme variables from raw stylesheet text.
///
/// # Example
///
/// ```rust
/// use ucss::parser::extract_variables;
///
/// let vars = extract_variables(":root { --primary: #336699; --unrelated: 1; --primary: red; }");
/// assert_eq!(vars.get("--primary"), Some("red"));
/// assert_eq!(vars.get("--unrelated"), None);
/// ```
pub fn extract_variables(source: &str) -> ThemeVariables {
    let clean = strip_comments(source);
    declarations(&clean)
        .into_iter()
        .filter(|var| ThemeNamespace::classify(&var.name).is_some())
        .collect()
}

/// Reads every custom property that starts a declaration, in document order.
fn declarations(source: &str) -> Vec<ThemeVariable> {
    let mut found = Vec::new();
    let mut rest = source;
    let mut at_declaration_start = true;

    while let Some(c) = rest.chars().next() {
        if at_declaration_start && rest.starts_with("--") {
            if let Ok((after, (name, value))) = parse_custom_property(rest) {
                found.push(ThemeVariable {
                    name: format!("--{name}"),
                    value: value.to_string(),
                });
                rest = after;
                at_declaration_start = false;
                continue;
            }
        }

        match c {
            '{' | ';' | '}' => at_declaration_start = true,
            c if c.is_whitespace() => {}
            _ => at_declaration_start = false,
        }
        rest = &rest[c.len_utf8()..];
    }

    found
}

/// Parses `--name: value` and returns the name (without dashes) and trimmed value.
fn parse_custom_property(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, name) = preceded(
        tag("--"),
        take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_' || c == '.'),
    )(input)?;
    let (input, _) = tuple((multispace0, char(':')))(input)?;
    let (input, value) = take_value(input)?;
    Ok((input, (name, value.trim())))
}

/// Takes a declaration value up to the terminating `;` or `}` at depth 0.
fn take_value(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
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
            ';' | '}' if depth == 0 => return Ok((&input[i..], &input[..i])),
            _ => {}
        }
    }
    Ok(("", input))
}
