//! Custom utility extraction.
//!
//! Besides variable-driven utilities, a theme may hand-author utilities. The
//! accepted syntax is deliberately small:
//!
//! ```css
//! @utility truncate { overflow: hidden; text-overflow: ellipsis; }
//!
//! .card { padding: 1rem; }
//! .dark .card { background: black; }
//! :where(.card, .panel) { border-radius: 0.5rem; }
//!
//! @layer components {
//!     .prose { color: var(--foreground); & h1 { font-size: 2rem; } }
//! }
//! ```
//!
//! - `@utility <name>` defines `.name`
//! - Class rules are split at top-level commas; every selector becomes its own
//!   entry keyed by the class it styles (see [`ComplexSelector::subject_classes`])
//! - `@layer` blocks are descended into
//! - `:root`, `@theme`, element rules and every other at-rule are skipped
//!
//! [`ComplexSelector::subject_classes`]: crate::parser::ComplexSelector::subject_classes

use crate::error::UcssError;
use crate::parser::selectors::parse_selector_list;
use crate::parser::{
    find_block_end, normalize_whitespace, split_top_level, strip_comments, take_prelude,
};
use crate::types::{CustomUtilities, GeneratedUtility};
use nom::{
    IResult,
    character::complete::{char, multispace0},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::preceded,
};

/// One top-level item of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// `prelude { body }`; `body` excludes the outer braces.
    Block { prelude: &'a str, body: &'a str },
    /// A body-less at-rule such as `@import "x.css";`.
    AtStatement(&'a str),
}

/// Extracts hand-authored utilities from a theme stylesheet.
///
/// # Example
///
/// ```rust
/// use ucss::parser::extract_custom_utilities;
///
/// let custom = extract_custom_utilities(":where(.card, .panel) { padding: 1rem; }").unwrap();
/// let card = &custom.get("card")[0];
/// assert_eq!(card.body, "padding: 1rem;");
/// assert!(card.selector_override.as_ref().unwrap().grouped);
/// assert!(custom.contains("panel"));
/// ```
pub fn extract_custom_utilities(source: &str) -> Result<CustomUtilities, UcssError> {
    let clean = strip_comments(source);
    let statements = parse_statements(&clean)?;

    let mut utilities = CustomUtilities::new();
    collect_utilities(&statements, &mut utilities)?;
    Ok(utilities)
}

/// Splits stylesheet text into top-level statements.
pub fn parse_statements(input: &str) -> Result<Vec<Statement<'_>>, UcssError> {
    let (remaining, statements) = many0(preceded(multispace0, parse_statement))(input)
        .map_err(|e| match e {
            nom::Err::Failure(err) => UcssError::UnbalancedBlock(snippet(err.input)),
            other => UcssError::InvalidSyntax(other.to_string()),
        })?;

    if !remaining.trim().is_empty() {
        return Err(UcssError::InvalidSyntax(format!(
            "Unexpected tokens at end of stylesheet: {}",
            snippet(remaining.trim())
        )));
    }
    Ok(statements)
}

fn parse_statement(input: &str) -> IResult<&str, Statement<'_>> {
    let start = input;
    let (input, prelude) = take_prelude(input)?;

    if let Ok((rest, _)) = char::<&str, Error<&str>>(';')(input) {
        return Ok((rest, Statement::AtStatement(prelude.trim())));
    }
    if !input.starts_with('{') {
        return Err(nom::Err::Error(Error::new(start, ErrorKind::Char)));
    }

    let end =
        find_block_end(input).ok_or(nom::Err::Failure(Error::new(start, ErrorKind::TakeUntil)))?;
    Ok((
        &input[end + 1..],
        Statement::Block {
            prelude: prelude.trim(),
            body: &input[1..end],
        },
    ))
}

fn collect_utilities(
    statements: &[Statement<'_>],
    utilities: &mut CustomUtilities,
) -> Result<(), UcssError> {
    for statement in statements {
        let Statement::Block { prelude, body } = statement else {
            continue;
        };

        if let Some(name) = prelude.strip_prefix("@utility") {
            let name = name.trim();
            if !name.is_empty() {
                utilities.insert(GeneratedUtility::new(name, normalize_whitespace(body)));
            }
        } else if prelude.starts_with("@layer") {
            collect_utilities(&parse_statements(body)?, utilities)?;
        } else if !prelude.starts_with('@') {
            collect_class_rule(prelude, body, utilities);
        }
    }
    Ok(())
}

fn collect_class_rule(prelude: &str, body: &str, utilities: &mut CustomUtilities) {
    let body = normalize_whitespace(body);
    if body.is_empty() {
        return;
    }

    for branch in split_top_level(prelude, ',') {
        let selector = normalize_whitespace(branch);
        let Some(list) = parse_selector_list(&selector) else {
            log::trace!("custom utility: skipping unsupported selector `{selector}`");
            continue;
        };
        let Some(complex) = list.selectors.first() else {
            continue;
        };

        let (classes, grouped) = complex.subject_classes();
        for class in classes {
            let utility = GeneratedUtility::new(class.as_str(), body.as_str());
            let utility = if selector == format!(".{}", crate::compose::escape_class(&class)) {
                utility
            } else {
                utility.with_selector(selector.as_str(), grouped)
            };
            utilities.insert(utility);
        }
    }
}

fn snippet(input: &str) -> String {
    input.chars().take(40).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_class_rule_has_no_override() {
        let custom = extract_custom_utilities(".flex { display: flex; }").unwrap();
        let flex = &custom.get("flex")[0];
        assert_eq!(flex.body, "display: flex;");
        assert_eq!(flex.selector_override, None);
        assert!(!flex.full_block);
    }

    #[test]
    fn contextual_selectors_key_by_subject() {
        let custom = extract_custom_utilities(
            ".card { padding: 1rem; }\n.dark .card { background: black; }",
        )
        .unwrap();
        let entries = custom.get("card");
        assert_eq!(entries.len(), 2);
        let context = entries[1].selector_override.as_ref().unwrap();
        assert_eq!(context.selector, ".dark .card");
        assert!(!context.grouped);
        assert!(!custom.contains("dark"));
    }

    #[test]
    fn comma_lists_become_separate_entries() {
        let custom = extract_custom_utilities(".a, .b { color: red; }").unwrap();
        assert_eq!(custom.get("a")[0].selector_override, None);
        assert_eq!(custom.get("b")[0].selector_override, None);
    }

    #[test]
    fn utility_at_rule_and_layers() {
        let custom = extract_custom_utilities(
            "@import \"base.css\";\n@layer components { @utility truncate { overflow: hidden; } }",
        )
        .unwrap();
        assert_eq!(custom.get("truncate")[0].body, "overflow: hidden;");
    }

    #[test]
    fn nested_bodies_are_full_blocks() {
        let custom = extract_custom_utilities(
            ".prose {\n  color: black;\n  & h1 { font-size: 2rem; }\n}",
        )
        .unwrap();
        let prose = &custom.get("prose")[0];
        assert!(prose.full_block);
        assert_eq!(prose.body, "color: black; & h1 { font-size: 2rem; }");
    }

    #[test]
    fn root_theme_and_media_blocks_are_skipped() {
        let custom = extract_custom_utilities(
            ":root { --primary: red; }\n@theme { --spacing-1: 4px; }\nbody { margin: 0; }\n@media print { .x { color: red; } }",
        )
        .unwrap();
        assert!(custom.is_empty());
    }

    #[test]
    fn quoted_braces_in_preludes_stay_in_the_statement() {
        let statements =
            parse_statements("a[title=\"}\"] { color: blue; }\n.flex { display: flex; }").unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[0],
            Statement::Block {
                prelude: "a[title=\"}\"]",
                body: " color: blue; ",
            }
        );

        let custom = extract_custom_utilities("a[title='{'] { color: blue; }\n.flex { display: flex; }")
            .unwrap();
        assert_eq!(custom.get("flex")[0].body, "display: flex;");
    }

    #[test]
    fn unbalanced_block_is_an_error() {
        let err = extract_custom_utilities(".card { padding: 1rem;").unwrap_err();
        assert!(matches!(err, UcssError::UnbalancedBlock(_)));
        let err = extract_custom_utilities(".card { padding: 1rem; } }").unwrap_err();
        assert!(matches!(err, UcssError::InvalidSyntax(_)));
    }
}
