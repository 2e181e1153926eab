//! Output assembly and critical-CSS handoff.
//!
//! A compile pass pushes composed rules into a [`RuleBuffer`], which drops
//! exact duplicates. [`assemble`] then writes the layer with every
//! unconditional rule ahead of every media-wrapped one, so a breakpoint rule
//! always wins over the base rule it refines:
//!
//! ```text
//! @layer utilities {
//! .p-4 { padding: var(--spacing-4); }
//! .hover\:bg-primary:hover { background-color: var(--primary); }
//! @media (min-width: 768px) { .md\:p-4 { padding: var(--spacing-4); } }
//! }
//! ```

use std::collections::HashSet;

use crate::compose::ComposedRule;
use crate::error::UcssError;
use crate::parser::selectors::parse_selector_list;
use crate::parser::token::split_segments;
use crate::parser::{Statement, parse_escaped_ident, parse_statements, split_top_level, strip_comments};

#[derive(Debug, Clone, PartialEq, Eq)]
struct BufferedRule {
    text: String,
    conditional: bool,
}

/// Rendered rules of one compile pass, in emission order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct RuleBuffer {
    seen: HashSet<String>,
    rules: Vec<BufferedRule>,
}

impl RuleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders and stores `rule`. Returns `false` if identical text was
    /// already stored.
    pub fn push(&mut self, rule: &ComposedRule) -> bool {
        let text = rule.to_string();
        if !self.seen.insert(text.clone()) {
            return false;
        }
        self.rules.push(BufferedRule {
            text,
            conditional: rule.is_conditional(),
        });
        true
    }

    /// Rendered rules in emission order.
    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Writes the buffer as one named layer, unconditional rules first.
///
/// The partition is stable: within each group, emission order is kept.
///
/// # Example
///
/// ```
/// use ucss::assemble::{RuleBuffer, assemble};
/// use ucss::compose::compose;
/// use ucss::parser::{ClassToken, VariantTable};
/// use ucss::types::GeneratedUtility;
///
/// let table = VariantTable::new();
/// let flex = GeneratedUtility::new("flex", "display: flex;");
///
/// let mut buffer = RuleBuffer::new();
/// buffer.push(&compose(&ClassToken::parse("md:flex", &table), &flex));
/// buffer.push(&compose(&ClassToken::parse("flex", &table), &flex));
///
/// assert_eq!(
///     assemble(&buffer, "utilities"),
///     "@layer utilities {\n.flex { display: flex; }\n@media (min-width: 768px) { .md\\:flex { display: flex; } }\n}"
/// );
/// ```
pub fn assemble(buffer: &RuleBuffer, layer: &str) -> String {
    let (unconditional, conditional): (Vec<_>, Vec<_>) =
        buffer.rules.iter().partition(|rule| !rule.conditional);

    let mut css = format!("@layer {layer} {{\n");
    for rule in unconditional.into_iter().chain(conditional) {
        css.push_str(&rule.text);
        css.push('\n');
    }
    css.push('}');
    css
}

/// Collects the base classes styled by generated layer text.
///
/// Each rule contributes the subject classes of its selector, reduced to
/// their base: `.sm\:hover\:\!bg-primary:hover` yields `bg-primary`.
pub fn base_classes(css: &str) -> HashSet<String> {
    let mut classes = HashSet::new();
    match parse_statements(&strip_comments(css)) {
        Ok(statements) => collect_base_classes(&statements, &mut classes),
        Err(err) => log::debug!("base classes: unreadable layer text: {err}"),
    }
    classes
}

fn collect_base_classes(statements: &[Statement<'_>], classes: &mut HashSet<String>) {
    for statement in statements {
        let Statement::Block { prelude, body } = statement else {
            continue;
        };
        if is_grouping_rule(prelude) {
            if let Ok(inner) = parse_statements(body) {
                collect_base_classes(&inner, classes);
            }
            continue;
        }
        if prelude.starts_with('@') {
            continue;
        }
        for branch in split_top_level(prelude, ',') {
            let subjects = parse_selector_list(branch.trim())
                .and_then(|list| list.selectors.into_iter().next())
                .map(|complex| complex.subject_classes().0)
                .unwrap_or_else(|| selector_classes(branch));
            classes.extend(subjects.iter().map(|class| base_of(class).to_string()));
        }
    }
}

/// Removes from `critical` every rule that mentions a class whose base is in
/// `generated`, descending into `@media`, `@supports` and `@layer` blocks.
///
/// Text that cannot be read as a stylesheet is returned unchanged.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use ucss::assemble::filter_critical;
///
/// let generated: HashSet<String> = ["p-4".to_string()].into();
/// let critical = ".p-4 { padding: 1rem; }\n.m-2 { margin: 0.5rem; }";
///
/// assert_eq!(filter_critical(critical, &generated), ".m-2 { margin: 0.5rem; }");
/// ```
pub fn filter_critical(critical: &str, generated: &HashSet<String>) -> String {
    let clean = strip_comments(critical);
    match filter_statements(&clean, generated) {
        Ok(filtered) => filtered,
        Err(err) => {
            log::warn!("critical CSS left as is: {err}");
            critical.to_string()
        }
    }
}

fn filter_statements(input: &str, generated: &HashSet<String>) -> Result<String, UcssError> {
    let mut kept = Vec::new();

    for statement in parse_statements(input)? {
        match statement {
            Statement::AtStatement(text) => kept.push(format!("{text};")),
            Statement::Block { prelude, body } if is_grouping_rule(prelude) => {
                let inner = filter_statements(body, generated)?;
                if !inner.is_empty() {
                    kept.push(format!("{prelude} {{ {inner} }}"));
                }
            }
            Statement::Block { prelude, body } => {
                let covered = !prelude.starts_with('@')
                    && selector_classes(prelude)
                        .iter()
                        .any(|class| generated.contains(base_of(class)));
                if covered {
                    log::trace!("critical: dropping `{prelude}`");
                } else {
                    kept.push(format!("{prelude} {{{body}}}"));
                }
            }
        }
    }

    Ok(kept.join("\n"))
}

fn is_grouping_rule(prelude: &str) -> bool {
    ["@media", "@supports", "@layer"]
        .iter()
        .any(|at| prelude.starts_with(at))
}

/// Every class named anywhere in a selector, unescaped.
fn selector_classes(selector: &str) -> Vec<String> {
    let mut classes = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in selector.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' | '\'' => quote = Some(c),
            '.' => {
                if let Ok((_, class)) = parse_escaped_ident(&selector[i + 1..]) {
                    classes.push(class);
                }
            }
            _ => {}
        }
    }
    classes
}

/// `sm:hover:!bg-primary` → `bg-primary`. An opacity suffix is kept.
fn base_of(class: &str) -> &str {
    let base = split_segments(class).pop().unwrap_or(class);
    base.strip_prefix('!').unwrap_or(base)
}
