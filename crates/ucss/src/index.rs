//! Everything derived from one theme stylesheet, and generation against it.

use std::collections::BTreeSet;

use crate::assemble::{RuleBuffer, assemble};
use crate::compose::compose;
use crate::error::UcssError;
use crate::generate::{ColorUtilities, UtilityTable};
use crate::parser::{ClassToken, VariantTable, extract_custom_utilities, extract_variables};
use crate::types::{CustomUtilities, ThemeVariables};

/// The parsed form of a theme: variables, both utility sources and the
/// variant table its breakpoints shape.
#[derive(Debug, Clone)]
pub struct ThemeIndex {
    pub variables: ThemeVariables,
    pub utilities: UtilityTable,
    pub custom: CustomUtilities,
    pub variants: VariantTable,
}

/// What one generation pass did with its tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Rules added to the buffer.
    pub emitted: usize,
    /// Rules dropped because identical text was already buffered.
    pub duplicates: usize,
    /// Tokens whose base class matched no utility.
    pub unresolved: Vec<String>,
    /// Tokens skipped because a variant segment did not resolve.
    pub partial: Vec<String>,
}

impl ThemeIndex {
    /// Parses a theme stylesheet.
    ///
    /// # Errors
    ///
    /// Fails when the custom utility rules are malformed; variables alone
    /// never fail to extract.
    pub fn build(source: &str, colors: ColorUtilities) -> Result<Self, UcssError> {
        let variables = extract_variables(source);
        let custom = extract_custom_utilities(source)?;
        Ok(Self::with_custom(variables, custom, colors))
    }

    /// Builds the index from already-extracted parts.
    pub fn with_custom(
        variables: ThemeVariables,
        custom: CustomUtilities,
        colors: ColorUtilities,
    ) -> Self {
        let utilities = UtilityTable::build(&variables, colors);
        let variants = VariantTable::from_variables(&variables);
        log::debug!(
            "theme index: {} variables, {} generated utilities, {} custom classes",
            variables.len(),
            utilities.len(),
            custom.len()
        );
        Self {
            variables,
            utilities,
            custom,
            variants,
        }
    }

    pub fn parse_token(&self, raw: &str) -> ClassToken {
        ClassToken::parse(raw, &self.variants)
    }

    /// Generates rules for `tokens` into `buffer`.
    ///
    /// Variable-driven utilities are emitted for every token first, then
    /// custom utilities, each in token order.
    pub fn generate(&self, tokens: &BTreeSet<String>, buffer: &mut RuleBuffer) -> GenerationReport {
        let mut report = GenerationReport::default();
        let mut parsed = Vec::with_capacity(tokens.len());

        for raw in tokens {
            let token = self.parse_token(raw);
            if !token.is_complete() {
                log::debug!("skipping `{raw}`: unknown variants {:?}", token.ignored);
                report.partial.push(raw.clone());
                continue;
            }
            if token.base_class.is_empty()
                || (self.utilities.resolve(&token.base_class).is_none()
                    && !self.custom.contains(&token.base_class))
            {
                log::trace!("no utility for `{raw}`");
                report.unresolved.push(raw.clone());
                continue;
            }
            parsed.push(token);
        }

        for token in &parsed {
            if let Some(utility) = self.utilities.resolve(&token.base_class) {
                report.record(buffer.push(&compose(token, &utility)));
            }
        }
        for token in &parsed {
            for utility in self.custom.get(&token.base_class) {
                report.record(buffer.push(&compose(token, utility)));
            }
        }

        report
    }

    /// Generates and assembles a complete layer for `tokens`.
    pub fn render(&self, tokens: &BTreeSet<String>, layer: &str) -> (String, GenerationReport) {
        let mut buffer = RuleBuffer::new();
        let report = self.generate(tokens, &mut buffer);
        (assemble(&buffer, layer), report)
    }
}

impl GenerationReport {
    fn record(&mut self, added: bool) {
        if added {
            self.emitted += 1;
        } else {
            self.duplicates += 1;
        }
    }
}
