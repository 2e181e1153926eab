//! The normalized utility shape shared by generated and hand-authored utilities.

use std::collections::HashMap;

/// Where a hand-authored utility's selector differs from a plain `.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorInfo {
    /// The selector exactly as authored (whitespace-normalized).
    pub selector: String,
    /// The class is one branch of a multi-branch `:where()`/`:is()` group.
    pub grouped: bool,
}

/// One utility class and the CSS body it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUtility {
    pub class_name: String,
    /// Declarations (and, for full blocks, nested rules) on a single line.
    pub body: String,
    pub selector_override: Option<SelectorInfo>,
    /// The body contains nested block syntax that must be copied through.
    pub full_block: bool,
}

impl GeneratedUtility {
    pub fn new(class_name: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            class_name: class_name.into(),
            full_block: body.contains('{'),
            body,
            selector_override: None,
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>, grouped: bool) -> Self {
        self.selector_override = Some(SelectorInfo {
            selector: selector.into(),
            grouped,
        });
        self
    }
}

/// Hand-authored utilities keyed by class name.
///
/// A class may own several entries when the stylesheet styles it in more than
/// one selector context; entries keep their source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomUtilities {
    entries: HashMap<String, Vec<GeneratedUtility>>,
}

impl CustomUtilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, utility: GeneratedUtility) {
        let entries = self.entries.entry(utility.class_name.clone()).or_default();
        if !entries.contains(&utility) {
            entries.push(utility);
        }
    }

    pub fn get(&self, class_name: &str) -> &[GeneratedUtility] {
        self.entries
            .get(class_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(class_name)
    }

    /// Number of distinct class names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
