//! The variant table: variant names to selector fragments.
//!
//! Every variant resolves to one of four shapes, decided once here so the
//! composer never has to sniff selector strings:
//!
//! | Kind     | Example selector          | Composition                           |
//! |----------|---------------------------|---------------------------------------|
//! | `Pseudo` | `:hover`, `::before`      | appended to the selector              |
//! | `Flat`   | `& > *`, `& figure`       | `&` replaced by the selector          |
//! | `Nested` | `.dark &`, `figure`       | rendered as a nested block            |
//! | `Media`  | `@media (min-width: 640px)` | wraps the whole rule               |
//!
//! Breakpoints default to the usual `sm`/`md`/`lg`/`xl`/`2xl` widths and can be
//! overridden or extended by `--breakpoint-<name>` theme variables.

use crate::types::theme::{ThemeNamespace, ThemeVariables};
use phf::phf_map;

static PSEUDO_VARIANTS: phf::Map<&'static str, &'static str> = phf_map! {
    "hover" => ":hover",
    "focus" => ":focus",
    "focus-visible" => ":focus-visible",
    "focus-within" => ":focus-within",
    "active" => ":active",
    "visited" => ":visited",
    "disabled" => ":disabled",
    "enabled" => ":enabled",
    "checked" => ":checked",
    "required" => ":required",
    "invalid" => ":invalid",
    "first" => ":first-child",
    "last" => ":last-child",
    "odd" => ":nth-child(odd)",
    "even" => ":nth-child(even)",
    "empty" => ":empty",
    "open" => "[open]",
    "placeholder" => "::placeholder",
    "before" => "::before",
    "after" => "::after",
    "selection" => "::selection",
    "marker" => "::marker",
};

static CONTEXT_VARIANTS: phf::Map<&'static str, &'static str> = phf_map! {
    "dark" => ".dark &",
    "rtl" => "[dir=\"rtl\"] &",
    "ltr" => "[dir=\"ltr\"] &",
    "*" => "& > *",
    "**" => "& *",
    "not-first" => "&:not(:first-child)",
    "not-last" => "&:not(:last-child)",
};

static MEDIA_VARIANTS: phf::Map<&'static str, &'static str> = phf_map! {
    "print" => "@media print",
    "motion-safe" => "@media (prefers-reduced-motion: no-preference)",
    "motion-reduce" => "@media (prefers-reduced-motion: reduce)",
    "portrait" => "@media (orientation: portrait)",
    "landscape" => "@media (orientation: landscape)",
    "contrast-more" => "@media (prefers-contrast: more)",
};

const DEFAULT_BREAKPOINTS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

/// How a variant's selector combines with the utility selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// Rendered as a nested block inside the utility rule.
    Nested,
    /// `&` is replaced by the accumulated selector.
    Flat,
    /// Appended to the accumulated selector.
    Pseudo,
    /// The whole rule is wrapped in this at-rule.
    Media,
}

/// A resolved variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub selector: String,
    pub kind: VariantKind,
    /// Written inline as `[...]` rather than looked up by name.
    pub arbitrary: bool,
}

impl Variant {
    /// Classifies a selector from the variant table.
    pub fn named(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        let kind = if selector.starts_with('@') {
            VariantKind::Media
        } else if selector.trim_end().ends_with('&') {
            VariantKind::Nested
        } else if selector.contains('&') {
            VariantKind::Flat
        } else {
            VariantKind::Pseudo
        };
        Self {
            selector,
            kind,
            arbitrary: false,
        }
    }

    /// Classifies the decoded content of an arbitrary `[...]` variant.
    ///
    /// Selectors starting with `&` are flattened into the utility selector,
    /// `@`-prefixed ones wrap the rule, anything else nests.
    pub fn arbitrary(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        let kind = if selector.starts_with('&') {
            VariantKind::Flat
        } else if selector.starts_with('@') {
            VariantKind::Media
        } else {
            VariantKind::Nested
        };
        Self {
            selector,
            kind,
            arbitrary: true,
        }
    }

    pub fn is_media_query(&self) -> bool {
        self.kind == VariantKind::Media
    }
}

/// Lookup from variant name to [`Variant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTable {
    breakpoints: Vec<(String, String)>,
}

impl Default for VariantTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantTable {
    /// Creates a table with the default breakpoints.
    pub fn new() -> Self {
        Self {
            breakpoints: DEFAULT_BREAKPOINTS
                .iter()
                .map(|(name, width)| (name.to_string(), width.to_string()))
                .collect(),
        }
    }

    /// Builds a table whose breakpoints honor `--breakpoint-*` theme variables.
    pub fn from_variables(vars: &ThemeVariables) -> Self {
        let mut table = Self::new();
        for (name, value) in vars.iter() {
            if let Some((ThemeNamespace::Breakpoint, bp)) = ThemeNamespace::classify(name) {
                table = table.with_breakpoint(bp, value);
            }
        }
        table
    }

    /// Sets (or adds) the minimum width of breakpoint `name`.
    pub fn with_breakpoint(mut self, name: &str, min_width: &str) -> Self {
        match self.breakpoints.iter().position(|(bp, _)| bp == name) {
            Some(index) => self.breakpoints[index].1 = min_width.to_string(),
            None => self
                .breakpoints
                .push((name.to_string(), min_width.to_string())),
        }
        self
    }

    /// Resolves a variant name, or `None` when it is unknown.
    pub fn resolve(&self, name: &str) -> Option<Variant> {
        if let Some(pseudo) = PSEUDO_VARIANTS.get(name) {
            return Some(Variant::named(*pseudo));
        }
        if let Some(context) = CONTEXT_VARIANTS.get(name) {
            return Some(Variant::named(*context));
        }
        if let Some(media) = MEDIA_VARIANTS.get(name) {
            return Some(Variant::named(*media));
        }
        if let Some(width) = self.breakpoint(name) {
            return Some(Variant::named(format!("@media (min-width: {width})")));
        }
        if let Some(width) = name.strip_prefix("max-").and_then(|bp| self.breakpoint(bp)) {
            return Some(Variant::named(format!("@media (width < {width})")));
        }
        if let Some(state) = name.strip_prefix("group-").and_then(state_pseudo) {
            return Some(Variant::named(format!(".group{state} &")));
        }
        if let Some(state) = name.strip_prefix("peer-").and_then(state_pseudo) {
            return Some(Variant::named(format!(".peer{state} ~ &")));
        }
        None
    }

    fn breakpoint(&self, name: &str) -> Option<&str> {
        self.breakpoints
            .iter()
            .find(|(bp, _)| bp == name)
            .map(|(_, width)| width.as_str())
    }
}

/// Pseudo-classes usable after `group-`/`peer-` (no pseudo-elements).
fn state_pseudo(name: &str) -> Option<&'static str> {
    PSEUDO_VARIANTS
        .get(name)
        .copied()
        .filter(|pseudo| !pseudo.starts_with("::"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_variables;

    #[test]
    fn resolves_each_kind() {
        let table = VariantTable::new();
        assert_eq!(table.resolve("hover").unwrap().kind, VariantKind::Pseudo);
        assert_eq!(table.resolve("dark").unwrap().kind, VariantKind::Nested);
        assert_eq!(table.resolve("*").unwrap().kind, VariantKind::Flat);
        let sm = table.resolve("sm").unwrap();
        assert_eq!(sm.kind, VariantKind::Media);
        assert_eq!(sm.selector, "@media (min-width: 640px)");
        assert!(table.resolve("unknown").is_none());
    }

    #[test]
    fn group_and_peer_states() {
        let table = VariantTable::new();
        let group = table.resolve("group-hover").unwrap();
        assert_eq!(group.selector, ".group:hover &");
        assert_eq!(group.kind, VariantKind::Nested);
        assert_eq!(table.resolve("peer-checked").unwrap().selector, ".peer:checked ~ &");
        assert!(table.resolve("group-before").is_none());
    }

    #[test]
    fn breakpoints_follow_theme_variables() {
        let vars = extract_variables(":root { --breakpoint-sm: 40rem; --breakpoint-3xl: 120rem; }");
        let table = VariantTable::from_variables(&vars);
        assert_eq!(table.resolve("sm").unwrap().selector, "@media (min-width: 40rem)");
        assert_eq!(table.resolve("3xl").unwrap().selector, "@media (min-width: 120rem)");
        assert_eq!(table.resolve("max-md").unwrap().selector, "@media (width < 768px)");
    }

    #[test]
    fn arbitrary_classification() {
        assert_eq!(Variant::arbitrary("& figure").kind, VariantKind::Flat);
        assert_eq!(Variant::arbitrary(".dark &").kind, VariantKind::Nested);
        assert_eq!(Variant::arbitrary("figure").kind, VariantKind::Nested);
        assert_eq!(Variant::arbitrary("@supports (display: grid)").kind, VariantKind::Media);
    }
}
