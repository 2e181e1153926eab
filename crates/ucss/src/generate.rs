//! The utility generator table.
//!
//! Each [`ThemeNamespace`] maps to a generator that turns one theme variable
//! into one or more `(class, body)` pairs. The body always references the
//! variable through `var(...)`, so theme switches need no recompilation:
//!
//! ```text
//! --primary: #336699   ->  bg-primary      { background-color: var(--primary); }
//!                          text-primary    { color: var(--primary); }
//!                          border-primary  { border-color: var(--primary); }
//!                          ...
//! --spacing-4: 1rem    ->  p-4, px-4, ..., m-4, ..., gap-4
//! ```
//!
//! Color utilities additionally accept an opacity suffix (`bg-primary/50`),
//! resolved as a post-step by [`UtilityTable::resolve`].

use std::borrow::Cow;
use std::collections::HashMap;

use bitflags::bitflags;

use crate::types::{GeneratedUtility, ThemeNamespace, ThemeVariables};

bitflags! {
    /// Which utilities a color variable fans out into.
    ///
    /// # Example
    ///
    /// ```
    /// use ucss::generate::ColorUtilities;
    ///
    /// let colors = ColorUtilities::BACKGROUND | ColorUtilities::TEXT;
    /// assert!(colors.contains(ColorUtilities::TEXT));
    /// assert!(!colors.contains(ColorUtilities::BORDER));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorUtilities: u16 {
        /// `bg-*` → `background-color`
        const BACKGROUND = 1 << 0;
        /// `text-*` → `color`
        const TEXT       = 1 << 1;
        /// `border-*` → `border-color`
        const BORDER     = 1 << 2;
        /// `outline-*` → `outline-color`
        const OUTLINE    = 1 << 3;
        /// `fill-*` → `fill`
        const FILL       = 1 << 4;
        /// `stroke-*` → `stroke`
        const STROKE     = 1 << 5;
        /// `decoration-*` → `text-decoration-color`
        const DECORATION = 1 << 6;
        /// `ring-*` → `--ring-color`
        const RING       = 1 << 7;
        /// `accent-*` → `accent-color`
        const ACCENT     = 1 << 8;
        /// `caret-*` → `caret-color`
        const CARET      = 1 << 9;
    }
}

impl Default for ColorUtilities {
    fn default() -> Self {
        Self::all()
    }
}

const COLOR_TARGETS: &[(ColorUtilities, &str, &str)] = &[
    (ColorUtilities::BACKGROUND, "bg", "background-color"),
    (ColorUtilities::TEXT, "text", "color"),
    (ColorUtilities::BORDER, "border", "border-color"),
    (ColorUtilities::OUTLINE, "outline", "outline-color"),
    (ColorUtilities::FILL, "fill", "fill"),
    (ColorUtilities::STROKE, "stroke", "stroke"),
    (ColorUtilities::DECORATION, "decoration", "text-decoration-color"),
    (ColorUtilities::RING, "ring", "--ring-color"),
    (ColorUtilities::ACCENT, "accent", "accent-color"),
    (ColorUtilities::CARET, "caret", "caret-color"),
];

const SPACING_TARGETS: &[(&str, &[&str])] = &[
    ("p", &["padding"]),
    ("px", &["padding-inline"]),
    ("py", &["padding-block"]),
    ("pt", &["padding-top"]),
    ("pr", &["padding-right"]),
    ("pb", &["padding-bottom"]),
    ("pl", &["padding-left"]),
    ("m", &["margin"]),
    ("mx", &["margin-inline"]),
    ("my", &["margin-block"]),
    ("mt", &["margin-top"]),
    ("mr", &["margin-right"]),
    ("mb", &["margin-bottom"]),
    ("ml", &["margin-left"]),
    ("gap", &["gap"]),
    ("gap-x", &["column-gap"]),
    ("gap-y", &["row-gap"]),
];

/// A generator: `(suffix, value reference, color fan-out) -> [(class, body)]`.
pub type Generator = fn(&str, &str, ColorUtilities) -> Vec<(String, String)>;

/// Looks up the generator for a namespace. Breakpoints generate nothing.
pub fn generator_for(namespace: ThemeNamespace) -> Option<Generator> {
    let generator: Generator = match namespace {
        ThemeNamespace::Color => color_utilities,
        ThemeNamespace::FontFamily => |s, v, _| single("font", s, "font-family", v),
        ThemeNamespace::FontWeight => |s, v, _| single("font", s, "font-weight", v),
        ThemeNamespace::FontSize => |s, v, _| single("text", s, "font-size", v),
        ThemeNamespace::Spacing => spacing_utilities,
        ThemeNamespace::Radius => |s, v, _| single("rounded", s, "border-radius", v),
        ThemeNamespace::Shadow => |s, v, _| single("shadow", s, "box-shadow", v),
        ThemeNamespace::Leading => |s, v, _| single("leading", s, "line-height", v),
        ThemeNamespace::Tracking => |s, v, _| single("tracking", s, "letter-spacing", v),
        ThemeNamespace::Opacity => |s, v, _| single("opacity", s, "opacity", v),
        ThemeNamespace::ZIndex => |s, v, _| single("z", s, "z-index", v),
        ThemeNamespace::Breakpoint => return None,
    };
    Some(generator)
}

fn single(prefix: &str, suffix: &str, property: &str, value: &str) -> Vec<(String, String)> {
    vec![(format!("{prefix}-{suffix}"), format!("{property}: {value};"))]
}

fn color_utilities(suffix: &str, value: &str, colors: ColorUtilities) -> Vec<(String, String)> {
    COLOR_TARGETS
        .iter()
        .filter(|(flag, _, _)| colors.contains(*flag))
        .map(|(_, prefix, property)| (format!("{prefix}-{suffix}"), format!("{property}: {value};")))
        .collect()
}

fn spacing_utilities(suffix: &str, value: &str, _: ColorUtilities) -> Vec<(String, String)> {
    SPACING_TARGETS
        .iter()
        .map(|(prefix, properties)| {
            let body = properties
                .iter()
                .map(|property| format!("{property}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            (format!("{prefix}-{suffix}"), body)
        })
        .collect()
}

/// The theme variable a generated utility came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UtilitySource {
    namespace: ThemeNamespace,
    suffix: String,
    variable: String,
}

#[derive(Debug, Clone)]
struct TableEntry {
    utility: GeneratedUtility,
    source: UtilitySource,
}

/// All variable-driven utilities of one theme, keyed by class name.
#[derive(Debug, Clone, Default)]
pub struct UtilityTable {
    entries: HashMap<String, TableEntry>,
    colors: ColorUtilities,
}

impl UtilityTable {
    /// Runs every recognized variable through its generator.
    ///
    /// When two variables produce the same class, the later one wins.
    pub fn build(vars: &ThemeVariables, colors: ColorUtilities) -> Self {
        let mut entries = HashMap::new();

        for (name, _) in vars.iter() {
            let Some((namespace, suffix)) = ThemeNamespace::classify(name) else {
                continue;
            };
            let Some(generator) = generator_for(namespace) else {
                continue;
            };

            let value_ref = format!("var({name})");
            for (class_name, body) in generator(suffix, &value_ref, colors) {
                let source = UtilitySource {
                    namespace,
                    suffix: suffix.to_string(),
                    variable: name.to_string(),
                };
                let utility = GeneratedUtility::new(class_name.as_str(), body);
                entries.insert(class_name, TableEntry { utility, source });
            }
        }

        Self { entries, colors }
    }

    /// Returns the utility generated under exactly `class_name`.
    pub fn get(&self, class_name: &str) -> Option<&GeneratedUtility> {
        self.entries.get(class_name).map(|entry| &entry.utility)
    }

    /// Resolves a base class, including the `<color-class>/<0-100>` opacity form.
    pub fn resolve(&self, base_class: &str) -> Option<Cow<'_, GeneratedUtility>> {
        if let Some(utility) = self.get(base_class) {
            return Some(Cow::Borrowed(utility));
        }
        self.with_opacity(base_class).map(Cow::Owned)
    }

    /// Generates the translucent variant of a color utility.
    ///
    /// `bg-primary/50` becomes
    /// `background-color: color-mix(in srgb, var(--primary) 50%, transparent);`.
    pub fn with_opacity(&self, base_class: &str) -> Option<GeneratedUtility> {
        let (class_name, alpha) = base_class.rsplit_once('/')?;
        if alpha.is_empty() || !alpha.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let alpha: u8 = alpha.parse().ok().filter(|a| *a <= 100)?;

        let entry = self.entries.get(class_name)?;
        if entry.source.namespace != ThemeNamespace::Color {
            return None;
        }

        let generator = generator_for(entry.source.namespace)?;
        let mixed = format!(
            "color-mix(in srgb, var({}) {alpha}%, transparent)",
            entry.source.variable
        );
        generator(&entry.source.suffix, &mixed, self.colors)
            .into_iter()
            .find(|(name, _)| name == class_name)
            .map(|(_, body)| GeneratedUtility::new(base_class, body))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_variables;

    fn table(css: &str) -> UtilityTable {
        UtilityTable::build(&extract_variables(css), ColorUtilities::default())
    }

    #[test]
    fn color_variable_fans_out() {
        let table = table(":root { --primary: #336699; }");
        assert_eq!(
            table.get("bg-primary").unwrap().body,
            "background-color: var(--primary);"
        );
        assert_eq!(table.get("text-primary").unwrap().body, "color: var(--primary);");
        assert_eq!(
            table.get("border-primary").unwrap().body,
            "border-color: var(--primary);"
        );
        assert_eq!(table.len(), COLOR_TARGETS.len());
    }

    #[test]
    fn color_fan_out_respects_flags() {
        let vars = extract_variables(":root { --color-brand: red; }");
        let table = UtilityTable::build(&vars, ColorUtilities::BACKGROUND);
        assert!(table.get("bg-brand").is_some());
        assert!(table.get("text-brand").is_none());
    }

    #[test]
    fn spacing_and_scalar_namespaces() {
        let table = table(
            ":root { --spacing-4: 1rem; --radius-lg: 8px; --font-weight-bold: 700; --text-lg: 1.125rem; }",
        );
        assert_eq!(table.get("px-4").unwrap().body, "padding-inline: var(--spacing-4);");
        assert_eq!(table.get("gap-y-4").unwrap().body, "row-gap: var(--spacing-4);");
        assert_eq!(table.get("rounded-lg").unwrap().body, "border-radius: var(--radius-lg);");
        assert_eq!(table.get("font-bold").unwrap().body, "font-weight: var(--font-weight-bold);");
        assert_eq!(table.get("text-lg").unwrap().body, "font-size: var(--text-lg);");
    }

    #[test]
    fn opacity_post_step() {
        let table = table(":root { --primary: #336699; --spacing-4: 1rem; }");
        let faded = table.resolve("bg-primary/50").unwrap();
        assert_eq!(faded.class_name, "bg-primary/50");
        assert_eq!(
            faded.body,
            "background-color: color-mix(in srgb, var(--primary) 50%, transparent);"
        );
        assert!(table.resolve("bg-primary/101").is_none());
        assert!(table.resolve("bg-primary/x").is_none());
        assert!(table.resolve("p-4/50").is_none());
    }

    #[test]
    fn breakpoints_generate_nothing() {
        assert!(table(":root { --breakpoint-sm: 40rem; }").is_empty());
    }
}
