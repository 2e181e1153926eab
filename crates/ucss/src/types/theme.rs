//! Theme variables and the namespaces that make them utility sources.
//!
//! A theme variable is recognized purely by its name. Two naming schemes are
//! understood:
//!
//! | Pattern              | Namespace      | Utility suffix        |
//! |----------------------|----------------|-----------------------|
//! | `--color-<name>`     | Color          | `<name>`              |
//! | `--primary[-<x>]`    | Color          | `primary[-<x>]`       |
//! | `--font-weight-<n>`  | FontWeight     | `<n>`                 |
//! | `--font-<n>`         | FontFamily     | `<n>`                 |
//! | `--text-<n>`         | FontSize       | `<n>`                 |
//! | `--spacing-<n>`      | Spacing        | `<n>`                 |
//! | `--radius-<n>`       | Radius         | `<n>`                 |
//! | `--shadow-<n>`       | Shadow         | `<n>`                 |
//! | `--leading-<n>`      | Leading        | `<n>`                 |
//! | `--tracking-<n>`     | Tracking       | `<n>`                 |
//! | `--opacity-<n>`      | Opacity        | `<n>`                 |
//! | `--z-<n>`            | ZIndex         | `<n>`                 |
//! | `--breakpoint-<n>`   | Breakpoint     | (variant table only)  |
//!
//! The semantic color names are `primary`, `secondary`, `accent`, `neutral`,
//! `base`, `info`, `success`, `warning`, `error`, `surface`, `background`,
//! `foreground`, `muted`, `border` and `ring`.

use std::collections::HashMap;

/// A single theme custom property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeVariable {
    pub name: String,
    pub value: String,
}

/// Name → value map of recognized theme variables.
///
/// Iteration follows the order in which each name was first declared; a
/// redeclaration replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeVariables {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl ThemeVariables {
    /// Creates an empty variable map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a variable, overwriting any earlier value of the same name.
    pub fn define(&mut self, name: String, value: String) {
        if !self.values.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.values.insert(name, value);
    }

    /// Returns the value of `name` (including the leading `--`).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.as_str(), v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<ThemeVariable> for ThemeVariables {
    fn from_iter<T: IntoIterator<Item = ThemeVariable>>(iter: T) -> Self {
        let mut vars = ThemeVariables::new();
        for var in iter {
            vars.define(var.name, var.value);
        }
        vars
    }
}

/// The families of theme variables that drive utility generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeNamespace {
    Color,
    FontFamily,
    FontWeight,
    FontSize,
    Spacing,
    Radius,
    Shadow,
    Leading,
    Tracking,
    Opacity,
    ZIndex,
    Breakpoint,
}

// Longest prefixes first: `font-weight-` must win over `font-`.
const PREFIXES: &[(&str, ThemeNamespace)] = &[
    ("color-", ThemeNamespace::Color),
    ("font-weight-", ThemeNamespace::FontWeight),
    ("font-", ThemeNamespace::FontFamily),
    ("text-", ThemeNamespace::FontSize),
    ("spacing-", ThemeNamespace::Spacing),
    ("radius-", ThemeNamespace::Radius),
    ("shadow-", ThemeNamespace::Shadow),
    ("leading-", ThemeNamespace::Leading),
    ("tracking-", ThemeNamespace::Tracking),
    ("opacity-", ThemeNamespace::Opacity),
    ("breakpoint-", ThemeNamespace::Breakpoint),
    ("z-", ThemeNamespace::ZIndex),
];

const SEMANTIC_COLORS: &[&str] = &[
    "primary",
    "secondary",
    "accent",
    "neutral",
    "base",
    "info",
    "success",
    "warning",
    "error",
    "surface",
    "background",
    "foreground",
    "muted",
    "border",
    "ring",
];

impl ThemeNamespace {
    /// Classifies a custom property name (with or without the leading `--`).
    ///
    /// Returns the namespace and the suffix used to name generated utilities,
    /// or `None` when the name is not a theme variable.
    pub fn classify(name: &str) -> Option<(ThemeNamespace, &str)> {
        let name = name.strip_prefix("--").unwrap_or(name);

        for (prefix, namespace) in PREFIXES {
            if let Some(suffix) = name.strip_prefix(prefix) {
                if is_valid_suffix(suffix) {
                    return Some((*namespace, suffix));
                }
            }
        }

        let head = name.split('-').next().unwrap_or(name);
        if SEMANTIC_COLORS.contains(&head) && is_valid_suffix(name) {
            return Some((ThemeNamespace::Color, name));
        }
        None
    }
}

fn is_valid_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && !suffix.ends_with('-')
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
