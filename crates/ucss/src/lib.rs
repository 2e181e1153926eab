//! # UCSS - Utility-class CSS compiler core
//!
//! Turns a theme stylesheet plus a set of observed utility tokens into a
//! minimal, deduplicated ruleset inside one CSS layer.
//!
//! This crate is pure: no I/O, no async. It provides:
//!
//! - **Extraction**: Theme variables and hand-authored utilities from theme CSS
//! - **Tokens**: `sm:hover:!bg-primary` split into variants, base class and `!`
//! - **Generation**: Variable-driven utilities (`bg-primary`, `p-4`, ...)
//! - **Composition**: One token + one utility body → one rendered rule
//! - **Assembly**: The layer text, unconditional rules before media rules
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use ucss::{ColorUtilities, ThemeIndex};
//!
//! let theme = r#"
//!     :root { --primary: #336699; --spacing-4: 1rem; }
//!     .flex { display: flex; }
//! "#;
//!
//! let index = ThemeIndex::build(theme, ColorUtilities::default()).expect("valid theme");
//! let tokens: BTreeSet<String> = ["hover:bg-primary", "md:p-4", "flex"]
//!     .iter()
//!     .map(|t| t.to_string())
//!     .collect();
//!
//! let (css, report) = index.render(&tokens, "utilities");
//! assert!(css.starts_with("@layer utilities {"));
//! assert!(css.contains(r".hover\:bg-primary:hover { background-color: var(--primary); }"));
//! assert_eq!(report.emitted, 3);
//! ```
//!
//! ## Supported Features
//!
//! ### Theme namespaces
//! - Colors: `--color-*` and semantic names (`--primary`, `--accent`, ...)
//! - Typography: `--font-*`, `--font-weight-*`, `--text-*`, `--leading-*`, `--tracking-*`
//! - Box: `--spacing-*`, `--radius-*`, `--shadow-*`, `--opacity-*`, `--z-*`
//! - Breakpoints: `--breakpoint-*` (variants only)
//!
//! ### Variants
//! - Pseudo-classes and elements: `hover:`, `focus:`, `before:`, ...
//! - Context: `dark:`, `group-hover:`, `peer-checked:`, `rtl:`
//! - Media: `sm:` ... `2xl:`, `max-md:`, `print:`, `motion-reduce:`
//! - Arbitrary: `[&_figure]:`, `[.theme-x_&]:`, `[@supports_(display:grid)]:`
//!
//! ## Modules
//!
//! - [`parser`]: Theme, custom utility, selector and token parsing
//! - [`types`]: Theme variables and the normalized utility shape
//! - [`generate`]: The namespace → utility generator table
//! - [`compose`]: Rule composition and class escaping
//! - [`assemble`]: Layer assembly and critical-CSS filtering
//! - [`index`]: The parsed theme and generation entry point
//! - [`error`]: Error types for malformed theme CSS

pub mod assemble;
pub mod compose;
pub mod error;
pub mod generate;
pub mod index;
pub mod parser;
pub mod types;

pub use assemble::{RuleBuffer, assemble, base_classes, filter_critical};
pub use compose::{ComposedRule, compose, escape_class};
pub use error::UcssError;
pub use generate::{ColorUtilities, UtilityTable};
pub use index::{GenerationReport, ThemeIndex};
pub use parser::{ClassToken, Variant, VariantKind, VariantTable};
pub use types::{CustomUtilities, GeneratedUtility, ThemeVariables};
