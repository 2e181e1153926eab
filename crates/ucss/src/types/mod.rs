pub mod theme;
pub mod utility;

pub use theme::{ThemeNamespace, ThemeVariable, ThemeVariables};
pub use utility::{CustomUtilities, GeneratedUtility, SelectorInfo};
