//! Selector data structures.
//!
//! Custom utilities are keyed by the class their selector styles (its
//! *subject*), so the only question these types answer beyond structure is
//! "which classes does this selector target, and are they grouped".

/// A simple selector inside a compound selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Type(String),
    Class(String),
    Id(String),
    Universal,
    PseudoClass(String),
    PseudoElement(String),
    /// A functional pseudo-class whose argument is a selector list
    /// (`:where(.a, .b)`, `:is(...)`, `:not(...)`).
    Functional(String, SelectorList),
    /// A functional pseudo-class with a non-selector argument (`:nth-child(2n+1)`).
    FunctionalRaw(String, String),
    Parent,
    Attribute(String, String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundSelector {
    pub selectors: Vec<Selector>,
}

impl CompoundSelector {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    /// Classes this compound targets, plus whether any came from a
    /// multi-branch `:where()`/`:is()` group.
    fn subject_classes(&self, out: &mut Vec<String>) -> bool {
        let mut grouped = false;
        for s in &self.selectors {
            match s {
                Selector::Class(name) => push_unique(out, name),
                Selector::Functional(name, list) if name == "where" || name == "is" => {
                    let before = out.len();
                    for complex in &list.selectors {
                        let (classes, inner_grouped) = complex.subject_classes();
                        grouped |= inner_grouped;
                        for class in classes {
                            push_unique(out, &class);
                        }
                    }
                    if list.selectors.len() > 1 && out.len() > before {
                        grouped = true;
                    }
                }
                _ => {}
            }
        }
        grouped
    }

    fn first_class(&self) -> Option<&str> {
        self.selectors.iter().find_map(|s| match s {
            Selector::Class(name) => Some(name.as_str()),
            Selector::Functional(name, list) if name != "not" => {
                list.selectors.iter().find_map(ComplexSelector::first_class)
            }
            _ => None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    None,
    Descendant,
    Child,
    AdjacentSibling, // +
    GeneralSibling,  // ~
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorPart {
    pub compound: CompoundSelector,
    pub combinator: Combinator,
}

impl SelectorPart {
    pub fn new(compound: CompoundSelector, combinator: Combinator) -> Self {
        Self {
            compound,
            combinator,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<SelectorPart>,
}

impl ComplexSelector {
    pub fn new(parts: Vec<SelectorPart>) -> Self {
        Self { parts }
    }

    /// Returns the classes this selector styles and whether they are grouped.
    ///
    /// The subject is the rightmost compound (`.dark .card` targets `card`).
    /// When the subject carries no class (`.card > *`), the first class
    /// anywhere in the selector is used instead.
    pub fn subject_classes(&self) -> (Vec<String>, bool) {
        let mut classes = Vec::new();
        let grouped = self
            .parts
            .last()
            .map(|part| part.compound.subject_classes(&mut classes))
            .unwrap_or(false);

        if classes.is_empty() {
            if let Some(first) = self.first_class() {
                classes.push(first.to_string());
            }
            return (classes, false);
        }
        (classes, grouped)
    }

    fn first_class(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| p.compound.first_class())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn new(selectors: Vec<ComplexSelector>) -> Self {
        Self { selectors }
    }
}

fn push_unique(out: &mut Vec<String>, name: &str) {
    if !out.iter().any(|existing| existing == name) {
        out.push(name.to_string());
    }
}
