use std::collections::BTreeSet;

use insta::assert_snapshot;
use ucss::{ColorUtilities, ThemeIndex};

const THEME: &str = r#"
    /* Brand palette */
    :root {
        --primary: #336699;
        --error: red;
        --spacing-4: 1rem;
    }

    .flex { display: flex; }

    :where(.card, .panel) { padding: 1rem; }
"#;

fn render(tokens: &[&str]) -> String {
    let index = ThemeIndex::build(THEME, ColorUtilities::default()).unwrap();
    let tokens: BTreeSet<String> = tokens.iter().map(|t| t.to_string()).collect();
    index.render(&tokens, "utilities").0
}

#[test]
fn test_variable_driven_utility() {
    let css = render(&["bg-primary"]);
    assert_snapshot!(css, @r"
    @layer utilities {
    .bg-primary { background-color: var(--primary); }
    }
    ");
}

#[test]
fn test_pseudo_variant() {
    let css = render(&["hover:bg-primary"]);
    assert!(css.contains(r".hover\:bg-primary:hover { background-color: var(--primary); }"));
}

#[test]
fn test_important_token() {
    let css = render(&["!text-error"]);
    assert!(css.contains(r".\!text-error { color: var(--error) !important; }"));
}

#[test]
fn test_breakpoint_rule_comes_last() {
    let css = render(&["sm:flex", "bg-primary", "p-4", "flex"]);
    assert_snapshot!(css, @r"
    @layer utilities {
    .bg-primary { background-color: var(--primary); }
    .p-4 { padding: var(--spacing-4); }
    .flex { display: flex; }
    @media (min-width: 640px) { .sm\:flex { display: flex; } }
    }
    ");
}

#[test]
fn test_grouped_custom_utility_only_when_used() {
    assert!(!render(&["bg-primary"]).contains(":where"));

    let css = render(&["card", "!card"]);
    assert_snapshot!(css, @r"
    @layer utilities {
    .\!card { padding: 1rem !important; }
    :where(.card, .panel) { padding: 1rem; }
    }
    ");
}

#[test]
fn test_dark_hover_nests_context() {
    let css = render(&["dark:hover:bg-primary"]);
    assert!(css.contains(
        r".dark\:hover\:bg-primary:hover { .dark & { background-color: var(--primary); } }"
    ));
}

#[test]
fn test_opacity_modifier() {
    let css = render(&["bg-primary/50"]);
    assert!(css.contains(
        r".bg-primary\/50 { background-color: color-mix(in srgb, var(--primary) 50%, transparent); }"
    ));
}

#[test]
fn test_unknown_tokens_render_nothing() {
    let css = render(&["not-a-utility", "bogus:flex"]);
    assert_eq!(css, "@layer utilities {\n}");
}
