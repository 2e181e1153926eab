use std::collections::BTreeSet;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ucss::parser::{ClassToken, VariantTable, extract_custom_utilities, extract_variables};
use ucss::{ColorUtilities, ThemeIndex};

const COLORS: &[&str] = &["primary", "secondary", "accent", "neutral", "info", "error"];
const VARIANTS: &[&str] = &["", "hover:", "md:", "dark:hover:", "sm:!", "[&_svg]:"];

fn theme() -> String {
    let mut css = String::from(":root {\n");
    for (i, color) in COLORS.iter().enumerate() {
        css.push_str(&format!("  --{color}: #{:06x};\n", i * 0x111111));
    }
    for step in 1..=16 {
        css.push_str(&format!("  --spacing-{step}: {}rem;\n", step as f32 * 0.25));
    }
    css.push_str("}\n");
    for i in 0..50 {
        css.push_str(&format!(".custom-{i} {{ display: block; order: {i}; }}\n"));
    }
    css
}

fn tokens(count: usize) -> BTreeSet<String> {
    let bases = COLORS
        .iter()
        .map(|c| format!("bg-{c}"))
        .chain((1..=16).map(|s| format!("p-{s}")))
        .chain((0..50).map(|i| format!("custom-{i}")))
        .collect::<Vec<_>>();
    bases
        .iter()
        .flat_map(|base| VARIANTS.iter().map(move |v| format!("{v}{base}")))
        .take(count)
        .collect()
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("theme_extraction");
    let source = theme();

    group.bench_function("variables", |b| b.iter(|| extract_variables(black_box(&source))));
    group.bench_function("custom_utilities", |b| {
        b.iter(|| extract_custom_utilities(black_box(&source)))
    });
    group.bench_function("theme_index", |b| {
        b.iter(|| ThemeIndex::build(black_box(&source), ColorUtilities::default()))
    });
    group.finish();
}

fn bench_token_parse(c: &mut Criterion) {
    let table = VariantTable::new();
    let cases = [
        ("plain", "bg-primary"),
        ("stacked", "sm:hover:!bg-primary"),
        ("arbitrary", "[&:hover_.icon]:text-primary"),
    ];

    let mut group = c.benchmark_group("token_parse");
    for (name, token) in cases {
        group.bench_with_input(BenchmarkId::new("parse", name), token, |b, token| {
            b.iter(|| ClassToken::parse(black_box(token), &table))
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let index = ThemeIndex::build(&theme(), ColorUtilities::default()).expect("bench theme parses");

    let mut group = c.benchmark_group("render_layer");
    for count in [10, 100, 400] {
        let used = tokens(count);
        group.bench_with_input(BenchmarkId::new("tokens", count), &used, |b, used| {
            b.iter(|| index.render(black_box(used), "utilities"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extraction, bench_token_parse, bench_render);
criterion_main!(benches);
