//! Compilation performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mistc::*;
use std::fs;
use tempfile::TempDir;

const CARD: &str = r#"
@scope (.card) {
  button:scope { padding: 1rem; }
  &[data-size='sm'] { padding: 0.5rem; }
  &[data-size='lg'] { padding: 2rem; }
  &[data-disabled] { opacity: 0.5; }
}
"#;

fn large_stylesheet(components: usize) -> String {
    let mut content = String::new();
    for i in 0..components {
        content.push_str(&format!(
            "@scope (.item-{i}) {{\n  div:scope {{ display: flex; }}\n  &[data-tone='info'] {{ color: blue; }}\n  &[data-tone='warn'] {{ color: orange; }}\n  @media (min-width: 640px) {{\n    &[data-wide] {{ width: 100%; }}\n  }}\n}}\n"
        ));
    }
    content
}

fn bench_simple_compilation(c: &mut Criterion) {
    c.bench_function("simple_compilation", |b| {
        b.iter(|| compile_source(black_box(CARD), black_box("card.mist.css")).unwrap())
    });
}

fn bench_large_file_compilation(c: &mut Criterion) {
    let content = large_stylesheet(1000);

    c.bench_function("large_file_compilation", |b| {
        b.iter(|| compile_source(black_box(&content), black_box("large.mist.css")).unwrap())
    });
}

fn bench_phases(c: &mut Criterion) {
    let content = large_stylesheet(200);
    let tree = CssParser.parse_stylesheet(&content, "phases.mist.css").unwrap();
    let declarations = reduce(&tree);
    let components = ComponentModelBuilder::new("phases.mist.css", ComponentMode::Multi)
        .build(&declarations)
        .unwrap();

    let mut group = c.benchmark_group("phases");
    group.bench_function("parse", |b| {
        b.iter(|| CssParser.parse_stylesheet(black_box(&content), "phases.mist.css").unwrap())
    });
    group.bench_function("reduce", |b| b.iter(|| reduce(black_box(&tree))));
    group.bench_function("build", |b| {
        b.iter(|| {
            ComponentModelBuilder::new("phases.mist.css", ComponentMode::Multi)
                .build(black_box(&declarations))
                .unwrap()
        })
    });
    group.bench_function("generate", |b| {
        b.iter(|| CodeGenerator::new().generate(black_box(&components), "phases").unwrap())
    });
    group.finish();
}

fn bench_file_compilation(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("card.mist.css");
    fs::write(&input_path, CARD).unwrap();

    c.bench_function("file_compilation", |b| {
        b.iter(|| compile_file(black_box(&input_path)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_simple_compilation,
    bench_large_file_compilation,
    bench_phases,
    bench_file_compilation
);
criterion_main!(benches);
