//! Benchmarks for import analysis and rewriting
//!
//! Measures how analysis scales with the number of import statements and
//! the amount of code that has to be scanned for references.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use importsweep::analysis::{ImportAnalyzer, SourceLanguage};
use importsweep::codebase::{render_file, Removals};
use std::path::Path;

/// Create a Python module with `imports` imports and `functions` functions
/// that use every other import.
fn python_source(imports: usize, functions: usize) -> String {
    let mut source = String::new();
    for i in 0..imports {
        source.push_str(&format!("from pkg.module_{i} import name_{i}\n"));
    }
    source.push('\n');
    for f in 0..functions {
        source.push_str(&format!("def function_{f}(value):\n"));
        for i in (0..imports).step_by(2) {
            source.push_str(&format!("    value = name_{i}(value, key=value)\n"));
        }
        source.push_str("    return value\n\n");
    }
    source
}

/// Create a TypeScript module with one named import per symbol.
fn typescript_source(imports: usize, functions: usize) -> String {
    let mut source = String::new();
    for i in 0..imports {
        source.push_str(&format!("import {{ name{i}, type Type{i} }} from './module{i}';\n"));
    }
    for f in 0..functions {
        source.push_str(&format!("export function fn{f}(value: Type0): number {{\n"));
        for i in (0..imports).step_by(2) {
            source.push_str(&format!("  value = name{i}(value);\n"));
        }
        source.push_str("  return value;\n}\n");
    }
    source
}

/// Benchmark analysis of Python files
fn bench_analyze_python(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_python");
    let mut analyzer = ImportAnalyzer::new().unwrap();

    for size in [10, 50, 200].iter() {
        let source = python_source(*size, *size);

        group.bench_with_input(BenchmarkId::new("imports", size), &source, |b, src| {
            b.iter(|| {
                black_box(
                    analyzer
                        .analyze_source(src, SourceLanguage::Python, Path::new("bench.py"))
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

/// Benchmark analysis of TypeScript files
fn bench_analyze_typescript(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_typescript");
    let mut analyzer = ImportAnalyzer::new().unwrap();

    for size in [10, 50, 200].iter() {
        let source = typescript_source(*size, *size);

        group.bench_with_input(BenchmarkId::new("imports", size), &source, |b, src| {
            b.iter(|| {
                black_box(
                    analyzer
                        .analyze_source(src, SourceLanguage::TypeScript, Path::new("bench.ts"))
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

/// Benchmark rendering a file with every unused import removed
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_file");
    let mut analyzer = ImportAnalyzer::new().unwrap();

    for size in [10, 50, 200].iter() {
        let source = python_source(*size, 10);
        let analysis = analyzer
            .analyze_source(&source, SourceLanguage::Python, Path::new("bench.py"))
            .unwrap();

        let mut removals = Removals::new();
        for (s, statement) in analysis.statements.iter().enumerate() {
            for (b, binding) in statement.bindings.iter().enumerate() {
                if analysis.references_to(&binding.local).next().is_none() {
                    removals.remove_binding(s, b);
                }
            }
        }

        group.bench_with_input(BenchmarkId::new("imports", size), &source, |b, src| {
            b.iter(|| {
                black_box(render_file(
                    src,
                    SourceLanguage::Python,
                    &analysis.statements,
                    &removals,
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_analyze_python,
    bench_analyze_typescript,
    bench_render
);
criterion_main!(benches);
