use ad_bench::fixture::{JS_HANDLERS, TS_SERVICE};
use ad_core::Language;
use ad_doc::{document_function, DocOptions};
use ad_parser::parse_source;
use ad_writer::{annotate_source, AnnotateOptions};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

/// Benchmark: documentation of pre-parsed functions, then whole-source annotation.
fn bench_render_throughput(c: &mut Criterion) {
    let sources = [(TS_SERVICE, Language::TypeScript), (JS_HANDLERS, Language::JavaScript)];

    let functions: Vec<(ad_core::FunctionNode, DocOptions)> = sources
        .iter()
        .flat_map(|(source, language)| {
            let out = parse_source(source, *language).unwrap();
            let options = DocOptions::typed(language.is_typed());
            out.sites
                .into_iter()
                .map(move |site| (site.function, options.clone()))
        })
        .collect();

    let mut group = c.benchmark_group("render_throughput");
    group.throughput(Throughput::Elements(functions.len() as u64));
    group.bench_function("document_functions", |b| {
        b.iter(|| {
            for (func, options) in &functions {
                let _ = document_function(func, options);
            }
        });
    });

    let options = AnnotateOptions::default();
    let bytes: usize = sources.iter().map(|(s, _)| s.len()).sum();
    group.throughput(Throughput::Bytes(bytes as u64));
    group.bench_function("annotate_sources", |b| {
        b.iter(|| {
            for (source, language) in &sources {
                let _ = annotate_source(source, *language, &options);
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_render_throughput);
criterion_main!(benches);
