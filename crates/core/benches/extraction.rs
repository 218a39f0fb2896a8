use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hush_core::preprocess::preprocess_html;
use hush_core::{ArticleExtractor, ContentResolver, Document, Page, ReadabilityExtractor, clean};

const PAGE_URL: &str = "https://www.dailyledger.example.com/travel/night-trains";

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let small = fixture("main_content.html");
    let medium = fixture("article.html");

    let mut group = c.benchmark_group("parse");

    group.bench_with_input(BenchmarkId::new("page", "main_content"), &small, |b, html| {
        b.iter(|| Page::parse(black_box(html), PAGE_URL))
    });

    group.bench_with_input(BenchmarkId::new("page", "article"), &medium, |b, html| {
        b.iter(|| Page::parse(black_box(html), PAGE_URL))
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for name in ["article.html", "main_content.html", "no_content.html"] {
        let page = Page::parse(&fixture(name), PAGE_URL).unwrap();
        group.bench_with_input(BenchmarkId::new("fallback_chain", name), &page, |b, page| {
            b.iter(|| ContentResolver::new().resolve(black_box(page)))
        });
    }

    group.finish();
}

fn bench_extractor(c: &mut Criterion) {
    let doc = Document::parse(&fixture("article.html")).unwrap();
    let extractor = ReadabilityExtractor::new();

    c.bench_function("readability_extract", |b| b.iter(|| extractor.extract(black_box(&doc))));
}

fn bench_preprocess(c: &mut Criterion) {
    let html = fixture("article.html");
    let config = Default::default();

    c.bench_function("preprocess", |b| b.iter(|| preprocess_html(black_box(&html), &config)));
}

fn bench_clean(c: &mut Criterion) {
    let body = Document::parse(&fixture("article.html")).unwrap().body().unwrap().inner_html();

    c.bench_function("clean", |b| b.iter(|| clean(black_box(&body))));
}

criterion_group!(
    benches,
    bench_parse,
    bench_resolve,
    bench_extractor,
    bench_preprocess,
    bench_clean
);
criterion_main!(benches);
