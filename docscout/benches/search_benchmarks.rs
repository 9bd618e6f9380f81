use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docscout::{search, SearchConfig};
use std::num::NonZeroUsize;
use tempfile::tempdir;

#[path = "../tests/common/mod.rs"]
mod common;

fn create_test_documents(
    dir: &tempfile::TempDir,
    file_count: usize,
    paragraphs_per_file: usize,
) -> std::io::Result<()> {
    let paragraphs: Vec<String> = (0..paragraphs_per_file)
        .map(|j| format!("Paragraph {} of a quarterly report with nothing special", j))
        .collect();
    for i in 0..file_count {
        let mut texts: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
        if i % 4 == 0 {
            texts.push("prepared by hirusha");
        }
        common::write_docx(&dir.path().join(format!("report_{}.docx", i)), &texts)?;
    }
    Ok(())
}

fn bench_thread_counts(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_documents(&dir, 64, 200).unwrap();

    let mut group = c.benchmark_group("thread_count");
    for threads in [1, 2, 4, 8] {
        let config = SearchConfig::new("hirusha", [dir.path()])
            .unwrap()
            .with_thread_count(NonZeroUsize::new(threads).unwrap());
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, config| {
            b.iter(|| search(black_box(config)).unwrap())
        });
    }
    group.finish();
}

fn bench_document_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_size");
    for paragraphs in [10, 1_000] {
        let dir = tempdir().unwrap();
        create_test_documents(&dir, 16, paragraphs).unwrap();
        let config = SearchConfig::new("hirusha", [dir.path()]).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(paragraphs),
            &config,
            |b, config| b.iter(|| search(black_box(config)).unwrap()),
        );
    }
    group.finish();
}

fn bench_missing_target(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_documents(&dir, 32, 200).unwrap();
    let config = SearchConfig::new("no such phrase anywhere", [dir.path()]).unwrap();

    c.bench_function("missing_target", |b| {
        b.iter(|| search(black_box(&config)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_thread_counts,
    bench_document_size,
    bench_missing_target
);
criterion_main!(benches);
