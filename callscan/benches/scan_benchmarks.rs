use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use callscan::metrics::ScanMetrics;
use callscan::search::matcher::{DEFAULT_MARKER, DEFAULT_WINDOW_SIZE};
use callscan::search::{FileScanner, PatternMatcher, ScanCoordinator};
use std::fs::File;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tempfile::tempdir;

fn java_source(calls: usize) -> String {
    let mut source = String::from("public class Bench {\n");
    for i in 0..calls {
        source.push_str(&format!("    int field{} = {};\n", i, i));
        source.push_str("    // myFunction is called below\n");
        source.push_str(&format!("    void m{}() {{ myFunction(\"Event handler number {}\"); }}\n", i, i));
    }
    source.push_str("}\n");
    source
}

fn create_test_files(dir: &tempfile::TempDir, file_count: usize, calls_per_file: usize) -> Vec<PathBuf> {
    let source = java_source(calls_per_file);
    (0..file_count)
        .map(|i| {
            let path = dir.path().join(format!("Bench{}.java", i));
            let mut file = File::create(&path).unwrap();
            file.write_all(source.as_bytes()).unwrap();
            path
        })
        .collect()
}

fn bench_scan_content(c: &mut Criterion) {
    let matcher = PatternMatcher::new(DEFAULT_MARKER).unwrap();
    let metrics = ScanMetrics::new();
    let mut group = c.benchmark_group("scan_content");

    for calls in [10, 1_000] {
        let source = java_source(calls);
        group.bench_with_input(BenchmarkId::from_parameter(calls), &source, |b, source| {
            let mut scanner = FileScanner::new(&matcher, DEFAULT_WINDOW_SIZE, &metrics);
            b.iter(|| scanner.scan_content("Bench.java", black_box(source.as_bytes())));
        });
    }
    group.finish();
}

fn bench_thread_counts(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let paths = create_test_files(&dir, 200, 50);
    let mut group = c.benchmark_group("coordinator");

    for threads in [1, 2, 4, 8] {
        let coordinator = ScanCoordinator::new(
            PatternMatcher::new(DEFAULT_MARKER).unwrap(),
            "java",
            DEFAULT_WINDOW_SIZE,
            NonZeroUsize::new(threads).unwrap(),
        );
        group.bench_with_input(BenchmarkId::from_parameter(threads), &paths, |b, paths| {
            b.iter(|| coordinator.run(black_box(paths)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan_content, bench_thread_counts);
criterion_main!(benches);
