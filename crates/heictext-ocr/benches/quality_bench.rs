// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for text-quality scoring and ground-truth similarity.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use heictext_ocr::quality::{TextQuality, alphanumeric_count};
use heictext_ocr::similarity::{SimilarityMetrics, text_similarity};

const CLEAN: &str = "resource \"aws_instance\" \"web\" {\n  ami           = \"ami-0c55b159cbfafe1f0\"\n  instance_type = \"t2.micro\"\n}\n";
const NOISY: &str = "res0urce \"aws_instance\" \"vveb\" |\n  arni = ° ≈ \"ami-0c55bl59cbfafe1fO\"\n  i n s t a n c e _type = \"t2.rnicro\"\n}\n";

fn bench_quality(c: &mut Criterion) {
    let page = CLEAN.repeat(40);
    c.bench_function("quality assess (clean page)", |b| {
        b.iter(|| black_box(TextQuality::assess(black_box(&page)).normalized()));
    });
    let noisy = NOISY.repeat(40);
    c.bench_function("quality assess (noisy page)", |b| {
        b.iter(|| black_box(TextQuality::assess(black_box(&noisy)).score));
    });
    c.bench_function("alphanumeric count", |b| {
        b.iter(|| black_box(alphanumeric_count(black_box(&page))));
    });
}

fn bench_similarity(c: &mut Criterion) {
    let truth = CLEAN.repeat(10);
    let ocr = NOISY.repeat(10);
    c.bench_function("text similarity", |b| {
        b.iter(|| black_box(text_similarity(black_box(&truth), black_box(&ocr))));
    });
    c.bench_function("similarity metrics", |b| {
        b.iter(|| black_box(SimilarityMetrics::measure(black_box(&truth), black_box(&ocr))));
    });
}

criterion_group!(benches, bench_quality, bench_similarity);
criterion_main!(benches);
