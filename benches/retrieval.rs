// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Throughput benchmarks: codec round trips and query drivers over a
//! synthetic corpus. The corpus is generated from a fixed-seed LCG so every
//! run measures the same index.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prosody::binary::{bytes_to_postings, postings_to_bytes};
use prosody::query::{Query, QueryMode};
use prosody::scoring::{RetrievalModel, ScoringParams};
use prosody::testing::index_from_texts;
use prosody::InvertedIndex;

/// Deterministic corpus: 400 scenes of 60 tokens over a 50-word vocabulary.
fn synthetic_texts() -> Vec<String> {
    let vocabulary: Vec<String> = (0..50).map(|i| format!("w{i}")).collect();
    let mut state: u64 = 0x5DEECE66D;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    (0..400)
        .map(|_| {
            (0..60)
                .map(|_| vocabulary[next() % vocabulary.len()].clone())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn build_synthetic_index() -> InvertedIndex {
    let texts = synthetic_texts();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    index_from_texts(&refs)
}

fn bench_codec(c: &mut Criterion) {
    let index = build_synthetic_index();
    let list = index.get_inverted_list("w0").unwrap();
    let compressed = postings_to_bytes(&list, true);
    let uncompressed = postings_to_bytes(&list, false);
    let df = list.df();

    c.bench_function("decode_compressed_list", |b| {
        b.iter(|| bytes_to_postings(black_box(&compressed), true, df).unwrap())
    });
    c.bench_function("decode_uncompressed_list", |b| {
        b.iter(|| bytes_to_postings(black_box(&uncompressed), false, df).unwrap())
    });
    c.bench_function("encode_compressed_list", |b| {
        b.iter(|| postings_to_bytes(black_box(&list), true))
    });
}

fn bench_query_drivers(c: &mut Criterion) {
    let index = build_synthetic_index();
    let query = "w0 w7 w23";

    for (name, mode) in [
        ("term_at_a_time_bm25", QueryMode::Term),
        ("doc_at_a_time_bm25", QueryMode::Doc),
    ] {
        c.bench_function(name, |b| {
            let driver = Query::new(
                &index,
                mode,
                RetrievalModel::Bm25,
                10,
                ScoringParams::default(),
            );
            b.iter(|| driver.get_documents(black_box(query)).unwrap())
        });
    }

    c.bench_function("term_at_a_time_dirichlet", |b| {
        let driver = Query::new(
            &index,
            QueryMode::Term,
            RetrievalModel::Dirichlet,
            10,
            ScoringParams::default(),
        );
        b.iter(|| driver.get_documents(black_box(query)).unwrap())
    });
}

criterion_group!(benches, bench_codec, bench_query_drivers);
criterion_main!(benches);
