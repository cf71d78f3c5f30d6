//! Benchmarks for cleaning and masking throughput.
//!
//! Run with: cargo bench
//!
//! Input is synthetic German prose built from a fixed vocabulary with a
//! seeded RNG, so runs are comparable.

use aacorpus::annotate::RuleAnnotator;
use aacorpus::cleanup::{clean_text, CleanupOptions};
use aacorpus::posnoise::{compute_bitmask, parse_safe_patterns, reconstruct, BUNDLED_PATTERNS};
use aacorpus::{Annotator, ResourceCache};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SUBJECTS: &[&str] = &[
    "Der Müller",
    "Die alte Frau",
    "Ein Knabe",
    "Der Förster",
    "Sie",
    "Er",
];
const VERBS: &[&str] = &["ging", "sah", "fand", "verließ", "suchte", "erreichte"];
const OBJECTS: &[&str] = &[
    "den dunklen Wald",
    "das kleine Haus",
    "die Brücke am Fluss",
    "einen Brief",
    "den Hund im Garten",
];
const TAILS: &[&str] = &[
    "auf einmal",
    "nach und nach",
    "am Abend",
    "ohne ein Wort",
    "so dass es still wurde",
];

fn sentence(rng: &mut StdRng) -> String {
    let pick = |rng: &mut StdRng, words: &[&'static str]| *words.choose(rng).unwrap_or(&"");
    let end = if rng.gen_bool(0.8) { "." } else { "!" };
    format!(
        "{} {} {} {}{}",
        pick(rng, SUBJECTS),
        pick(rng, VERBS),
        pick(rng, OBJECTS),
        pick(rng, TAILS),
        end
    )
}

/// Creates raw text with `paragraph_count` paragraphs of about 40 words.
fn create_raw_text(paragraph_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let mut text = String::from("TITEL\n\nErstes Kapitel.\n\n");
    for _ in 0..paragraph_count {
        let lines: Vec<String> = (0..6).map(|_| sentence(&mut rng)).collect();
        text.push_str(&lines.join("\n"));
        text.push_str("\n\n");
    }
    text
}

/// Benchmark the full cleaning pipeline at various sizes.
fn bench_cleaning(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleaning");
    let annotator = RuleAnnotator::new();
    let options = CleanupOptions::default().with_max_total_chars(usize::MAX);

    for para_count in [10, 100, 500].iter() {
        let raw = create_raw_text(*para_count);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &raw, |b, raw| {
            b.iter(|| {
                let _ = clean_text(black_box(raw), &options, &annotator);
            });
        });
    }

    group.finish();
}

/// Benchmark masking, including annotation, on cleaned text.
fn bench_masking(c: &mut Criterion) {
    let mut group = c.benchmark_group("masking");
    let cache = ResourceCache::new();
    // Warm the cache so pattern parsing is not measured.
    let _ = cache.safe_patterns("rule-de");

    for para_count in [10, 100, 500].iter() {
        let text = create_raw_text(*para_count).replace('\n', " ");
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &text, |b, text| {
            b.iter(|| {
                let _ = aacorpus::posnoise(black_box(text), "rule-de", &cache);
            });
        });
    }

    group.finish();
}

/// Benchmark bitmask computation and reconstruction alone.
fn bench_bitmask(c: &mut Criterion) {
    let annotator = RuleAnnotator::new();
    let patterns = match parse_safe_patterns(BUNDLED_PATTERNS, &annotator) {
        Ok(patterns) => patterns,
        Err(_) => return,
    };
    let text = create_raw_text(200).replace('\n', " ");
    let tokens = match annotator.annotate(&text) {
        Ok(tokens) => tokens,
        Err(_) => return,
    };

    c.bench_function("compute_bitmask", |b| {
        b.iter(|| compute_bitmask(black_box(&tokens), &patterns));
    });

    let bitmask = compute_bitmask(&tokens, &patterns);
    c.bench_function("reconstruct", |b| {
        b.iter(|| {
            let _ = reconstruct(black_box(&text), &tokens, &bitmask);
        });
    });
}

criterion_group!(benches, bench_cleaning, bench_masking, bench_bitmask);
criterion_main!(benches);
