//! Benchmarks for automaton search and enumeration

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use libahocorasick::Automaton;

const WORDS: [&str; 12] = [
    "he", "she", "his", "hers", "ushers", "sheriff", "heir", "shore", "horse", "rose", "hose",
    "sure",
];

fn haystack() -> Vec<u8> {
    "ushers sheriff shore horse rose hose sure heir "
        .repeat(2_000)
        .into_bytes()
}

fn small_automaton() -> Automaton<usize> {
    let mut automaton = Automaton::new();
    for (i, word) in WORDS.iter().enumerate() {
        automaton.add_word(*word, i).unwrap();
    }
    automaton.make_automaton();
    automaton
}

fn bench_search_bytes(c: &mut Criterion) {
    let automaton = small_automaton();
    let text = haystack();

    c.bench_function("search_12_patterns", |b| {
        b.iter(|| automaton.iter(black_box(&text)).unwrap().count())
    });
}

fn bench_search_chars(c: &mut Criterion) {
    let mut automaton = Automaton::new();
    for (i, word) in WORDS.iter().enumerate() {
        let units: Vec<char> = word.chars().collect();
        automaton.add_word(&units, i).unwrap();
    }
    automaton.make_automaton();
    let text: Vec<char> = String::from_utf8(haystack()).unwrap().chars().collect();

    c.bench_function("search_12_patterns_char_units", |b| {
        b.iter(|| automaton.iter(black_box(&text)).unwrap().count())
    });
}

fn bench_many_patterns(c: &mut Criterion) {
    let mut automaton = Automaton::new();
    for i in 0..10_000 {
        automaton.add_word(format!("key_{i}"), i).unwrap();
    }
    automaton.make_automaton();
    let text = (0..2_000).map(|i| format!("key_{} ", i * 7)).collect::<String>();

    c.bench_function("search_10000_patterns", |b| {
        b.iter(|| automaton.iter_str(black_box(&text)).unwrap().count())
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let mut automaton = Automaton::new();
    for i in 0..10_000 {
        automaton.add_word(format!("key_{i}"), i).unwrap();
    }

    c.bench_function("items_10000_keys", |b| b.iter(|| automaton.items().count()));
}

criterion_group!(
    benches,
    bench_search_bytes,
    bench_search_chars,
    bench_many_patterns,
    bench_enumerate
);
criterion_main!(benches);
