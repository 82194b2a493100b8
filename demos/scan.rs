//! Example: scanning files or stdin for a list of literal patterns.
//!
//! The first argument is a file with one pattern per line. Every following
//! argument is a file to scan; with none, stdin is scanned. Each match is
//! printed as `<source>:<byte offset>:<pattern>`.
//!
//! Run with: cargo run --example scan -- patterns.txt notes.txt
//!
//! Set `RUST_LOG=libahocorasick=debug` to see the automaton's own logging.

use std::error::Error;
use std::fs;
use std::io::{self, Read};

use libahocorasick::{Automaton, Value};
use tracing_subscriber::EnvFilter;

fn load_patterns(path: &str) -> Result<Automaton<String>, Box<dyn Error>> {
    let mut automaton = Automaton::new();
    for line in fs::read_to_string(path)?.lines() {
        let pattern = line.trim_end();
        if !pattern.is_empty() && !pattern.starts_with('#') {
            automaton.add_word(pattern, pattern.to_string())?;
        }
    }
    automaton.make_automaton();
    Ok(automaton)
}

fn scan(automaton: &Automaton<String>, source: &str, data: &[u8]) -> Result<usize, Box<dyn Error>> {
    let mut count = 0;
    for m in automaton.iter(data)? {
        let m = m?;
        if let Value::Object(pattern) = m.value {
            println!("{source}:{}:{pattern}", m.end - pattern.len());
            count += 1;
        }
    }
    Ok(count)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(pattern_file) = args.next() else {
        eprintln!("usage: scan <patterns> [files...]");
        std::process::exit(2);
    };
    let automaton = load_patterns(&pattern_file)?;
    let stats = automaton.stats();
    eprintln!(
        "{} patterns, {} nodes, longest {} bytes",
        stats.words_count, stats.nodes_count, stats.longest_word
    );

    let files: Vec<String> = args.collect();
    let mut total = 0;
    if files.is_empty() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        total += scan(&automaton, "-", &data)?;
    } else {
        for file in &files {
            total += scan(&automaton, file, &fs::read(file)?)?;
        }
    }
    eprintln!("{total} matches");
    Ok(())
}
