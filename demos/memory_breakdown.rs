//! Measures real allocation cost of a StaticRadixMap against std maps.
//!
//! Usage:
//!   cargo run --release --example memory_breakdown [key_count]

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tikv_jemalloc_ctl::{epoch, stats};

use flatradix::StaticRadixMap;

#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn get_allocated() -> usize {
    epoch::advance().unwrap();
    stats::allocated::read().unwrap()
}

fn generate_keys(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("device/{}/sensor/{}/reading{}", i % 64, i % 977, i))
        .collect()
}

fn main() {
    let n: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(100_000);

    let keys = generate_keys(n);
    let raw_bytes: usize = keys.iter().map(|k| k.len()).sum();
    println!("{} keys, {:.2} MB raw key bytes\n", n, raw_bytes as f64 / 1_000_000.0);

    println!("=== StaticRadixMap<String, u64> ===");
    {
        let before = get_allocated();
        let start = Instant::now();
        let map: StaticRadixMap<String, u64> = StaticRadixMap::new(
            keys.iter().enumerate().map(|(i, k)| (k.clone(), i as u64)),
        )
        .unwrap();
        let build = start.elapsed();
        let alloc = get_allocated() - before;

        let start = Instant::now();
        let correct = keys
            .iter()
            .enumerate()
            .filter(|(i, k)| map.get(k.as_str()) == Some(&(*i as u64)))
            .count();
        let lookup = start.elapsed();

        println!("  build: {:.3}s, lookups: {:.0}/s", build.as_secs_f64(), n as f64 / lookup.as_secs_f64());
        println!("  jemalloc delta: {:.2} MB", alloc as f64 / 1_000_000.0);
        println!("  memory_used():  {:.2} MB", map.memory_used() as f64 / 1_000_000.0);
        println!("  average dispatch depth: {:.2}", map.average_depth());
        println!("  correctness: {}/{}\n", correct, n);
        drop(map);
    }
    let _ = get_allocated();

    println!("=== HashMap<String, u64> ===");
    {
        let before = get_allocated();
        let start = Instant::now();
        let map: HashMap<String, u64> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i as u64))
            .collect();
        let build = start.elapsed();
        let alloc = get_allocated() - before;

        let start = Instant::now();
        let correct = keys
            .iter()
            .enumerate()
            .filter(|(i, k)| map.get(k.as_str()) == Some(&(*i as u64)))
            .count();
        let lookup = start.elapsed();

        println!("  build: {:.3}s, lookups: {:.0}/s", build.as_secs_f64(), n as f64 / lookup.as_secs_f64());
        println!("  jemalloc delta: {:.2} MB", alloc as f64 / 1_000_000.0);
        println!("  correctness: {}/{}\n", correct, n);
        drop(map);
    }
    let _ = get_allocated();

    println!("=== BTreeMap<String, u64> ===");
    {
        let before = get_allocated();
        let start = Instant::now();
        let map: BTreeMap<String, u64> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i as u64))
            .collect();
        let build = start.elapsed();
        let alloc = get_allocated() - before;

        let start = Instant::now();
        let correct = keys
            .iter()
            .enumerate()
            .filter(|(i, k)| map.get(k.as_str()) == Some(&(*i as u64)))
            .count();
        let lookup = start.elapsed();

        println!("  build: {:.3}s, lookups: {:.0}/s", build.as_secs_f64(), n as f64 / lookup.as_secs_f64());
        println!("  jemalloc delta: {:.2} MB", alloc as f64 / 1_000_000.0);
        println!("  correctness: {}/{}", correct, n);
        drop(map);
    }
}
