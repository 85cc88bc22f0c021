//! Command-dispatch walkthrough: a fixed table of verbs routed through the
//! flattened radix tree, with hit/miss behaviour and tree statistics.
//!
//! Usage:
//!   cargo run --release --example route_dispatch

use flatradix::StaticRadixMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Get,
    Set,
    Del,
    Incr,
    Decr,
    Expire,
    Ttl,
    Keys,
    Scan,
    Ping,
    Info,
    Shutdown,
}

fn main() {
    let table: StaticRadixMap<&str, Command> = StaticRadixMap::new([
        ("GET", Command::Get),
        ("SET", Command::Set),
        ("DEL", Command::Del),
        ("INCR", Command::Incr),
        ("DECR", Command::Decr),
        ("EXPIRE", Command::Expire),
        ("TTL", Command::Ttl),
        ("KEYS", Command::Keys),
        ("SCAN", Command::Scan),
        ("PING", Command::Ping),
        ("INFO", Command::Info),
        ("SHUTDOWN", Command::Shutdown),
    ])
    .unwrap();

    println!("dispatch table: {} commands", table.len());
    println!("memory_used: {} bytes", table.memory_used());
    println!("average dispatch depth: {:.2}\n", table.average_depth());

    let inputs = [
        "GET", "SET", "INCR", "INC", "EXPIRE", "EXPIRES", "PING", "PONG", "", "SHUTDOWN",
    ];
    for input in inputs {
        match table.get(&input) {
            Some(cmd) => println!("{input:>10} -> {cmd:?}"),
            None => println!("{input:>10} -> unknown command"),
        }
    }

    // Positions follow construction order, so the table doubles as an
    // ordered command listing.
    println!("\nregistered commands:");
    for (verb, cmd) in table.iter() {
        println!("  {verb:<10} {cmd:?}");
    }
}
