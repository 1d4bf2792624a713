// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Usage:
//   demo_named_mutex hold <name> <hold_ms>
//   demo_named_mutex wait <name> <timeout_ms>
//
// `hold` acquires the mutex, prints "acquired", keeps it for <hold_ms>
// milliseconds, releases it and prints "released".
// `wait` waits up to <timeout_ms> (-1 = forever) and prints "true" or "false".
//
// Set RUST_LOG=named_mutex=debug to see lock transitions on stderr.

use std::io::{self, Write};
use std::process;
use std::thread;
use std::time::Duration;

use named_mutex::NamedMutex;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("usage: demo_named_mutex hold <name> <hold_ms>");
    eprintln!("       demo_named_mutex wait <name> <timeout_ms>");
    process::exit(1);
}

fn say(line: &str) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

fn do_hold(name: &str, hold_ms: u64) -> named_mutex::Result<()> {
    let mut mtx = NamedMutex::open_owned(true, name)?;
    let guard = mtx.lock()?;
    say("acquired");
    thread::sleep(Duration::from_millis(hold_ms));
    guard.unlock()?;
    say("released");
    mtx.close()
}

fn do_wait(name: &str, timeout_ms: i64) -> named_mutex::Result<()> {
    let mut mtx = NamedMutex::open(name)?;
    let owned = mtx.wait_one_timeout(timeout_ms)?;
    say(if owned { "true" } else { "false" });
    mtx.close()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        usage();
    }
    let name = args[2].as_str();

    let result = match args[1].as_str() {
        "hold" => match args[3].parse() {
            Ok(ms) => do_hold(name, ms),
            Err(_) => usage(),
        },
        "wait" => match args[3].parse() {
            Ok(ms) => do_wait(name, ms),
            Err(_) => usage(),
        },
        other => {
            eprintln!("unknown mode: {other}");
            usage();
        }
    };

    if let Err(e) = result {
        eprintln!("demo_named_mutex: {e}");
        process::exit(2);
    }
}
