use std::process::{Command, Output};

pub const EXPECTED: u64 = 2_000_000;

pub struct Run {
    pub value: u64,
    pub output: Output,
}

/// Runs one of the demo binaries with a clean environment and parses the
/// single line it prints.
pub fn run_bin(path: &str) -> Run {
    let output = Command::new(path)
        .env_remove("COUNTERS_WORKERS")
        .env_remove("COUNTERS_INCREMENTS")
        .env_remove("COUNTERS_ORDERING")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap_or_else(|err| panic!("failed to run {path:?}: {err}"));

    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout was not utf8");
    let mut lines = stdout.lines();
    let line = lines.next().expect("demo printed nothing");
    assert_eq!(None, lines.next(), "demo printed more than one line: {stdout:?}");

    let value = line
        .parse()
        .unwrap_or_else(|err| panic!("{line:?} is not a counter value: {err}"));

    Run { value, output }
}
