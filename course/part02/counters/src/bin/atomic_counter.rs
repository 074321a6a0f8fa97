//! Two threads bump a shared atomic integer; always prints the exact total.

use counters::{config::DemoConfig, demo, tracing_init};

fn main() -> anyhow::Result<()> {
    tracing_init::init()?;

    let config = DemoConfig::load()?;
    let report = demo::run_atomic(&config)?;

    println!("{report}");
    Ok(())
}
