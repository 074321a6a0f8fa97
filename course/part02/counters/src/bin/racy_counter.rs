//! Two threads bump a plain integer with no synchronisation. The printed
//! total is usually short of the expected count, and differs between runs.

use counters::{config::DemoConfig, demo, tracing_init};

fn main() -> anyhow::Result<()> {
    tracing_init::init()?;

    let config = DemoConfig::load()?;
    let report = demo::run_racy(&config)?;

    println!("{report}");
    Ok(())
}
