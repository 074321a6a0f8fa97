//! Runs a [`SharedCounter`] through its whole life: create it, hand it to a
//! set of scoped worker threads, join them all, then read the total.
//!
//! The phases are tracked in the type, so a demo can't be reported before its
//! workers are joined:
//!
//! `Demo<C, Initialized>` --run--> `Demo<C, Joined>` --report--> [`Report`]

use std::fmt;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::DemoConfig;
use crate::counter::{AtomicCounter, LockedCounter, RacyCounter, SharedCounter};
use crate::error::DemoError;

pub struct Initialized;
pub struct Joined;

pub struct Demo<C, S> {
    name: &'static str,
    counter: C,
    workers: usize,
    increments: usize,
    expected: u64,
    elapsed: Duration,
    _state: PhantomData<S>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub value: u64,
    pub expected: u64,
    pub elapsed: Duration,
}

impl Report {
    pub fn lost_updates(&self) -> u64 {
        self.expected.saturating_sub(self.value)
    }
}

/// Only the final value; this is the line the binaries print.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<C> Demo<C, Initialized>
where
    C: SharedCounter,
{
    pub fn new(name: &'static str, counter: C, config: &DemoConfig) -> Result<Self, DemoError> {
        config.validate()?;
        let expected = config.expected_total()?;

        info!(
            demo = name,
            workers = config.workers,
            increments = config.increments,
            "initialized"
        );

        Ok(Self {
            name,
            counter,
            workers: config.workers,
            increments: config.increments,
            expected,
            elapsed: Duration::ZERO,
            _state: PhantomData,
        })
    }

    /// Spawns every worker, then blocks until all of them are joined.
    pub fn run(self) -> Result<Demo<C, Joined>, DemoError> {
        info!(demo = self.name, "running");
        let start = Instant::now();

        let counter = &self.counter;
        let increments = self.increments;
        std::thread::scope(|s| {
            let handles = (0..self.workers)
                .map(|worker| {
                    s.spawn(move || {
                        debug!(worker, "worker started");
                        for _ in 0..increments {
                            counter.increment();
                        }
                        debug!(worker, "worker finished");
                    })
                })
                .collect::<Vec<_>>();

            // join everything before reporting a panic so no worker outlives the error
            let mut panicked = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(worker);
                }
            }

            match panicked {
                Some(worker) => Err(DemoError::WorkerPanicked { worker }),
                None => Ok(()),
            }
        })?;

        let elapsed = start.elapsed();
        info!(demo = self.name, ?elapsed, "joined");

        Ok(Demo {
            name: self.name,
            counter: self.counter,
            workers: self.workers,
            increments: self.increments,
            expected: self.expected,
            elapsed,
            _state: PhantomData,
        })
    }
}

impl<C> Demo<C, Joined>
where
    C: SharedCounter,
{
    pub fn report(self) -> Report {
        let report = Report {
            value: self.counter.value(),
            expected: self.expected,
            elapsed: self.elapsed,
        };

        info!(
            demo = self.name,
            value = report.value,
            expected = report.expected,
            lost_updates = report.lost_updates(),
            elapsed = ?report.elapsed,
            "reported"
        );
        if report.lost_updates() > 0 {
            warn!(
                demo = self.name,
                lost_updates = report.lost_updates(),
                "updates were lost to the race"
            );
        }

        report
    }
}

pub fn run_atomic(config: &DemoConfig) -> Result<Report, DemoError> {
    let counter = AtomicCounter::new(config.ordering);
    Ok(Demo::new("atomic", counter, config)?.run()?.report())
}

pub fn run_racy(config: &DemoConfig) -> Result<Report, DemoError> {
    Ok(Demo::new("racy", RacyCounter::new(), config)?.run()?.report())
}

pub fn run_locked(config: &DemoConfig) -> Result<Report, DemoError> {
    Ok(Demo::new("locked", LockedCounter::new(), config)?.run()?.report())
}
