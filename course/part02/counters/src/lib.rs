pub mod config;
pub mod counter;
pub mod demo;
pub mod error;
pub mod tracing_init;
