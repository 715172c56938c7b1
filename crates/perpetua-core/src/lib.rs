//! Shared foundation for the Perpetua Flow backend crates.
//!
//! Holds the pieces every other crate needs without pulling in heavy
//! dependencies: configuration loading, the core error type, tracing
//! initialization, and engine-wide constants.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
