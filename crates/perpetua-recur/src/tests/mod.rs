//! Cross-module test suites for the recurrence engine.

mod bounds;
mod dst;
