//! Recurrence engine for the Perpetua Flow backend.
//!
//! Parses recurrence-rule text (an RFC 5545 RECUR subset) and computes due
//! dates from a zoned series start: the next occurrence strictly after an
//! anchor moment, or a bounded range of occurrences. All calendar arithmetic
//! is performed in a named IANA zone so daylight-saving gaps and folds are
//! resolved deterministically.
//!
//! The engine is a pure, synchronous computation: no I/O, no ambient clock,
//! no shared mutable state. Zone data is the only injected dependency.

pub mod anchor;
pub mod error;
pub mod expand;
pub mod parse;
pub mod rule;
pub mod template;

#[cfg(test)]
mod tests;

pub use error::{EngineError, EngineResult};
