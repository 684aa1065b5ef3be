//! Top-level module for the character model.
//!
//! - Training from a corpus (`trainer`)
//! - The trained distribution table and its persistence (`table`)
//! - Per-history distributions and sampling (`distribution`)
//! - History padding, sliding window and length recovery (`history`)
//! - Text generation (`generator`)

/// Text generation from a trained table.
pub mod generator;

/// Ordered mapping from history to next-character distribution.
///
/// Built once by training, read-only afterwards; supports
/// binary persistence.
pub mod table;

/// Ordered `(character, probability)` list with inverse-CDF sampling.
pub mod distribution;

/// Sentinel padding, sliding history window and history length recovery.
pub mod history;

/// Corpus -> table training.
pub mod trainer;

/// Per-history transition counts used while training.
/// This module is not exposed publicly.
mod state;
