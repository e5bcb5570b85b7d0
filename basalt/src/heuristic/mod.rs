//! Implementation of heuristic optimizer.
//!
//! Heuristic optimizer optimizes query plan by applying a batch of rewrite rules to query plan
//! until some condition is met, e.g. max number of iterations or reached fixed point. The
//! implementation is heavily inspired by [apache calcite](https://github.com/apache/calcite)'s
//! HepPlanner.
//!
//! Rules are tried in the order they are registered, and the first rule matching a node wins.
//! When two rules can match the same shape, the one registered first is applied.

mod binding;
pub use binding::*;
mod config;
pub use config::*;
mod optimizer;
pub use optimizer::*;
