//! ## Background
//!
//! The query engine accepts an unoptimized logical query plan produced by the sql/ppl analyzer,
//! and hands an optimized logical plan to the physical planner, which lowers it into search
//! requests of a concrete backend. This crate implements the part in between: a rule based
//! optimizer.
//!
//! Rule based optimization is relative simple. We apply a collection of optimization rules to a
//! query plan repeatedly until some condition is met, for example, a fix point (plan no longer
//! changes) or number of times. The optimization rule is substitution rule, e.g. the optimizer
//! substitutes rule generated new plan for original plan, and in general the new plan should be
//! better than original plan. Typical rules push work down to the data source, for example,
//! narrowing the fields a scan fetches to the ones a projection actually references.
//!
//! ## Design
//!
//! * [`operator`] Logical relational operators.
//! * [`plan`] Immutable plan tree, builder and explain.
//! * [`rules`] Patterns, captures, optimization rule definition and implementation.
//! * [`heuristic`] Heuristic optimizer driving rules to a fix point.
//!
//! Plan nodes are never mutated after construction. A rewrite builds new nodes and shares
//! untouched sub trees with the input plan through [`std::sync::Arc`], so the same rule set
//! and optimizer can be used by many query compilations at the same time.
//!
//! ## Reference
//!
//! 1. Apache Calcite HepPlanner, https://github.com/apache/calcite
//! 2. Graefe, G., 1995. The cascades framework for query optimization. IEEE Data Eng. Bull., 18(3),
//! pp.19-29.

#[macro_use]
extern crate lazy_static;

pub use datafusion_common::Column;
pub use datafusion_expr::Expr;

pub mod error;
pub mod heuristic;
pub mod operator;
pub mod plan;
pub mod rules;
