//! Contains logical relational operators such as scan, projection, filter, join, etc.
//!
//! The set of operators is closed: [`LogicalOperator`] is an enum, so rules match on variants
//! instead of inspecting types at runtime, and adding an operator makes the compiler point at
//! every place that needs to handle it.
mod logical;
pub use logical::*;
mod aggregate;
pub use aggregate::*;
mod filter;
pub use filter::*;
mod join;
pub use join::*;
mod limit;
pub use limit::*;
mod projection;
pub use projection::*;
mod sort;
pub use sort::*;
mod table_scan;
pub use table_scan::*;

use std::fmt::Formatter;

use enum_dispatch::enum_dispatch;

#[enum_dispatch(LogicalOperator)]
pub trait OperatorTrait {
    /// Number of inputs the operator consumes.
    fn arity(&self) -> usize;
}

/// Operator specific part of explain output.
#[enum_dispatch(LogicalOperator)]
pub trait DisplayFields {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result;
}
