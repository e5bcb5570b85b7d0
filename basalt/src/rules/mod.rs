//! Optimization rules.
//!
//! A rule defines an equivalent transformation of a query plan which is assumed to be better
//! than the original plan, for example, [`PushProjectToTableScanRule`] which narrows the fields
//! a scan fetches to the ones its projection needs.
//!
//! ## Pattern
//!
//! A patten defines what sub plan the rule should operate on. With pattern definition, the
//! rule can avoid manipulating plan directly. This has several advantages:
//!
//! 1. Decouple rule and optimizer implementation. The optimizer decides where and how often
//! rules are tried, the rule only describes shape and replacement.
//! 2. Decouple rule application and iteration. This significantly simplifies rule
//! implementation, since rule should only care about defining equivalent transformations.
//!
//! Let use the [`RemoveLimitRule`] to illustrate, its pattern is defined as following:
//! ```no
//! static ref REMOVE_LIMIT_RULE_PATTERN: Pattern = {
//!     Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
//!         .with_input(
//!             Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
//!                 .captured_as(INPUT))
//! };
//! ```
//!
//! When the pattern matches a node, the optimizer passes the node and the [`Captures`] of the
//! match to [`Rule::apply`], which returns the replacement:
//!```no
//!      Limit(10)                              Limit(5)
//!          |                                     |
//!          |            RemoveLimitRule          |
//!      Limit(5)           -------->             Scan
//!          |
//!          |
//!        Scan
//! ```
//!
//! Rules hold no state. Everything a rewrite needs comes from the matched node and its
//! captures, so one rule set can be shared by concurrent optimizations.
mod capture;
pub use capture::*;
mod pattern;
pub use pattern::*;
mod filter;
pub use filter::*;
mod limit;
pub use limit::*;
mod project;
pub use project::*;
mod custom;
pub use custom::*;

use std::fmt::{Debug, Formatter};

use enum_dispatch::enum_dispatch;
use enumset::EnumSetType;
use std::convert::AsRef;
use strum_macros::AsRefStr;

use crate::error::BasaltResult;
use crate::plan::PlanNodeRef;

/// A rule should only focus on providing equivalent transformations of plan nodes.
#[enum_dispatch(RuleImpl)]
pub trait Rule {
    /// Produces the replacement of `node`.
    ///
    /// Only called after [`Rule::pattern`] matched `node`, with the captures of that match.
    fn apply(&self, node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef>;

    /// Pattern for rule.
    fn pattern(&self) -> &Pattern;

    /// Use to identify each rule.
    fn rule_id(&self) -> RuleId;
}

#[enum_dispatch]
#[derive(Clone, AsRefStr)]
pub enum RuleImpl {
    MergeFilterRule,
    PushFilterToTableScanRule,
    RemoveLimitRule,
    PushLimitOverProjectionRule,
    PushLimitToTableScanRule,
    PushProjectToTableScanRule,
    CustomRule,
}

#[derive(EnumSetType, Debug)]
pub enum RuleId {
    MergeFilter,
    PushFilterToTableScan,
    RemoveLimit,
    PushLimitOverProjection,
    PushLimitToTableScan,
    PushProjectToTableScan,
    /// Any rule registered through [`CustomRule`].
    Custom,
}

impl Debug for RuleImpl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleImpl::CustomRule(rule) => write!(f, "{:?}", rule.name()),
            _ => write!(f, "{:?}", self.as_ref()),
        }
    }
}
