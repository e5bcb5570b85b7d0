use anyhow::bail;
use std::cmp::min;
use std::sync::Arc;

use crate::error::BasaltResult;
use crate::operator::LogicalOperator::{LogicalLimit, LogicalProjection, LogicalScan};
use crate::operator::{Limit, LogicalOperator};
use crate::plan::{PlanNode, PlanNodeRef};
use crate::rules::RuleId::{PushLimitOverProjection, PushLimitToTableScan, RemoveLimit};
use crate::rules::{Captures, Pattern, Rule, RuleId};

const INPUT: &str = "input";

#[rustfmt::skip::macros(lazy_static)]
lazy_static! {
    static ref REMOVE_LIMIT_RULE_PATTERN: Pattern = {
        Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
                    .captured_as(INPUT))
    };
    static ref PUSH_LIMIT_OVER_PROJECTION_PATTERN: Pattern = {
        Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalProjection(_)))
                    .captured_as(INPUT))
    };
    static ref PUSH_LIMIT_TO_TABLE_SCAN_PATTERN: Pattern = {
        Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalScan(_)))
                    .captured_as(INPUT))
    };
}

/// Swaps a limit with the projection below it, so that the limit can reach the scan.
#[derive(Clone, Default)]
pub struct PushLimitOverProjectionRule {}

impl PushLimitOverProjectionRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for PushLimitOverProjectionRule {
    fn apply(&self, node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef> {
        let projection = captures.node(INPUT)?;

        let new_limit = Arc::new(node.clone_with_inputs(projection.inputs().iter().cloned()));
        Ok(Arc::new(projection.clone_with_inputs(vec![new_limit])))
    }

    fn pattern(&self) -> &Pattern {
        &PUSH_LIMIT_OVER_PROJECTION_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        PushLimitOverProjection
    }
}

/// Merges two adjacent limits, keeping the smaller one.
#[derive(Clone, Default)]
pub struct RemoveLimitRule {}

impl RemoveLimitRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for RemoveLimitRule {
    fn apply(&self, node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef> {
        let input = captures.node(INPUT)?;
        if let (LogicalLimit(limit1), LogicalLimit(limit2)) = (node.operator(), input.operator())
        {
            let new_limit = min(limit1.limit(), limit2.limit());

            let ret = PlanNode::try_new(
                LogicalOperator::from(Limit::new(new_limit)),
                input.inputs().iter().cloned(),
            )?;
            Ok(Arc::new(ret))
        } else {
            bail!("Pattern miss matched")
        }
    }

    fn pattern(&self) -> &Pattern {
        &REMOVE_LIMIT_RULE_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        RemoveLimit
    }
}

/// Pushes a limit into the scan below it.
#[derive(Clone, Default)]
pub struct PushLimitToTableScanRule {}

impl PushLimitToTableScanRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for PushLimitToTableScanRule {
    fn apply(&self, node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef> {
        let input = captures.node(INPUT)?;
        if let (LogicalLimit(limit), LogicalScan(scan)) = (node.operator(), input.operator()) {
            let ret = PlanNode::try_new(
                LogicalScan(scan.with_pushed_limit(limit.limit())),
                vec![],
            )?;
            Ok(Arc::new(ret))
        } else {
            bail!("Pattern miss matched!")
        }
    }

    fn pattern(&self) -> &Pattern {
        &PUSH_LIMIT_TO_TABLE_SCAN_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        PushLimitToTableScan
    }
}
