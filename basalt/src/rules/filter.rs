use std::sync::Arc;

use anyhow::bail;

use crate::error::BasaltResult;
use crate::operator::LogicalOperator::{LogicalFilter, LogicalScan};
use crate::operator::{Filter, LogicalOperator};
use crate::plan::{PlanNode, PlanNodeRef};
use crate::rules::RuleId::{MergeFilter, PushFilterToTableScan};
use crate::rules::{Captured, Captures, Pattern, Rule, RuleId};

const INNER_FILTER: &str = "inner_filter";
const PREDICATE: &str = "predicate";
const TABLE_SCAN: &str = "table_scan";

#[rustfmt::skip::macros(lazy_static)]
lazy_static! {
    static ref MERGE_FILTER_RULE_PATTERN: Pattern = {
        Pattern::new_leaf(|op| matches!(op, LogicalFilter(_)))
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalFilter(_)))
                    .captured_as(INNER_FILTER))
    };
    static ref PUSH_FILTER_TO_TABLE_SCAN_PATTERN: Pattern = {
        Pattern::new_leaf(|op| matches!(op, LogicalFilter(_)))
            .extract(PREDICATE, |node| {
                node.operator()
                    .as_logical_filter()
                    .map(|filter| Captured::from(filter.predicate().clone()))
            })
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalScan(_)))
                    .matching(|node| {
                        matches!(node.operator(), LogicalScan(scan) if scan.limit().is_none())
                    })
                    .captured_as(TABLE_SCAN))
    };
}

/// Merges two adjacent filters into one with conjunction of both predicates.
#[derive(Clone, Default)]
pub struct MergeFilterRule {}

impl MergeFilterRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for MergeFilterRule {
    fn apply(&self, node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef> {
        let inner_node = captures.node(INNER_FILTER)?;
        if let (LogicalFilter(outer), LogicalFilter(inner)) =
            (node.operator(), inner_node.operator())
        {
            let predicate = inner.predicate().clone().and(outer.predicate().clone());
            let merged = PlanNode::try_new(
                LogicalOperator::from(Filter::new(predicate)),
                inner_node.inputs().iter().cloned(),
            )?;
            Ok(Arc::new(merged))
        } else {
            bail!("Pattern miss matched")
        }
    }

    fn pattern(&self) -> &Pattern {
        &MERGE_FILTER_RULE_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        MergeFilter
    }
}

/// Pushes a filter into the scan below it, so the backend filters documents.
///
/// Scans with a pushed limit are left alone: filtering the first `n` rows is not the same as
/// taking the first `n` rows that pass the filter.
#[derive(Clone, Default)]
pub struct PushFilterToTableScanRule {}

impl PushFilterToTableScanRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for PushFilterToTableScanRule {
    fn apply(&self, _node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef> {
        let predicate = captures.expr(PREDICATE)?;
        let scan_node = captures.node(TABLE_SCAN)?;
        if let LogicalScan(scan) = scan_node.operator() {
            let new_scan = scan.with_filter(predicate.clone());
            Ok(Arc::new(PlanNode::try_new(LogicalScan(new_scan), vec![])?))
        } else {
            bail!("Pattern miss matched!")
        }
    }

    fn pattern(&self) -> &Pattern {
        &PUSH_FILTER_TO_TABLE_SCAN_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        PushFilterToTableScan
    }
}
