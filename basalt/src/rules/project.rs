use std::sync::Arc;

use anyhow::anyhow;
use log::debug;

use crate::error::BasaltResult;
use crate::operator::LogicalOperator::{LogicalProjection, LogicalScan};
use crate::plan::{PlanNode, PlanNodeRef};
use crate::rules::RuleId::PushProjectToTableScan;
use crate::rules::{Captured, Captures, Pattern, Rule, RuleId};

const PROJECT_COLUMNS: &str = "project_columns";
const TABLE_SCAN: &str = "table_scan";

#[rustfmt::skip::macros(lazy_static)]
lazy_static! {
    static ref PUSH_PROJECT_TO_TABLE_SCAN_PATTERN: Pattern = {
        Pattern::new_leaf(|op| matches!(op, LogicalProjection(_)))
            .extract(PROJECT_COLUMNS, project_columns)
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalScan(_)))
                    .matching(is_unprojected_scan)
                    .captured_as(TABLE_SCAN))
    };
}

/// Columns a projection needs from its input. Fails the match if there are none, since an
/// empty project list would read as "all fields" on the scan.
fn project_columns(node: &PlanNode) -> Option<Captured> {
    let projection = node.operator().as_logical_projection()?;
    match projection.column_references() {
        Ok(columns) if !columns.is_empty() => Some(Captured::Columns(columns)),
        Ok(_) => None,
        Err(e) => {
            debug!("Failed to collect column references of {}: {}", node.operator(), e);
            None
        }
    }
}

fn is_unprojected_scan(node: &PlanNode) -> bool {
    matches!(node.operator(), LogicalScan(scan) if !scan.has_projects())
}

/// Pushes the fields referenced by a projection into the scan below it.
///
/// ```no
///  Projection([a, b + 1])                 Projection([a, b + 1])
///          |                  -->                   |
///  Scan(t, projects: None)             Scan(t, projects: [a, b])
/// ```
///
/// The projection is kept since it may compute or rename. Once a scan has a project list,
/// the pattern no longer matches it, so the rule fires at most once per projection and scan.
#[derive(Clone, Default)]
pub struct PushProjectToTableScanRule {}

impl PushProjectToTableScanRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for PushProjectToTableScanRule {
    fn apply(&self, node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef> {
        let columns = captures.columns(PROJECT_COLUMNS)?;
        let scan_node = captures.node(TABLE_SCAN)?;
        let scan = scan_node
            .operator()
            .as_logical_scan()
            .ok_or_else(|| anyhow!("Pattern miss matched, {} is not a scan", scan_node.operator()))?;

        let new_scan = PlanNode::try_new(
            LogicalScan(scan.with_projects(columns.to_vec())?),
            scan_node.inputs().iter().cloned(),
        )?;

        Ok(Arc::new(node.clone_with_inputs(vec![Arc::new(new_scan)])))
    }

    fn pattern(&self) -> &Pattern {
        &PUSH_PROJECT_TO_TABLE_SCAN_PATTERN
    }

    fn rule_id(&self) -> RuleId {
        PushProjectToTableScan
    }
}
