use std::sync::Arc;

use datafusion_expr::Expr;

use crate::operator::{
    Aggregate, Filter, Join, JoinType, Limit, LogicalOperator, Projection, Sort, TableScan,
};
use crate::plan::{Plan, PlanNode, PlanNodeRef};

/// Builds a logical plan bottom up, starting from a scan.
///
/// ```
/// use basalt::plan::LogicalPlanBuilder;
/// use datafusion_expr::{col, lit};
///
/// let plan = LogicalPlanBuilder::scan("accounts")
///     .filter(col("age").gt(lit(30)))
///     .projection(vec![col("firstname"), col("age")])
///     .limit(10)
///     .build();
/// ```
pub struct LogicalPlanBuilder {
    root: PlanNodeRef,
}

impl LogicalPlanBuilder {
    pub fn scan<S: Into<String>>(table_name: S) -> Self {
        Self::from_scan(TableScan::new(table_name))
    }

    pub fn from_scan(scan: TableScan) -> Self {
        Self {
            root: Arc::new(PlanNode::new(scan.into(), vec![])),
        }
    }

    /// Continues building on top of an existing plan.
    pub fn from_plan(plan: Plan) -> Self {
        Self {
            root: plan.into_root(),
        }
    }

    fn push<O: Into<LogicalOperator>>(self, operator: O) -> Self {
        Self {
            root: Arc::new(PlanNode::new(operator.into(), vec![self.root])),
        }
    }

    pub fn projection<I: IntoIterator<Item = Expr>>(self, exprs: I) -> Self {
        self.push(Projection::new(exprs))
    }

    pub fn filter(self, predicate: Expr) -> Self {
        self.push(Filter::new(predicate))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.push(Limit::new(limit))
    }

    pub fn sort<I: IntoIterator<Item = Expr>>(self, exprs: I) -> Self {
        self.push(Sort::new(exprs))
    }

    pub fn aggregate<G, A>(self, group_expr: G, aggr_expr: A) -> Self
    where
        G: IntoIterator<Item = Expr>,
        A: IntoIterator<Item = Expr>,
    {
        self.push(Aggregate::new(group_expr, aggr_expr))
    }

    /// Joins current plan (left) with `right`.
    pub fn join(self, join_type: JoinType, condition: Expr, right: Plan) -> Self {
        let join = Join::new(join_type, condition);
        Self {
            root: Arc::new(PlanNode::new(
                join.into(),
                vec![self.root, right.into_root()],
            )),
        }
    }

    pub fn build(self) -> Plan {
        Plan::new(self.root)
    }
}
