use crate::plan::PlanNodeRef;
use crate::rules::{Captured, Captures, Pattern};

/// Matches a pattern against one plan node.
///
/// The pattern is anchored at the given node, the binding doesn't search the rest of the
/// tree. Walking the plan is the optimizer's job.
pub struct Binding<'a> {
    node: &'a PlanNodeRef,
    pattern: &'a Pattern,
}

impl<'a> Binding<'a> {
    pub fn new(node: &'a PlanNodeRef, pattern: &'a Pattern) -> Self {
        Self { node, pattern }
    }

    /// Returns captures of the match, or `None` if node doesn't match the pattern.
    pub fn next(self) -> Option<Captures> {
        let mut captures = Captures::new();
        if Self::bind(self.node, self.pattern, &mut captures) {
            Some(captures)
        } else {
            None
        }
    }

    fn bind(node: &PlanNodeRef, pattern: &Pattern, captures: &mut Captures) -> bool {
        if !(pattern.predict)(node.operator()) {
            return false;
        }

        if !pattern
            .predicates
            .iter()
            .all(|predicate| predicate(node.as_ref()))
        {
            return false;
        }

        for (name, extractor) in &pattern.extractors {
            match extractor(node.as_ref()) {
                Some(value) => captures.insert(*name, value),
                None => return false,
            }
        }

        if let Some(children) = &pattern.children {
            if node.inputs().len() != children.len() {
                return false;
            }

            for (input, child) in node.inputs().iter().zip(children) {
                if !Self::bind(input, child, captures) {
                    return false;
                }
            }
        }

        if let Some(name) = pattern.capture {
            captures.insert(name, Captured::Node(node.clone()));
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use datafusion_common::Column;
    use datafusion_expr::{col, lit};

    use crate::heuristic::Binding;
    use crate::operator::JoinType;
    use crate::operator::LogicalOperator::{
        LogicalFilter, LogicalJoin, LogicalLimit, LogicalProjection, LogicalScan,
    };
    use crate::plan::{LogicalPlanBuilder, PlanNode};
    use crate::rules::{any, Captured, Pattern};

    fn projection_columns(node: &PlanNode) -> Option<Captured> {
        node.operator()
            .as_logical_projection()
            .and_then(|p| p.column_references().ok())
            .map(Captured::Columns)
    }

    #[test]
    fn test_leaf_pattern_ignores_inputs() {
        let plan = LogicalPlanBuilder::scan("t1").limit(10).build();
        let pattern = Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)));

        let captures = Binding::new(plan.root(), &pattern).next().unwrap();
        assert!(captures.is_empty());
    }

    #[test]
    fn test_operator_kind_mismatch() {
        let plan = LogicalPlanBuilder::scan("t1").limit(10).build();
        let pattern = Pattern::new_leaf(|op| matches!(op, LogicalFilter(_)));

        assert!(Binding::new(plan.root(), &pattern).next().is_none());
    }

    #[test]
    fn test_child_pattern_mismatch() {
        let plan = LogicalPlanBuilder::scan("t1")
            .filter(col("a").gt(lit(1)))
            .limit(10)
            .build();
        let pattern = Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
            .with_input(Pattern::new_leaf(|op| matches!(op, LogicalScan(_))));

        assert!(Binding::new(plan.root(), &pattern).next().is_none());
    }

    #[test]
    fn test_number_of_inputs_must_match() {
        let right = LogicalPlanBuilder::scan("t2").build();
        let plan = LogicalPlanBuilder::scan("t1")
            .join(JoinType::Inner, col("t1.a").eq(col("t2.a")), right)
            .build();

        let one_input = Pattern::new_leaf(|op| matches!(op, LogicalJoin(_)))
            .with_input(Pattern::new_leaf(any));
        assert!(Binding::new(plan.root(), &one_input).next().is_none());

        let two_inputs = Pattern::new_leaf(|op| matches!(op, LogicalJoin(_)))
            .with_input(Pattern::new_leaf(any).captured_as("left"))
            .with_input(Pattern::new_leaf(any).captured_as("right"));
        let captures = Binding::new(plan.root(), &two_inputs).next().unwrap();
        assert!(Arc::ptr_eq(
            &plan.root().inputs()[0],
            captures.node("left").unwrap()
        ));
        assert!(Arc::ptr_eq(
            &plan.root().inputs()[1],
            captures.node("right").unwrap()
        ));
    }

    #[test]
    fn test_predicates_and_extractors() {
        let plan = LogicalPlanBuilder::scan("t1")
            .projection(vec![col("b"), col("a")])
            .build();

        let pattern = Pattern::new_leaf(|op| matches!(op, LogicalProjection(_)))
            .extract("columns", projection_columns)
            .captured_as("projection")
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalScan(_)))
                    .matching(|node| node.inputs().is_empty()),
            );

        let captures = Binding::new(plan.root(), &pattern).next().unwrap();
        assert_eq!(2, captures.len());
        assert_eq!(
            &[Column::from_name("a"), Column::from_name("b")][..],
            captures.columns("columns").unwrap()
        );
        assert!(Arc::ptr_eq(plan.root(), captures.node("projection").unwrap()));

        let rejecting = Pattern::new_leaf(|op| matches!(op, LogicalProjection(_)))
            .matching(|_| false);
        assert!(Binding::new(plan.root(), &rejecting).next().is_none());
    }

    #[test]
    fn test_matching_leaves_plan_untouched() {
        let plan = LogicalPlanBuilder::scan("t1")
            .projection(vec![col("a")])
            .build();
        let snapshot = plan.clone();
        let scan = plan.root().inputs()[0].clone();

        let pattern = Pattern::new_leaf(|op| matches!(op, LogicalProjection(_)))
            .extract("columns", projection_columns)
            .with_input(Pattern::new_leaf(any).captured_as("scan"));
        for _ in 0..2 {
            assert!(Binding::new(plan.root(), &pattern).next().is_some());
        }

        assert_eq!(snapshot, plan);
        assert!(Arc::ptr_eq(&scan, &plan.root().inputs()[0]));
    }
}
