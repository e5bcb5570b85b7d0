use crate::operator::LogicalOperator;
use crate::plan::PlanNode;
use crate::rules::Captured;

/// Matches the kind of an operator.
pub type OperatorMatcher = fn(&LogicalOperator) -> bool;
/// Value level predicate over a matched node.
pub type NodePredicate = fn(&PlanNode) -> bool;
/// Computes a value from a matched node. Returning `None` fails the match.
pub type NodeExtractor = fn(&PlanNode) -> Option<Captured>;

/// A pattern defines how to match a sub tree of a plan.
///
/// If we want to match `Projection(Scan)` where the scan has no project list, and remember
/// the scan for the rewrite, the pattern tree should be defined like:
/// ```
/// use basalt::operator::LogicalOperator::{LogicalProjection, LogicalScan};
/// use basalt::rules::Pattern;
///
/// Pattern::new_leaf(|op| matches!(op, LogicalProjection(_)))
///     .with_input(
///         Pattern::new_leaf(|op| matches!(op, LogicalScan(_)))
///             .matching(|node| {
///                 matches!(node.operator(), LogicalScan(scan) if !scan.has_projects())
///             })
///             .captured_as("scan"),
///     );
/// ```
///
/// Matchers, predicates and extractors are plain function pointers which receive the node by
/// shared reference. They can't keep state between matches, and they can't change the plan
/// under test.
pub struct Pattern {
    /// Matches against an operator.
    pub predict: OperatorMatcher,
    /// Additional checks on the matched node, all of them must hold.
    pub predicates: Vec<NodePredicate>,
    /// Values derived from the matched node, stored under the given capture names.
    pub extractors: Vec<(&'static str, NodeExtractor)>,
    /// Name to store the matched node under.
    pub capture: Option<&'static str>,
    /// `None` for leaf node, which matches regardless of inputs.
    pub children: Option<Vec<Pattern>>,
}

impl Pattern {
    pub fn new_leaf(matcher: OperatorMatcher) -> Pattern {
        Pattern {
            predict: matcher,
            predicates: vec![],
            extractors: vec![],
            capture: None,
            children: None,
        }
    }

    pub fn new<I: IntoIterator<Item = Pattern>>(
        matcher: OperatorMatcher,
        children: I,
    ) -> Pattern {
        let children = children.into_iter().collect::<Vec<Pattern>>();
        let children_pattern = if !children.is_empty() {
            Some(children)
        } else {
            None
        };

        Pattern {
            children: children_pattern,
            ..Pattern::new_leaf(matcher)
        }
    }

    pub fn matching(mut self, predicate: NodePredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn extract(mut self, name: &'static str, extractor: NodeExtractor) -> Self {
        self.extractors.push((name, extractor));
        self
    }

    pub fn captured_as(mut self, name: &'static str) -> Self {
        self.capture = Some(name);
        self
    }

    /// Appends a pattern for the next input of the matched node.
    pub fn with_input(mut self, input: Pattern) -> Self {
        self.children.get_or_insert_with(Vec::new).push(input);
        self
    }
}

pub fn any(_: &LogicalOperator) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use crate::operator::LogicalOperator::{LogicalJoin, LogicalLimit, LogicalScan};
    use crate::rules::{any, Pattern};

    #[test]
    fn test_pattern_tree() {
        let pattern = Pattern::new_leaf(|op| matches!(op, LogicalJoin(_)))
            .with_input(
                Pattern::new_leaf(|op| matches!(op, LogicalLimit(_)))
                    .with_input(Pattern::new_leaf(any)),
            )
            .with_input(Pattern::new_leaf(|op| matches!(op, LogicalScan(_))).captured_as("right"));

        let children = pattern.children.as_ref().unwrap();
        assert_eq!(2, children.len());
        assert_eq!(1, children[0].children.as_ref().unwrap().len());
        assert!(children[1].children.is_none());
        assert_eq!(Some("right"), children[1].capture);
    }

    #[test]
    fn test_pattern_without_children_is_leaf() {
        let pattern = Pattern::new(any, vec![]);
        assert!(pattern.children.is_none());
    }
}
