use std::sync::Arc;

use anyhow::ensure;
use smallvec::SmallVec;

use crate::error::{BasaltError, BasaltResult};
use crate::operator::{LogicalOperator, OperatorTrait};

mod builder;
pub use builder::*;
pub mod explain;

pub type PlanNodeRef = Arc<PlanNode>;

/// Inputs of a plan node. Most operators have one or two inputs.
pub type PlanInputs = SmallVec<[PlanNodeRef; 2]>;

/// One node in a plan.
///
/// A node owns its inputs and is never modified once created. Rewriting a plan creates new
/// nodes for the changed path and shares everything else with the original plan.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct PlanNode {
    operator: LogicalOperator,
    inputs: PlanInputs,
}

/// A logical query plan.
///
/// Equality is structural: two plans are equal if their trees have the same operators in
/// the same shape.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Plan {
    root: PlanNodeRef,
}

impl Plan {
    pub fn new(root: PlanNodeRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &PlanNodeRef {
        &self.root
    }

    pub fn into_root(self) -> PlanNodeRef {
        self.root
    }
}

impl From<PlanNodeRef> for Plan {
    fn from(root: PlanNodeRef) -> Self {
        Self::new(root)
    }
}

impl PlanNode {
    /// Creates a plan node without checking operator arity.
    ///
    /// Prefer [`PlanNode::try_new`] unless the number of inputs is known to be right.
    pub fn new<I>(operator: LogicalOperator, inputs: I) -> Self
    where
        I: IntoIterator<Item = PlanNodeRef>,
    {
        Self {
            operator,
            inputs: inputs.into_iter().collect(),
        }
    }

    pub fn try_new<I>(operator: LogicalOperator, inputs: I) -> BasaltResult<Self>
    where
        I: IntoIterator<Item = PlanNodeRef>,
    {
        let node = Self::new(operator, inputs);
        let expected = node.operator.arity();
        ensure!(
            node.inputs.len() == expected,
            BasaltError::InvalidInputs {
                operator: node.operator.as_ref().to_string(),
                expected,
                actual: node.inputs.len(),
            }
        );
        Ok(node)
    }

    pub fn operator(&self) -> &LogicalOperator {
        &self.operator
    }

    pub fn inputs(&self) -> &[PlanNodeRef] {
        &self.inputs
    }

    /// Number of nodes in the tree rooted at this node.
    pub fn node_count(&self) -> usize {
        1 + self
            .inputs
            .iter()
            .map(|input| input.node_count())
            .sum::<usize>()
    }

    /// Creates a node with same operator as this one, but with different inputs.
    pub fn clone_with_inputs<I>(&self, inputs: I) -> Self
    where
        I: IntoIterator<Item = PlanNodeRef>,
    {
        Self::new(self.operator.clone(), inputs)
    }
}
