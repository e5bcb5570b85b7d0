use std::sync::Arc;

use crate::error::BasaltResult;
use crate::plan::PlanNodeRef;
use crate::rules::{Captures, Pattern, Rule, RuleId};

/// A rule defined outside this crate.
///
/// Wrapping it lets it be registered together with built-in rules, the optimizer treats it
/// the same way. Its [`Rule::rule_id`] is expected to be [`RuleId::Custom`].
#[derive(Clone)]
pub struct CustomRule {
    name: &'static str,
    inner: Arc<dyn Rule + Send + Sync>,
}

impl CustomRule {
    pub fn new<R>(name: &'static str, rule: R) -> Self
    where
        R: Rule + Send + Sync + 'static,
    {
        Self {
            name,
            inner: Arc::new(rule),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Rule for CustomRule {
    fn apply(&self, node: &PlanNodeRef, captures: &Captures) -> BasaltResult<PlanNodeRef> {
        self.inner.apply(node, captures)
    }

    fn pattern(&self) -> &Pattern {
        self.inner.pattern()
    }

    fn rule_id(&self) -> RuleId {
        self.inner.rule_id()
    }
}
