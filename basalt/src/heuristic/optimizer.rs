use std::sync::Arc;

use anyhow::Context;
use enumset::EnumSet;
use log::{debug, trace, warn};

use crate::error::BasaltResult;
use crate::heuristic::{Binding, HepOptimizerConfig, MatchOrder};
use crate::plan::{Plan, PlanInputs, PlanNodeRef};
use crate::rules::{Rule, RuleId, RuleImpl};

/// Rule based optimizer.
///
/// The optimizer only holds its configuration and rules, and never modifies them while
/// optimizing. One instance can be shared by concurrent optimizations.
pub struct HepOptimizer {
    config: HepOptimizerConfig,
    rules: Vec<RuleImpl>,
}

/// Result of [`HepOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeSummary {
    pub plan: Plan,
    /// Number of passes over the plan.
    pub iterations: usize,
    /// Number of rewrites applied.
    pub rules_applied: usize,
    /// Rules applied at least once.
    pub fired: EnumSet<RuleId>,
    /// Whether last pass made no change. `false` means optimizer stopped at
    /// `max_iter_times`, or a pass spent its rewrite budget.
    pub fixed_point: bool,
    /// Number of times a node was left as is after `max_node_retries` rewrites while a rule
    /// would still change it.
    pub capped_nodes: usize,
}

/// Bookkeeping of one pass.
struct PassState {
    /// Rewrites allowed in this pass.
    budget: usize,
    rewrites: usize,
    capped_nodes: usize,
    fired: EnumSet<RuleId>,
    exhausted: bool,
}

impl PassState {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            rewrites: 0,
            capped_nodes: 0,
            fired: EnumSet::new(),
            exhausted: false,
        }
    }
}

impl HepOptimizer {
    pub fn new(config: HepOptimizerConfig, rules: Vec<RuleImpl>) -> BasaltResult<Self> {
        config.validate()?;
        Ok(Self { config, rules })
    }

    pub fn builder() -> HepOptimizerBuilder {
        HepOptimizerBuilder::default()
    }

    pub fn config(&self) -> &HepOptimizerConfig {
        &self.config
    }

    pub fn rules(&self) -> &[RuleImpl] {
        &self.rules
    }

    /// Entry point to drive optimization process.
    pub fn find_best_plan(&self, plan: &Plan) -> BasaltResult<Plan> {
        Ok(self.optimize(plan)?.plan)
    }

    /// Applies rules to `plan` until it no longer changes or `max_iter_times` passes are done.
    ///
    /// A pass may rewrite at most `max_node_retries` times the number of nodes in `plan`.
    /// Rules that keep growing the plan run into this budget, and optimization stops with the
    /// plan built so far.
    ///
    /// `plan` itself is left as is, sub trees not touched by any rule are shared between input
    /// and output.
    pub fn optimize(&self, plan: &Plan) -> BasaltResult<OptimizeSummary> {
        let budget = self
            .config
            .max_node_retries
            .saturating_mul(plan.root().node_count());
        let mut root = plan.root().clone();
        let mut iterations = 0;
        let mut rules_applied = 0;
        let mut capped_nodes = 0;
        let mut fired = EnumSet::new();
        let mut fixed_point = false;

        while iterations < self.config.max_iter_times {
            iterations += 1;
            let mut pass = PassState::new(budget);
            root = self.rewrite(&root, &mut pass)?;
            capped_nodes += pass.capped_nodes;

            if pass.rewrites == 0 {
                fixed_point = true;
                break;
            }
            debug!(
                "Optimizer pass {} applied {} rewrites",
                iterations, pass.rewrites
            );
            rules_applied += pass.rewrites;
            fired |= pass.fired;

            if pass.exhausted {
                warn!(
                    "Optimizer pass {} spent its budget of {} rewrites",
                    iterations, budget
                );
                break;
            }
        }

        if !fixed_point {
            warn!(
                "Optimizer stopped after {} passes without reaching fixed point, rules fired: {:?}",
                iterations, fired
            );
        }

        Ok(OptimizeSummary {
            plan: Plan::new(root),
            iterations,
            rules_applied,
            fired,
            fixed_point,
            capped_nodes,
        })
    }

    fn rewrite(&self, node: &PlanNodeRef, pass: &mut PassState) -> BasaltResult<PlanNodeRef> {
        if pass.exhausted {
            return Ok(node.clone());
        }

        match self.config.match_order {
            MatchOrder::BottomUp => {
                let node = self.rewrite_inputs(node, pass)?;
                self.apply_rules(node, pass)
            }
            MatchOrder::TopDown => {
                let node = self.apply_rules(node.clone(), pass)?;
                self.rewrite_inputs(&node, pass)
            }
        }
    }

    fn rewrite_inputs(
        &self,
        node: &PlanNodeRef,
        pass: &mut PassState,
    ) -> BasaltResult<PlanNodeRef> {
        let inputs = node
            .inputs()
            .iter()
            .map(|input| self.rewrite(input, pass))
            .collect::<BasaltResult<PlanInputs>>()?;

        let unchanged = inputs
            .iter()
            .zip(node.inputs())
            .all(|(new_input, input)| Arc::ptr_eq(new_input, input));
        if unchanged {
            Ok(node.clone())
        } else {
            Ok(Arc::new(node.clone_with_inputs(inputs)))
        }
    }

    /// Rewrites `node` until no rule changes it, `max_node_retries` rewrites are done, or
    /// the pass runs out of budget.
    fn apply_rules(
        &self,
        mut node: PlanNodeRef,
        pass: &mut PassState,
    ) -> BasaltResult<PlanNodeRef> {
        let mut retries = 0;
        while let Some((rule_id, new_node)) = self.apply_first_rule(&node)? {
            if pass.rewrites >= pass.budget {
                pass.exhausted = true;
                return Ok(node);
            }
            if retries == self.config.max_node_retries {
                warn!(
                    "Stopped rewriting {} after {} consecutive rule applications",
                    node.operator(),
                    retries
                );
                pass.capped_nodes += 1;
                return Ok(node);
            }

            retries += 1;
            pass.rewrites += 1;
            pass.fired |= rule_id;
            node = new_node;
        }

        Ok(node)
    }

    /// Applies the first rule matching `node`.
    ///
    /// # Return
    ///
    /// The id of the rule and the replacement of `node`, or `None` if no rule changed it.
    fn apply_first_rule(
        &self,
        node: &PlanNodeRef,
    ) -> BasaltResult<Option<(RuleId, PlanNodeRef)>> {
        for rule in &self.rules {
            let captures = match Binding::new(node, rule.pattern()).next() {
                Some(captures) => captures,
                None => {
                    trace!("Skipped applying rule {:?} to {}", rule, node.operator());
                    continue;
                }
            };

            let new_node = rule
                .apply(node, &captures)
                .with_context(|| format!("Failed to apply rule {:?} to {}", rule, node.operator()))?;

            // No transformation generated.
            if new_node == *node {
                debug!("Rule {:?} returned {} unchanged", rule, node.operator());
                continue;
            }

            debug!(
                "Rule {:?} rewrites {} to {}",
                rule,
                node.operator(),
                new_node.operator()
            );
            return Ok(Some((rule.rule_id(), new_node)));
        }

        Ok(None)
    }
}

/// Builder of [`HepOptimizer`], rules are tried in the order they are added.
#[derive(Default)]
pub struct HepOptimizerBuilder {
    config: HepOptimizerConfig,
    rules: Vec<RuleImpl>,
}

impl HepOptimizerBuilder {
    pub fn with_config(mut self, config: HepOptimizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn match_order(mut self, match_order: MatchOrder) -> Self {
        self.config.match_order = match_order;
        self
    }

    pub fn max_iter_times(mut self, max_iter_times: usize) -> Self {
        self.config.max_iter_times = max_iter_times;
        self
    }

    pub fn max_node_retries(mut self, max_node_retries: usize) -> Self {
        self.config.max_node_retries = max_node_retries;
        self
    }

    pub fn add_rule<R: Into<RuleImpl>>(mut self, rule: R) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn add_rules(mut self, rules: impl IntoIterator<Item = RuleImpl>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn build(self) -> BasaltResult<HepOptimizer> {
        HepOptimizer::new(self.config, self.rules)
    }
}
