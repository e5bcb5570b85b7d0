#![allow(dead_code)]

use std::sync::Arc;

use basalt::heuristic::{HepOptimizer, MatchOrder};
use basalt::plan::explain::explain_to_string;
use basalt::plan::Plan;
use basalt::rules::{
    MergeFilterRule, PushFilterToTableScanRule, PushLimitOverProjectionRule,
    PushLimitToTableScanRule, PushProjectToTableScanRule, RemoveLimitRule, RuleImpl,
};

#[derive(Clone)]
pub struct TestCase {
    pub name: &'static str,
    pub plan: Plan,
    pub expected_optimized_plan: &'static str,
}

pub fn default_rules() -> Vec<RuleImpl> {
    vec![
        MergeFilterRule::new().into(),
        PushFilterToTableScanRule::new().into(),
        RemoveLimitRule::new().into(),
        PushLimitOverProjectionRule::new().into(),
        PushLimitToTableScanRule::new().into(),
        PushProjectToTableScanRule::new().into(),
    ]
}

pub fn default_optimizer(match_order: MatchOrder) -> Arc<HepOptimizer> {
    Arc::new(
        HepOptimizer::builder()
            .match_order(match_order)
            .add_rules(default_rules())
            .build()
            .unwrap(),
    )
}

pub struct TestCaseRunner {
    pub optimizer: Arc<HepOptimizer>,
}

impl TestCaseRunner {
    pub fn run(&self, test_cases: Vec<TestCase>) {
        for test_case in test_cases {
            let optimized_plan = self.optimizer.find_best_plan(&test_case.plan).unwrap();
            let optimized_plan_string = explain_to_string(&optimized_plan).unwrap();

            assert_eq!(
                test_case.expected_optimized_plan, optimized_plan_string,
                "Optimized plan of case {} is different.",
                test_case.name
            );
        }
    }
}
