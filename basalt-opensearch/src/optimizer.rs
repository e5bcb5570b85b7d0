use basalt::error::BasaltResult;
use basalt::heuristic::{HepOptimizer, HepOptimizerConfig};
use basalt::rules::{
    MergeFilterRule, PushFilterToTableScanRule, PushLimitOverProjectionRule,
    PushLimitToTableScanRule, PushProjectToTableScanRule, RemoveLimitRule, RuleImpl,
};

/// Rules pushing work into index scans, in the order they are tried.
///
/// Filters go first so that they reach the scan before a limit does, a scan with a pushed
/// limit no longer accepts filters.
pub fn opensearch_rules() -> Vec<RuleImpl> {
    vec![
        MergeFilterRule::new().into(),
        PushFilterToTableScanRule::new().into(),
        RemoveLimitRule::new().into(),
        PushLimitOverProjectionRule::new().into(),
        PushLimitToTableScanRule::new().into(),
        PushProjectToTableScanRule::new().into(),
    ]
}

pub fn opensearch_optimizer(config: HepOptimizerConfig) -> BasaltResult<HepOptimizer> {
    HepOptimizer::new(config, opensearch_rules())
}
