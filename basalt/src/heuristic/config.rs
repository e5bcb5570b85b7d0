use anyhow::{ensure, Context};
use serde::Deserialize;

use crate::error::BasaltResult;

/// Match order of plan tree.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrder {
    /// Inputs are rewritten before their parent is tried.
    #[default]
    BottomUp,
    /// A node is rewritten before its inputs.
    TopDown,
}

/// Settings of [`crate::heuristic::HepOptimizer`].
///
/// Can be loaded from yaml, missing keys take their defaults:
/// ```yaml
/// match_order: bottom_up
/// max_iter_times: 100
/// max_node_retries: 16
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HepOptimizerConfig {
    pub match_order: MatchOrder,
    /// Max number of passes over the whole plan.
    pub max_iter_times: usize,
    /// Max number of rewrites applied to one node within a pass.
    pub max_node_retries: usize,
}

impl Default for HepOptimizerConfig {
    fn default() -> Self {
        Self {
            match_order: MatchOrder::BottomUp,
            max_iter_times: 100,
            max_node_retries: 16,
        }
    }
}

impl HepOptimizerConfig {
    pub fn from_yaml(yaml: &str) -> BasaltResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse optimizer config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BasaltResult<()> {
        ensure!(self.max_iter_times > 0, "max_iter_times must be positive");
        ensure!(self.max_node_retries > 0, "max_node_retries must be positive");
        Ok(())
    }
}
