// src/engine/pipeline.rs

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::engine::planning::{plan_features, FeaturePlan, GroupPlan};
use crate::engine::scenario_executor::{ScenarioExecutor, CANCELLED_DETAIL};
use crate::errors::Result;
use crate::metadata::FeatureInfo;
use crate::results::{FeatureResult, ScenarioResult, TestRunResult};
use crate::scenario::ScenarioCase;
use crate::types::ExecutionStatus;

/// Drives a run through its four levels: run, feature, scenario group and
/// scenario.
///
/// Every level starts its children as separate tokio tasks and only waits
/// for them at the join. A child's failure is visible only in its own
/// status; nothing propagates between levels except through aggregation.
#[derive(Clone)]
pub struct Orchestrator {
    scenarios: Arc<ScenarioExecutor>,
}

impl Orchestrator {
    pub fn new(scenarios: ScenarioExecutor) -> Self {
        Self {
            scenarios: Arc::new(scenarios),
        }
    }

    /// Execute every case and return the aggregated result.
    ///
    /// Only fails for problems detected before any scenario starts, such as
    /// ambiguous fixture or scenario keys.
    pub async fn execute(&self, cases: Vec<ScenarioCase>, cancel: CancellationToken) -> Result<TestRunResult> {
        let plans = plan_features(cases)?;
        let total: usize = plans.iter().map(FeaturePlan::case_count).sum();

        let start = self.scenarios.clock().now();
        self.scenarios.notifier().on_run_starting(start, total);
        info!(features = plans.len(), scenarios = total, "executing run");

        let handles: Vec<_> = plans
            .iter()
            .cloned()
            .map(|plan| {
                let this = self.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move { this.run_feature(plan, cancel).await })
            })
            .collect();

        let features = join_all(handles)
            .await
            .into_iter()
            .zip(plans.iter())
            .map(|(joined, plan)| match joined {
                Ok(feature) => feature,
                Err(err) => self.lost_feature(plan, &err),
            })
            .collect();

        let result = TestRunResult::new(features, self.scenarios.clock().now() - start);
        self.scenarios.notifier().on_run_finished(&result);
        Ok(result)
    }

    async fn run_feature(self, plan: FeaturePlan, cancel: CancellationToken) -> FeatureResult {
        let info = Arc::new(self.scenarios.metadata().feature_info(&plan.fixture));
        let start = self.scenarios.clock().now();
        self.scenarios.notifier().on_feature_starting(&info);
        debug!(feature = %info.name, groups = plan.groups.len(), "feature started");

        let scenarios = if cancel.is_cancelled() {
            self.not_started(&info, plan.cases())
        } else {
            let handles: Vec<_> = plan
                .groups
                .iter()
                .cloned()
                .map(|group| {
                    let this = self.clone();
                    let info = Arc::clone(&info);
                    let cancel = cancel.clone();
                    tokio::spawn(async move { this.run_group(info, group, cancel).await })
                })
                .collect();

            join_all(handles)
                .await
                .into_iter()
                .zip(plan.groups.iter())
                .flat_map(|(joined, group)| match joined {
                    Ok(results) => results,
                    Err(err) => self.lost_cases(&info, group.cases.iter(), &err),
                })
                .collect()
        };

        let result = FeatureResult::new(info, scenarios, self.scenarios.clock().now() - start);
        self.scenarios.notifier().on_feature_finished(&result);
        result
    }

    async fn run_group(self, feature: Arc<FeatureInfo>, group: GroupPlan, cancel: CancellationToken) -> Vec<ScenarioResult> {
        let notifier = self.scenarios.notifier();
        notifier.on_scenario_group_starting(&feature, &group.method, group.cases.len());

        let results: Vec<ScenarioResult> = if cancel.is_cancelled() {
            self.not_started(&feature, group.cases.iter())
        } else {
            let handles: Vec<_> = group
                .cases
                .iter()
                .cloned()
                .map(|case| {
                    let scenarios = Arc::clone(&self.scenarios);
                    let feature = Arc::clone(&feature);
                    let cancel = cancel.clone();
                    tokio::spawn(async move { scenarios.execute(&feature, case, &cancel).await })
                })
                .collect();

            join_all(handles)
                .await
                .into_iter()
                .zip(group.cases.iter())
                .map(|(joined, case)| match joined {
                    Ok(result) => result,
                    Err(err) => self.lost_case(&feature, case, &err),
                })
                .collect()
        };

        let status = ExecutionStatus::aggregate(results.iter().map(ScenarioResult::status));
        notifier.on_scenario_group_finished(&feature, &group.method, status);
        results
    }

    fn not_started<'a>(
        &self,
        feature: &Arc<FeatureInfo>,
        cases: impl Iterator<Item = &'a ScenarioCase>,
    ) -> Vec<ScenarioResult> {
        cases
            .map(|case| {
                let info = Arc::new(self.scenarios.metadata().scenario_info(feature, case));
                ScenarioResult::not_run(info, CANCELLED_DETAIL)
            })
            .collect()
    }

    /// A feature task died (runtime shutdown or a panic outside the
    /// scenario guard). Every case it owned is reported as failed so counts
    /// still match the input.
    fn lost_feature(&self, plan: &FeaturePlan, err: &JoinError) -> FeatureResult {
        let info = Arc::new(self.scenarios.metadata().feature_info(&plan.fixture));
        error!(feature = %info.name, error = %err, "feature task did not complete");
        let scenarios = self.lost_cases(&info, plan.cases(), err);
        let now = self.scenarios.clock().now();
        FeatureResult::new(info, scenarios, now - now)
    }

    fn lost_cases<'a>(
        &self,
        feature: &Arc<FeatureInfo>,
        cases: impl Iterator<Item = &'a ScenarioCase>,
        err: &JoinError,
    ) -> Vec<ScenarioResult> {
        cases.map(|case| self.lost_case(feature, case, err)).collect()
    }

    fn lost_case(&self, feature: &Arc<FeatureInfo>, case: &ScenarioCase, err: &JoinError) -> ScenarioResult {
        let info = Arc::new(self.scenarios.metadata().scenario_info(feature, case));
        error!(scenario = %info.name, error = %err, "scenario task did not complete");
        let now = self.scenarios.clock().now();
        ScenarioResult::failed_from(info, anyhow::anyhow!("scenario task did not complete: {err}"), now - now)
    }
}
