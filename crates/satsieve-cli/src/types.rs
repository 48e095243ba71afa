//! Shared types used across CLI commands and tests.

use serde::Serialize;

pub(crate) const STRESS_REPORT_SCHEMA_VERSION: &str = "1.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LogicChoice {
    Int,
    Real,
    Bv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SolverChoice {
    Cvc5,
    #[cfg(feature = "z3")]
    Z3,
}

#[derive(Serialize)]
pub(crate) struct StrategyReport {
    pub(crate) name: String,
    pub(crate) verdicts: Vec<String>,
    pub(crate) duration_ms: f64,
    pub(crate) agrees_with_baseline: bool,
}

#[derive(Serialize)]
pub(crate) struct TrialReport {
    pub(crate) trial: usize,
    pub(crate) candidates: usize,
    pub(crate) baseline: Vec<String>,
    pub(crate) baseline_duration_ms: f64,
    pub(crate) strategies: Vec<StrategyReport>,
    pub(crate) agreement: bool,
}

#[derive(Serialize)]
pub(crate) struct StressReport {
    pub(crate) schema_version: String,
    pub(crate) logic: String,
    pub(crate) solver: String,
    pub(crate) trials: usize,
    pub(crate) agreeing_trials: usize,
    pub(crate) disagreeing_trials: usize,
    pub(crate) trial_reports: Vec<TrialReport>,
}
