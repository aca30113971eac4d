//! Classification run metrics.
//!
//! `Classifier::run` discards these; `Classifier::run_with_metrics` keeps them
//! for the verbose API and the CLI report.

use std::time::Duration;

use super::post_match::Rounds;
use super::walker::DiscoveredPath;
use crate::FeatureParams;

/// Wall-clock time spent in each stage of one classification call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StageTimings {
    /// Layer probe, relabeling and attribute rules.
    pub preprocess: Duration,
    pub names: Duration,
    pub walk: Duration,
    /// Address fix-up and qualifier rounds.
    pub post_match: Duration,
    pub total: Duration,
}

/// Classifier output bundled with the trace of how it was reached.
#[derive(Debug, Clone)]
pub(crate) struct RunResult {
    pub params: FeatureParams,
    /// Every path the walker produced, including hidden ones.
    pub paths: Vec<DiscoveredPath>,
    pub rounds: Rounds,
    /// True when an entrance type was swapped for the address type.
    pub address_fixup: bool,
    pub timings: StageTimings,
}
