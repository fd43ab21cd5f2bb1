//! Engine run metrics.
//!
//! This module defines a small set of structs used to observe and debug engine
//! performance and behavior.
//!
//! The intended usage is:
//!
//! - `Parser::run` for normal operation.
//! - `Parser::run_with_metrics` for profiling, debugging regressions, and
//!   inspecting what a pass produced.
//!
//! Metrics are intentionally simple and *opt-in*: the hot path only records
//! node ids, and callers decide how much of each pass to render.

use crate::{NodeId, ResolvedValue, Stash};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Parser::run_with_metrics`](super::Parser::run_with_metrics).
    pub total: Duration,
    pub saturation: SaturationMetrics,
    /// Time spent resolving and ranking after saturation.
    pub resolve: Duration,
}

/// Timings for the saturation phase.
#[derive(Debug, Default, Clone)]
pub struct SaturationMetrics {
    /// Total elapsed time for saturation (initial regex pass + iterations).
    pub total: Duration,
    /// Metrics for the initial regex-only pass.
    pub initial_regex: PassMetrics,
    /// Metrics for each subsequent saturation iteration.
    pub iterations: Vec<PassMetrics>,
}

/// Timing (and node discovery counts) for a single pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    pub duration: Duration,
    /// Number of new nodes added to the stash during the pass.
    pub produced: usize,
    /// Ids of the nodes produced in this pass.
    pub nodes: Vec<NodeId>,
    /// Number of rules considered (attempted) during this pass.
    pub rules_considered: usize,
    /// Number of rules that had at least one first-pattern match.
    pub rules_seeded: usize,
}

/// A resolved node that survived filtering.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub node: NodeId,
    pub value: ResolvedValue,
    pub latent: bool,
}

/// Parser output bundled with timing information.
#[derive(Debug)]
pub(crate) struct RunResult {
    /// The saturated chart; candidates refer into it.
    pub stash: Stash,
    /// Every eligible resolved candidate, before ranking.
    pub candidates: Vec<Candidate>,
    /// Ranked, non-overlapping winners in span order.
    pub answers: Vec<Candidate>,
    /// Names of rules that were active for this input.
    pub active_rules: Vec<&'static str>,
    pub metrics: RunMetrics,
}
