//! Parsing and resolution engine.
//!
//! The engine is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! rules (per dimension) ──┐
//!                         │  CompiledRules::new           (compiled_rules.rs)
//!                         └───────────────┬──────────────  once, in RuleRegistry
//!                                         │
//! input ── TriggerInfo::scan ─────────────┼─ select active rules
//!         (trigger.rs)                    │  (scheduled dims + buckets + phrases)
//!                                         v
//!                               Parser::saturate (parser.rs)
//!                                 - seed matches (regex-first)
//!                                 - iterate to fixpoint
//!                                 - add nodes to the stash arena
//!                                 - dedup via NodeKey (dedup.rs)
//!                                         │
//!                                         v
//!                               resolve_stash (resolve.rs)
//!                                 - bottom-up, per-dimension resolve
//!                                         │
//!                                         v
//!                               candidates + select (rank.rs)
//!                                 - eligibility, duplicate suppression
//!                                 - greedy non-overlapping selection
//!                                         │
//!                                         v
//!                                   Vec<Candidate>
//! ```
//!
//! The engine leans on **saturation**: repeatedly apply rules until an
//! iteration produces no new nodes. One rule can create nodes that enable
//! other rules, so composition needs no explicit ordering.
//!
//! ## Adding new rules / dimensions
//!
//! - New rules go under `src/rules/<dimension>/` and are picked up through the
//!   dimension's `rules()` function in `rules::DISPATCH`.
//! - If a new rule needs a new coarse trigger, add a `BucketMask` bit and
//!   teach `TriggerInfo::scan` and `CompiledRules::new` about it.
//! - A new dimension needs a `Dimension` variant, a `DimensionSet` bit and a
//!   `DISPATCH` entry with its resolver.
//!
//! ## Debugging
//!
//! Everything here logs through `tracing`; run the CLI with
//! `MINGRI_LOG=mingri=trace` to see rule activation and resolution.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/rank.rs"]
mod rank;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/trigger.rs"]
mod trigger;

pub(crate) use compiled_rules::{BucketMask, CompiledRules, DimensionSet};
pub(crate) use metrics::{Candidate, PassMetrics, RunResult};
pub(crate) use parser::Parser;
