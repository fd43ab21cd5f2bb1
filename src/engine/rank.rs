//! Ranking and selection.
//!
//! From the resolved forest, pick a minimal set of non-overlapping answers.
//!
//! ```text
//! resolved nodes ── candidates() ──▶ eligible, duplicate-free candidates
//!                                        │
//!                                        ▼
//!                                   select() ── greedy by rank ──▶ answers
//! ```
//!
//! Eligibility: the node belongs to a requested dimension, resolved to a value,
//! is not latent (unless latent results were asked for) and is not a
//! composition-only building block.
//!
//! Rank order, best first:
//!
//! 1. `FinalRule` hint
//! 2. longer span, counted in characters
//! 3. dimension declaration order
//! 4. earlier start, then higher hint priority, then lower node id

use super::metrics::Candidate;
use super::resolve::Resolution;
use crate::{Hint, Options, Stash};
use std::cmp::Reverse;
use tracing::debug;

/// Eligible resolved nodes, with same-dimension/same-span/same-value
/// duplicates collapsed onto the best-hinted one.
pub(crate) fn candidates(stash: &Stash, resolutions: &[Resolution], options: &Options) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::new();

    for (id, node) in stash.produced() {
        let Some(dim) = node.token.dim() else { continue };
        if !options.dimensions.contains(&dim) || node.hint == Hint::ComposeNeeded {
            continue;
        }
        let Some((value, latent)) = &resolutions[id] else { continue };
        if *latent && !options.include_latent {
            continue;
        }

        let duplicate = out.iter().position(|c| {
            let other = stash.get(c.node);
            other.range == node.range && other.token.dim() == Some(dim) && c.value == *value
        });
        match duplicate {
            Some(idx) => {
                if node.hint.priority() > stash.get(out[idx].node).hint.priority() {
                    out[idx] = Candidate { node: id, value: value.clone(), latent: *latent };
                }
            }
            None => out.push(Candidate { node: id, value: value.clone(), latent: *latent }),
        }
    }

    out
}

/// Greedily accept candidates in rank order, skipping anything that overlaps
/// an accepted one, and return the winners sorted by span.
///
/// `text` is the analyzed input; node ranges are byte offsets into it.
pub(crate) fn select(text: &str, stash: &Stash, candidates: &[Candidate]) -> Vec<Candidate> {
    let mut order: Vec<&Candidate> = candidates.iter().collect();
    order.sort_by_cached_key(|c| {
        let node = stash.get(c.node);
        let chars = text.get(node.range.start..node.range.end).map_or(0, |slice| slice.chars().count());
        (
            Reverse(node.hint == Hint::FinalRule),
            Reverse(chars),
            node.token.dim(),
            node.range.start,
            Reverse(node.hint.priority()),
            c.node,
        )
    });

    let mut winners: Vec<Candidate> = Vec::new();
    for candidate in order {
        let range = stash.get(candidate.node).range;
        if winners.iter().any(|w| stash.get(w.node).range.overlaps(&range)) {
            continue;
        }
        debug!(node = candidate.node, rule = stash.get(candidate.node).rule_name, ?range, "accepted");
        winners.push(candidate.clone());
    }

    // Subsumption: nothing may sit strictly inside another winner.
    let ranges: Vec<_> = winners.iter().map(|w| stash.get(w.node).range).collect();
    winners.retain(|w| {
        let range = stash.get(w.node).range;
        !ranges.iter().any(|other| other.strictly_contains(&range))
    });

    winners.sort_by_key(|w| {
        let range = stash.get(w.node).range;
        (range.start, range.end)
    });
    winners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dimension, Node, NumeralData, Range, ResolvedValue, Token, TokenKind};

    const TEXT: &str = "0123456789";

    fn numeral_node(start: usize, end: usize, value: f64, hint: Hint) -> Node {
        Node {
            range: Range { start, end },
            token: Token { kind: TokenKind::Numeral(NumeralData { value, grain: None, multipliable: false }) },
            rule_name: "test",
            hint,
            children: Vec::new(),
        }
    }

    fn resolved(value: f64, latent: bool) -> Resolution {
        Some((ResolvedValue::Numeral { value }, latent))
    }

    fn options() -> Options {
        Options::only([Dimension::Numeral])
    }

    #[test]
    fn longer_span_wins_overlap() {
        let mut stash = Stash::empty();
        let short = stash.insert(numeral_node(0, 3, 3.0, Hint::NoHint));
        let long = stash.insert(numeral_node(0, 9, 3000.0, Hint::NoHint));
        let resolutions = vec![resolved(3.0, false), resolved(3000.0, false)];

        let found = candidates(&stash, &resolutions, &options());
        let winners = select(TEXT, &stash, &found);
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].node, long);
        assert_ne!(winners[0].node, short);
    }

    #[test]
    fn span_length_counts_characters_not_bytes() {
        // 三四五 is 9 bytes and 3 chars; 五6789 is 7 bytes and 5 chars.
        let text = "三四五6789";
        let mut stash = Stash::empty();
        stash.insert(numeral_node(0, 9, 345.0, Hint::NoHint));
        let wider = stash.insert(numeral_node(6, 13, 56789.0, Hint::NoHint));
        let resolutions = vec![resolved(345.0, false), resolved(56789.0, false)];

        let winners = select(text, &stash, &candidates(&stash, &resolutions, &options()));
        assert_eq!(winners.iter().map(|w| w.node).collect::<Vec<_>>(), vec![wider]);
    }

    #[test]
    fn final_rule_beats_longer_span() {
        let mut stash = Stash::empty();
        let final_node = stash.insert(numeral_node(0, 3, 3.0, Hint::FinalRule));
        stash.insert(numeral_node(0, 9, 3000.0, Hint::NoHint));
        let resolutions = vec![resolved(3.0, false), resolved(3000.0, false)];

        let winners = select(TEXT, &stash, &candidates(&stash, &resolutions, &options()));
        assert_eq!(winners.iter().map(|w| w.node).collect::<Vec<_>>(), vec![final_node]);
    }

    #[test]
    fn duplicates_keep_highest_priority_hint() {
        let mut stash = Stash::empty();
        stash.insert(numeral_node(0, 3, 3.0, Hint::NoHint));
        let better = stash.insert(numeral_node(0, 3, 3.0, Hint::Intersect));
        let resolutions = vec![resolved(3.0, false), resolved(3.0, false)];

        let found = candidates(&stash, &resolutions, &options());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node, better);
    }

    #[test]
    fn latent_and_compose_needed_are_filtered() {
        let mut stash = Stash::empty();
        stash.insert(numeral_node(0, 3, 3.0, Hint::ComposeNeeded));
        let latent = stash.insert(numeral_node(3, 6, 4.0, Hint::NoHint));
        let resolutions = vec![resolved(3.0, false), resolved(4.0, true)];

        assert!(candidates(&stash, &resolutions, &options()).is_empty());
        let with_latent = candidates(&stash, &resolutions, &options().with_latent(true));
        assert_eq!(with_latent.iter().map(|c| c.node).collect::<Vec<_>>(), vec![latent]);
    }

    #[test]
    fn winners_are_sorted_by_start() {
        let mut stash = Stash::empty();
        let second = stash.insert(numeral_node(6, 9, 5.0, Hint::NoHint));
        let first = stash.insert(numeral_node(0, 6, 12.0, Hint::NoHint));
        let resolutions = vec![resolved(5.0, false), resolved(12.0, false)];

        let winners = select(TEXT, &stash, &candidates(&stash, &resolutions, &options()));
        assert_eq!(winners.iter().map(|w| w.node).collect::<Vec<_>>(), vec![first, second]);
    }
}
