//! Node resolution.
//!
//! Saturation produces a `Stash` of `Node`s, which are unresolved parse results
//! containing a span (`Range`), a `Token` and child ids. Resolution turns each
//! node into an optional `(ResolvedValue, latent)` pair.
//!
//! The stash arena stores children before their parents, so a single walk in
//! id order is a bottom-up traversal: by the time a node is visited, every
//! child already has its outcome recorded.
//!
//! ```text
//! Node #0 <regex>   -> None (raw match, never blocks a parent)
//! Node #1 numeral   -> Some(Numeral 3)
//! Node #2 duration  -> children [#1, #0] resolved? -> per-dimension resolve
//! ```
//!
//! A child that carries a dimension and failed to resolve makes its parent fail
//! too, unless it is a `ComposeNeeded` building block (初五), which only has
//! meaning inside its parent. The per-dimension logic lives next to each rule
//! catalog and is reached through `rules::resolve_token`.

use crate::{Context, Hint, NodeId, Options, ResolvedValue, Stash};
use tracing::debug;

/// Outcome for one node: its value and whether that value is latent.
pub(crate) type Resolution = Option<(ResolvedValue, bool)>;

/// Resolve every node of `stash`, indexed by `NodeId`.
pub(crate) fn resolve_stash(stash: &Stash, context: &Context, options: &Options) -> Vec<Resolution> {
    let mut resolved: Vec<Resolution> = Vec::new();
    for (id, _) in stash.nodes() {
        let outcome = resolve_node(stash, &resolved, id, context, options);
        resolved.push(outcome);
    }
    resolved
}

fn resolve_node(stash: &Stash, done: &[Resolution], id: NodeId, context: &Context, options: &Options) -> Resolution {
    let node = stash.get(id);
    let dim = node.token.dim()?;

    let blocked = node.children.iter().any(|&child| {
        let child_node = stash.get(child);
        child_node.token.dim().is_some() && child_node.hint != Hint::ComposeNeeded && done[child].is_none()
    });
    if blocked {
        debug!(node = id, rule = node.rule_name, "child failed to resolve");
        return None;
    }

    let outcome = crate::rules::resolve_token(dim, &node.token, node.hint, context, options);
    debug!(node = id, rule = node.rule_name, range = ?node.range, value = ?outcome, "resolved");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_expr::{TimeData, TimeExpr};
    use crate::{Dimension, Node, NumeralData, Range, TimeValue, Token, TokenKind};
    use chrono::{FixedOffset, TimeZone};

    fn context() -> Context {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        Context::new(offset.with_ymd_and_hms(2016, 12, 8, 11, 30, 30).unwrap(), crate::Locale::ZhCn)
    }

    fn node(range: Range, kind: TokenKind, children: Vec<NodeId>) -> Node {
        Node { range, token: Token { kind }, rule_name: "test", hint: Hint::NoHint, children }
    }

    #[test]
    fn leaves_do_not_block_and_failures_propagate() {
        let mut stash = Stash::empty();
        let leaf = stash.intern_leaf(Range { start: 3, end: 6 }, vec!["点".into()]);
        let three = stash.insert(node(
            Range { start: 0, end: 3 },
            TokenKind::Numeral(NumeralData { value: 3.0, grain: None, multipliable: false }),
            vec![],
        ));
        // 2月30日 does not exist.
        let bad = stash.insert(node(
            Range { start: 0, end: 9 },
            TokenKind::Time(TimeData::new(TimeExpr::Date { year: None, month: Some(2), day: Some(30) })),
            vec![],
        ));
        let good_parent = stash.insert(node(
            Range { start: 0, end: 6 },
            TokenKind::Time(TimeData::new(TimeExpr::TimeOfDay {
                hour: 3,
                minute: None,
                second: None,
                ambiguous: true,
            })),
            vec![three, leaf],
        ));
        let bad_parent = stash.insert(node(
            Range { start: 0, end: 12 },
            TokenKind::Time(TimeData::new(TimeExpr::Reference)),
            vec![bad, leaf],
        ));

        let out = resolve_stash(&stash, &context(), &crate::Options::all());
        assert!(out[leaf].is_none());
        assert!(out[three].is_some());
        assert!(out[bad].is_none());
        assert!(out[good_parent].is_some());
        assert!(out[bad_parent].is_none());
    }

    #[test]
    fn compose_needed_children_do_not_block_their_parent() {
        let lunar = |month, day| TokenKind::Time(TimeData::new(TimeExpr::Lunar { year: None, month, day, leap: false }));
        let mut stash = Stash::empty();
        let march = stash.insert(node(
            Range { start: 0, end: 6 },
            TokenKind::Time(TimeData::new(TimeExpr::Date { year: None, month: Some(3), day: None })),
            vec![],
        ));
        let mut bare_day = node(Range { start: 6, end: 12 }, lunar(0, 5), vec![]);
        bare_day.hint = Hint::ComposeNeeded;
        let bare_day = stash.insert(bare_day);
        let mut composed = node(Range { start: 0, end: 12 }, lunar(3, 5), vec![march, bare_day]);
        composed.hint = Hint::Lunar;
        let composed = stash.insert(composed);

        let out = resolve_stash(&stash, &context(), &crate::Options::all());
        assert!(out[bare_day].is_none());
        let Some((ResolvedValue::Time(TimeValue::Instant { value, .. }), false)) = &out[composed] else {
            panic!("expected a resolved lunar date, got {:?}", out[composed]);
        };
        assert_eq!(value.date_naive(), chrono::NaiveDate::from_ymd_opt(2017, 4, 1).unwrap());
    }

    #[test]
    fn lunar_day_is_emitted_once_composed() {
        let answers = crate::analyze("三月初五", &context(), &crate::Options::only([Dimension::Time])).unwrap();
        assert_eq!(answers.len(), 1, "{answers:?}");
        assert_eq!(answers[0].text, "三月初五");
        assert_eq!(answers[0].hint, Hint::Lunar);
    }

    #[test]
    fn out_of_range_values_resolve_to_nothing() {
        let options = crate::Options::only([Dimension::Time, Dimension::Ordinal]);
        for input in ["99999999999999999999个月后", "一亿亿亿亿亿亿年后", "第99999999999999999999"] {
            let answers = crate::analyze(input, &context(), &options).unwrap();
            assert!(answers.iter().all(|a| a.text != input), "{input}: {answers:?}");
        }
    }
}
