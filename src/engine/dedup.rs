//! Deduplication keys for saturation.
//!
//! Saturation works by repeatedly applying rules and adding newly produced
//! `Node`s to the stash. Without a *stable* deduplication strategy, the engine can:
//!
//! - Loop indefinitely (rules re-deriving the same results in different ways)
//! - Grow memory unbounded
//! - Produce non-deterministic output (depending on iteration order)
//!
//! This module defines `NodeKey`, a compact, hashable representation of a node
//! that is used by the parser to avoid re-adding equivalent nodes.
//!
//! ## What counts as “the same node”
//!
//! The key combines:
//!
//! - Span (`start`, `end`)
//! - Dimension (`dim`)
//! - Hint (`hint`)
//! - A dimension-specific `kind_key`
//!
//! The producing rule is *not* part of the key: two rules deriving the same
//! payload over the same span collapse to the first derivation. The hint is,
//! so that the ranker can still pick the best-hinted duplicate.
//!
//! ## Tradeoffs
//!
//! - Non-numeral payloads use their `Debug` representation as the key. This is
//!   not allocation-free, but `f64` fields rule out deriving `Hash` directly.

use crate::{Dimension, Hint, Node, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) dim: Option<Dimension>,
    pub(crate) hint: Hint,
    pub(crate) kind_key: NodeKindKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum NodeKindKey {
    /// Bits of the `f64` value plus the flags that change composition.
    Numeral(u64, Option<u32>, bool),
    Debug(String),
}

impl NodeKey {
    pub(crate) fn from_node(node: &Node) -> Self {
        let kind_key = match &node.token.kind {
            TokenKind::Numeral(d) => NodeKindKey::Numeral(d.value.to_bits(), d.grain, d.multipliable),
            other => NodeKindKey::Debug(format!("{other:?}")),
        };

        NodeKey { start: node.range.start, end: node.range.end, dim: node.token.dim(), hint: node.hint, kind_key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NumeralData, Range, Token};

    fn numeral(start: usize, end: usize, value: f64, rule_name: &'static str, hint: Hint) -> Node {
        Node {
            range: Range { start, end },
            token: Token { kind: TokenKind::Numeral(NumeralData { value, grain: None, multipliable: false }) },
            rule_name,
            hint,
            children: Vec::new(),
        }
    }

    #[test]
    fn rule_name_does_not_split_keys() {
        let a = NodeKey::from_node(&numeral(0, 3, 3.0, "integer (han)", Hint::NoHint));
        let b = NodeKey::from_node(&numeral(0, 3, 3.0, "integer (financial)", Hint::NoHint));
        assert_eq!(a, b);
    }

    #[test]
    fn span_value_and_hint_split_keys() {
        let base = NodeKey::from_node(&numeral(0, 3, 3.0, "r", Hint::NoHint));
        assert_ne!(base, NodeKey::from_node(&numeral(0, 6, 3.0, "r", Hint::NoHint)));
        assert_ne!(base, NodeKey::from_node(&numeral(0, 3, 4.0, "r", Hint::NoHint)));
        assert_ne!(base, NodeKey::from_node(&numeral(0, 3, 3.0, "r", Hint::FinalRule)));
    }
}
