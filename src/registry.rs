//! The rule registry.
//!
//! A [`RuleRegistry`] owns every rule of one locale, grouped by the dimension
//! whose catalog it came from, plus the compiled bucket index the parser
//! selects from. It is built once and only read afterwards, so a single
//! registry can serve any number of concurrent `analyze` calls.

use crate::engine::CompiledRules;
use crate::{Dimension, Locale, Rule};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use tracing::debug;

static ZH_CN: Lazy<RuleRegistry> = Lazy::new(|| RuleRegistry::new(Locale::ZhCn));

/// Immutable, per-locale collection of rules.
#[derive(Debug)]
pub struct RuleRegistry {
    locale: Locale,
    rules: Vec<Rule>,
    /// Owning dimension of `rules[i]`.
    owners: Vec<Dimension>,
    compiled: CompiledRules,
}

impl RuleRegistry {
    /// Build the full registry for `locale` from every dimension's catalog.
    pub fn new(locale: Locale) -> Self {
        let catalogs = crate::rules::DISPATCH.iter().map(|entry| (entry.dim, (entry.rules)())).collect();
        Self::from_rules(locale, catalogs)
    }

    /// Build a registry holding only the catalogs of `dims` and of every
    /// dimension they depend on.
    ///
    /// ```
    /// use mingri::{Dimension, Locale, RuleRegistry};
    ///
    /// let registry = RuleRegistry::for_dimensions(Locale::ZhCn, [Dimension::Currency]);
    /// assert!(registry.dimensions().contains(&Dimension::Numeral));
    /// assert!(!registry.dimensions().contains(&Dimension::Time));
    /// ```
    pub fn for_dimensions(locale: Locale, dims: impl IntoIterator<Item = Dimension>) -> Self {
        let wanted = dependency_closure(dims);
        let catalogs = crate::rules::DISPATCH
            .iter()
            .filter(|entry| wanted.contains(&entry.dim))
            .map(|entry| (entry.dim, (entry.rules)()))
            .collect();
        Self::from_rules(locale, catalogs)
    }

    /// The process-wide registry for `locale`, built on first use.
    pub fn for_locale(locale: Locale) -> &'static RuleRegistry {
        match locale {
            Locale::ZhCn => &ZH_CN,
        }
    }

    /// Build a registry from explicit catalogs. Tests use this to run the
    /// engine against a handful of rules.
    pub(crate) fn from_rules(locale: Locale, catalogs: Vec<(Dimension, Vec<Rule>)>) -> Self {
        let mut rules = Vec::new();
        let mut owners = Vec::new();
        for (dim, catalog) in catalogs {
            owners.extend(std::iter::repeat_n(dim, catalog.len()));
            rules.extend(catalog);
        }
        let compiled = CompiledRules::new(&rules, &owners);
        debug!(%locale, rules = rules.len(), "rule registry built");
        RuleRegistry { locale, rules, owners, compiled }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Dimensions that own at least one rule.
    pub fn dimensions(&self) -> BTreeSet<Dimension> {
        self.owners.iter().copied().collect()
    }

    /// `requested` plus every dimension they transitively depend on.
    ///
    /// Only rules of these dimensions run during saturation.
    pub fn schedule(&self, requested: &BTreeSet<Dimension>) -> BTreeSet<Dimension> {
        dependency_closure(requested.iter().copied())
    }

    pub(crate) fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn compiled(&self) -> &CompiledRules {
        &self.compiled
    }
}

fn dependency_closure(requested: impl IntoIterator<Item = Dimension>) -> BTreeSet<Dimension> {
    let mut closed = BTreeSet::new();
    let mut pending: Vec<Dimension> = requested.into_iter().collect();
    while let Some(dim) = pending.pop() {
        if closed.insert(dim) {
            pending.extend(dim.dependencies().iter().copied());
        }
    }
    closed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_closes_over_dependencies() {
        let registry = RuleRegistry::from_rules(Locale::ZhCn, Vec::new());
        let scheduled = registry.schedule(&BTreeSet::from([Dimension::Time]));
        assert_eq!(scheduled, BTreeSet::from([Dimension::Time, Dimension::Duration, Dimension::Numeral]));

        let phone = registry.schedule(&BTreeSet::from([Dimension::PhoneNumber]));
        assert_eq!(phone, BTreeSet::from([Dimension::PhoneNumber]));
    }

    #[test]
    fn full_registry_covers_every_dimension() {
        let registry = RuleRegistry::for_locale(Locale::ZhCn);
        assert_eq!(registry.locale(), Locale::ZhCn);
        assert!(!registry.is_empty());
        assert_eq!(registry.dimensions(), Dimension::all().iter().copied().collect());
        assert_eq!(registry.compiled().metas.len(), registry.rule_count());
    }

    #[test]
    fn subset_registry_keeps_dependencies_only() {
        let registry = RuleRegistry::for_dimensions(Locale::ZhCn, [Dimension::Repeat]);
        assert_eq!(
            registry.dimensions(),
            BTreeSet::from([Dimension::Time, Dimension::Duration, Dimension::Repeat, Dimension::Numeral])
        );
        assert!(registry.rule_count() < RuleRegistry::for_locale(Locale::ZhCn).rule_count());
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleRegistry>();
    }
}
