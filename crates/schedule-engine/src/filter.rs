//! Category/language predicate applied to definitions before expansion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::event::EventDefinition;

/// Which definitions take part in resolution.
///
/// Empty `categories` or `languages` sets disable that predicate entirely.
/// The two `include_*` flags decide what happens to definitions that lack
/// the attribute when the corresponding set is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub include_uncategorized: bool,
    pub include_language_unset: bool,
}

impl FilterCriteria {
    /// Require one of these category tags.
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Require at least one of these language tags.
    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Let definitions without a category through a category filter.
    pub fn include_uncategorized(mut self, include: bool) -> Self {
        self.include_uncategorized = include;
        self
    }

    /// Let definitions without language tags through a language filter.
    pub fn include_language_unset(mut self, include: bool) -> Self {
        self.include_language_unset = include;
        self
    }
}

/// True when `definition` passes both the category and language predicates.
pub fn matches(definition: &EventDefinition, criteria: &FilterCriteria) -> bool {
    category_matches(definition, criteria) && language_matches(definition, criteria)
}

fn category_matches(definition: &EventDefinition, criteria: &FilterCriteria) -> bool {
    if criteria.categories.is_empty() {
        return true;
    }
    match &definition.category {
        None => criteria.include_uncategorized,
        Some(tag) => criteria.categories.contains(tag),
    }
}

fn language_matches(definition: &EventDefinition, criteria: &FilterCriteria) -> bool {
    if criteria.languages.is_empty() {
        return true;
    }
    if definition.languages.is_empty() {
        return criteria.include_language_unset;
    }
    definition
        .languages
        .iter()
        .any(|lang| criteria.languages.contains(lang))
}
