use indexmap::IndexMap;
use std::fmt;

use crate::resolve::extractor::Reference;
use crate::resolve::options::FallbackScope;

/// Identifies one group of referencing declarations: everything that asked
/// for `property` on `selector`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub selector: String,
    pub property: String,
}

impl GroupKey {
    pub fn new(selector: &str, property: &str) -> Self {
        GroupKey {
            selector: selector.to_string(),
            property: property.to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref({}, {})", self.selector, self.property)
    }
}

/// Everything recorded for one target selector.
#[derive(Debug, Default)]
pub struct TargetEntry {
    /// target property -> referencing declarations, in extraction order.
    pub properties: IndexMap<String, Vec<Reference>>,
    /// Last fallback literal seen for this selector.
    pub fallback: Option<String>,
    /// Last fallback literal seen per property. Only read under `FallbackScope::Property`.
    property_fallbacks: IndexMap<String, String>,
}

/// target selector -> target property -> referencing declarations.
#[derive(Debug)]
pub struct TargetIndex {
    scope: FallbackScope,
    targets: IndexMap<String, TargetEntry>,
}

impl TargetIndex {
    pub fn new(scope: FallbackScope) -> Self {
        TargetIndex {
            scope,
            targets: IndexMap::new(),
        }
    }

    pub fn register(&mut self, reference: Reference) {
        let entry = self
            .targets
            .entry(reference.target_selector.clone())
            .or_default();
        if let Some(fallback) = &reference.fallback {
            entry.fallback = Some(fallback.clone());
            entry
                .property_fallbacks
                .insert(reference.target_property.clone(), fallback.clone());
        }
        entry
            .properties
            .entry(reference.target_property.clone())
            .or_default()
            .push(reference);
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.targets.contains_key(selector)
    }

    /// Target selectors in first-reference order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn targets(&self) -> impl Iterator<Item = (&str, &TargetEntry)> {
        self.targets.iter().map(|(sel, entry)| (sel.as_str(), entry))
    }

    pub fn group(&self, selector: &str, property: &str) -> Option<&[Reference]> {
        self.targets
            .get(selector)?
            .properties
            .get(property)
            .map(Vec::as_slice)
    }

    /// Fallback literal for one group, honoring the configured scope.
    pub fn fallback_for(&self, selector: &str, property: &str) -> Option<&str> {
        let entry = self.targets.get(selector)?;
        match self.scope {
            FallbackScope::Selector => entry.fallback.as_deref(),
            FallbackScope::Property => entry.property_fallbacks.get(property).map(String::as_str),
        }
    }

    /// True when an unmatched `selector` can still be resolved through fallbacks
    /// for every property that references it.
    pub fn covered_by_fallback(&self, selector: &str) -> bool {
        match self.targets.get(selector) {
            Some(entry) => entry
                .properties
                .keys()
                .all(|property| self.fallback_for(selector, property).is_some()),
            None => false,
        }
    }
}
