use indexmap::{IndexMap, IndexSet};

use crate::resolve::extractor::extract_references;
use crate::resolve::index::{GroupKey, TargetIndex};
use crate::resolve::options::ResolveOptions;
use crate::style::owned_css::{DeclId, Stylesheet};

/// A group whose target property was found on a rule matching its selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub group: GroupKey,
    /// Declaration supplying the value. Read at commit time, not when bound.
    pub source: DeclId,
}

/// A group that takes a fallback literal instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackBinding {
    pub group: GroupKey,
    pub value: String,
}

/// All state of one transformation run. Built per call and dropped afterwards.
#[derive(Debug)]
pub struct ResolutionContext {
    pub index: TargetIndex,
    /// Resolved bindings in production order.
    pub resolved: Vec<ResolvedBinding>,
    /// Pending fallbacks, one per group, in first-production order.
    pub fallbacks: IndexMap<GroupKey, String>,
    /// Target selectors no rule has matched so far.
    pub unmatched: IndexSet<String>,
}

impl ResolutionContext {
    /// Run the extractor over `sheet` and start with every target unmatched.
    pub fn new(sheet: &Stylesheet, options: &ResolveOptions) -> Self {
        let index = extract_references(sheet, options);
        let unmatched = index.selectors().map(str::to_string).collect();
        ResolutionContext {
            index,
            resolved: Vec::new(),
            fallbacks: IndexMap::new(),
            unmatched,
        }
    }

    pub fn bind_resolved(&mut self, group: GroupKey, source: DeclId) {
        self.fallbacks.shift_remove(&group);
        self.resolved.push(ResolvedBinding { group, source });
    }

    pub fn bind_fallback(&mut self, group: GroupKey, value: String) {
        self.fallbacks.insert(group, value);
    }

    pub fn fallback_bindings(&self) -> impl Iterator<Item = FallbackBinding> + '_ {
        self.fallbacks.iter().map(|(group, value)| FallbackBinding {
            group: group.clone(),
            value: value.clone(),
        })
    }
}
