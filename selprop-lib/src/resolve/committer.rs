//! Writing bindings back into the stylesheet.
//!
//! Nothing is written until every check passed: unmatched selectors and
//! reference cycles both abort the run with the sheet untouched.

use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashMap;

use crate::error::{ResolveError, ResolveResult};
use crate::resolve::context::ResolutionContext;
use crate::resolve::index::GroupKey;
use crate::style::owned_css::{DeclId, Stylesheet};

/// The single binding that wins for a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Resolved(DeclId),
    Fallback(String),
}

/// Counts of what a commit did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Declarations rewritten from another rule's value.
    pub resolved: usize,
    /// Declarations rewritten with a fallback literal.
    pub fallbacks: usize,
    /// Declarations whose token was left as is.
    pub untouched: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Check, order and apply the bindings collected in `ctx`.
pub fn commit(sheet: &mut Stylesheet, ctx: ResolutionContext) -> ResolveResult<ResolveReport> {
    let unresolved: Vec<String> = ctx
        .unmatched
        .iter()
        .filter(|selector| !ctx.index.covered_by_fallback(selector))
        .cloned()
        .collect();
    if !unresolved.is_empty() {
        return Err(ResolveError::unresolved(unresolved));
    }

    let bindings = effective_bindings(&ctx);
    let order = dependency_order(&ctx, &bindings)?;

    let mut report = ResolveReport::default();
    for group in &order {
        let replacement = match &bindings[group] {
            Binding::Resolved(source) => sheet.declaration(*source).value.clone(),
            Binding::Fallback(value) => value.clone(),
        };
        let references = ctx
            .index
            .group(&group.selector, &group.property)
            .unwrap_or_default();
        for reference in references {
            let decl = sheet.declaration_mut(reference.source_declaration);
            decl.value = decl.value.replacen(&reference.token, &replacement, 1);
        }
        debug!("{} -> {}", group, replacement);
        match bindings[group] {
            Binding::Resolved(_) => report.resolved += references.len(),
            Binding::Fallback(_) => report.fallbacks += references.len(),
        }
    }

    for (selector, entry) in ctx.index.targets() {
        for (property, references) in &entry.properties {
            let group = GroupKey::new(selector, property);
            if !bindings.contains_key(&group) {
                warn!("{} has no value and no fallback, left as is", group);
                report.untouched += references.len();
            }
        }
    }

    Ok(report)
}

/// Last resolved binding per group, then fallbacks for groups never resolved.
pub fn effective_bindings(ctx: &ResolutionContext) -> IndexMap<GroupKey, Binding> {
    let mut bindings = IndexMap::new();
    for binding in &ctx.resolved {
        bindings.insert(binding.group.clone(), Binding::Resolved(binding.source));
    }
    for fallback in ctx.fallback_bindings() {
        bindings
            .entry(fallback.group)
            .or_insert(Binding::Fallback(fallback.value));
    }
    bindings
}

/// Groups ordered so that every group comes after the group its source
/// declaration belongs to. Ties keep binding order.
pub fn dependency_order(
    ctx: &ResolutionContext,
    bindings: &IndexMap<GroupKey, Binding>,
) -> ResolveResult<Vec<GroupKey>> {
    let mut owner_group: HashMap<DeclId, GroupKey> = HashMap::new();
    for (selector, entry) in ctx.index.targets() {
        for (property, references) in &entry.properties {
            for reference in references {
                owner_group.insert(reference.source_declaration, GroupKey::new(selector, property));
            }
        }
    }

    let mut marks: HashMap<&GroupKey, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(bindings.len());

    for start in bindings.keys() {
        // Each group has at most one dependency, so the walk is a chain.
        let mut path: Vec<&GroupKey> = Vec::new();
        let mut current = Some(start);
        while let Some(group) = current {
            match marks.get(group) {
                Some(Mark::Done) => break,
                Some(Mark::Visiting) => {
                    let begin = path.iter().position(|g| *g == group).unwrap_or(0);
                    let mut chain: Vec<String> =
                        path[begin..].iter().map(|g| g.to_string()).collect();
                    chain.push(group.to_string());
                    return Err(ResolveError::cyclic(chain));
                }
                None => {
                    marks.insert(group, Mark::Visiting);
                    path.push(group);
                    current = depends_on(group, bindings, &owner_group);
                }
            }
        }
        while let Some(group) = path.pop() {
            marks.insert(group, Mark::Done);
            order.push(group.clone());
        }
    }

    Ok(order)
}

/// The bound group whose declaration supplies `group`'s value, if any.
fn depends_on<'a>(
    group: &GroupKey,
    bindings: &'a IndexMap<GroupKey, Binding>,
    owner_group: &'a HashMap<DeclId, GroupKey>,
) -> Option<&'a GroupKey> {
    match bindings.get(group)? {
        Binding::Resolved(source) => owner_group
            .get(source)
            .filter(|dep| bindings.contains_key(*dep)),
        Binding::Fallback(_) => None,
    }
}
