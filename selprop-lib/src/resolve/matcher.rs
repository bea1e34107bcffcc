//! Rule matching and binding production.
//!
//! One pass over the rules in document order. Each rule is checked against
//! every target selector in the index and yields resolved or fallback
//! bindings into the [`ResolutionContext`].

use indexmap::IndexSet;
use log::debug;
use std::collections::HashMap;

use crate::resolve::context::ResolutionContext;
use crate::resolve::index::{GroupKey, TargetIndex};
use crate::style::owned_css::{DeclId, Rule, Stylesheet};

/// Component selectors of `rule` that are targets in `index`.
pub fn matched_targets<'r>(rule: &'r Rule, index: &TargetIndex) -> IndexSet<&'r str> {
    rule.selectors()
        .filter(|selector| index.contains(selector))
        .collect()
}

/// property -> declaration id for one rule. A repeated property keeps its last declaration.
pub fn property_lookup(rule_idx: usize, rule: &Rule) -> HashMap<&str, DeclId> {
    rule.declarations
        .iter()
        .enumerate()
        .map(|(decl_idx, decl)| {
            (
                decl.property.as_str(),
                DeclId {
                    rule: rule_idx,
                    decl: decl_idx,
                },
            )
        })
        .collect()
}

/// Visit every rule once, in document order.
pub fn match_rules(sheet: &Stylesheet, ctx: &mut ResolutionContext) {
    if ctx.index.is_empty() {
        return;
    }
    for (rule_idx, rule) in sheet.rules.iter().enumerate() {
        visit_rule(rule_idx, rule, ctx);
    }
}

fn visit_rule(rule_idx: usize, rule: &Rule, ctx: &mut ResolutionContext) {
    let matched = matched_targets(rule, &ctx.index);
    let lookup = property_lookup(rule_idx, rule);

    let mut resolved = Vec::new();
    let mut fallbacks = Vec::new();

    for (selector, entry) in ctx.index.targets() {
        if matched.contains(selector) {
            for property in entry.properties.keys() {
                let group = GroupKey::new(selector, property);
                if let Some(&source) = lookup.get(property.as_str()) {
                    debug!("{} resolved by `{}`", group, rule.selector);
                    resolved.push((group, source));
                } else if let Some(fallback) = ctx.index.fallback_for(selector, property) {
                    debug!("{} missing on `{}`, using fallback", group, rule.selector);
                    fallbacks.push((group, fallback.to_string()));
                }
            }
        } else {
            for property in entry.properties.keys() {
                if let Some(fallback) = ctx.index.fallback_for(selector, property) {
                    fallbacks.push((GroupKey::new(selector, property), fallback.to_string()));
                }
            }
        }
    }

    for (group, value) in fallbacks {
        ctx.bind_fallback(group, value);
    }
    for (group, source) in resolved {
        ctx.bind_resolved(group, source);
    }
    for selector in matched {
        ctx.unmatched.shift_remove(selector);
    }
}
