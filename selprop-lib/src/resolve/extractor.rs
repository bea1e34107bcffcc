//! Reference extraction.
//!
//! Scans every declaration value once for a `ref(<selector>, <property>[, <fallback>])`
//! token and registers what it finds in the [`TargetIndex`].

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolve::index::TargetIndex;
use crate::resolve::options::ResolveOptions;
use crate::style::owned_css::{DeclId, Stylesheet};

/// Placeholder for the owning rule's full selector text.
pub const LOCAL_SELECTOR: char = '&';

static REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ref\(([^,]*),([^),]*)(?:,([^)]*))?\)").expect("ref() pattern is valid")
});

/// One `ref(...)` token found in a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub target_selector: String,
    pub target_property: String,
    pub fallback: Option<String>,
    /// The exact token text, replaced in place at commit time.
    pub token: String,
    pub source_declaration: DeclId,
}

/// Parse the first `ref(...)` token of `value`. `owner_selector` replaces `&`.
pub fn parse_reference(value: &str, owner_selector: &str, id: DeclId) -> Option<Reference> {
    let caps = REF_RE.captures(value)?;
    let token = caps.get(0)?.as_str().to_string();
    let target_selector = caps[1].trim().replace(LOCAL_SELECTOR, owner_selector);
    let target_property = caps[2].trim().to_string();
    let fallback = caps
        .get(3)
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Some(Reference {
        target_selector,
        target_property,
        fallback,
        token,
        source_declaration: id,
    })
}

/// Walk every declaration and build the index of referenced targets.
pub fn extract_references(sheet: &Stylesheet, options: &ResolveOptions) -> TargetIndex {
    let mut index = TargetIndex::new(options.fallback_scope);
    for (id, decl) in sheet.declarations() {
        let owner = &sheet.owner(id).selector;
        if let Some(reference) = parse_reference(&decl.value, owner, id) {
            debug!(
                "{} {{ {} }} references {} / {}",
                owner, decl.property, reference.target_selector, reference.target_property
            );
            index.register(reference);
        }
    }
    index
}
