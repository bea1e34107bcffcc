//! Cross-selector `ref(<selector>, <property>[, <fallback>])` resolution.
//!
//! The pipeline runs once per call: extract references into a target index,
//! match rules against it in document order, then commit the winning
//! bindings in dependency order.

pub mod committer;
pub mod context;
pub mod extractor;
pub mod index;
pub mod matcher;
pub mod options;

use log::info;

use crate::error::ResolveResult;
use crate::style::owned_css::Stylesheet;

pub use committer::ResolveReport;
pub use context::ResolutionContext;
pub use options::{FallbackScope, ResolveOptions};

/// Replace every resolvable `ref(...)` token in `sheet` in place.
///
/// On error the sheet is left exactly as it was passed in.
pub fn resolve_references(
    sheet: &mut Stylesheet,
    options: &ResolveOptions,
) -> ResolveResult<ResolveReport> {
    let mut ctx = ResolutionContext::new(sheet, options);
    if ctx.index.is_empty() {
        return Ok(ResolveReport::default());
    }
    matcher::match_rules(sheet, &mut ctx);
    let report = committer::commit(sheet, ctx)?;
    info!(
        "resolved {} reference(s), {} from fallbacks, {} left as is",
        report.resolved, report.fallbacks, report.untouched
    );
    Ok(report)
}
