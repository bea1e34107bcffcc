//! Resolves `ref(<selector>, <property>[, <fallback>])` tokens in stylesheet
//! declaration values against the declarations of other rules in the same sheet.

pub mod error;
pub mod resolve;
pub mod selprop_generate;

pub mod style {
    pub mod loader;
    pub mod owned_css;
}

pub use error::{ResolveError, ResolveResult};
pub use resolve::{resolve_references, FallbackScope, ResolveOptions, ResolveReport};
pub use style::owned_css::{DeclId, Declaration, Rule, Stylesheet};
