use crate::error::ResolveResult;
use crate::resolve::{resolve_references, ResolveOptions};
use crate::style::loader;

pub mod selprop {
    use super::*;

    /// Load `css_content`, resolve its references and serialize the result.
    pub fn transform(css_content: &str, options: &ResolveOptions) -> ResolveResult<String> {
        let mut sheet = loader::parse_stylesheet(css_content)?;
        resolve_references(&mut sheet, options)?;
        Ok(sheet.to_string())
    }
}
