/// How far a fallback literal reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackScope {
    /// One fallback per target selector; the last one seen applies to every
    /// property referencing that selector.
    #[default]
    Selector,
    /// One fallback per (selector, property) pair.
    Property,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub fallback_scope: FallbackScope,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_scope(mut self, scope: FallbackScope) -> Self {
        self.fallback_scope = scope;
        self
    }
}
