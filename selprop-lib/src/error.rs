use thiserror::Error;

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// Selectors named by `ref(...)` that no rule declares and no fallback covers.
    #[error("Unresolved selectors: {}", quote_list(.selectors))]
    UnresolvedSelector { selectors: Vec<String> },

    /// References that (transitively) depend on themselves.
    #[error("Cyclic reference: {}", .chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("Failed to parse stylesheet: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    pub fn unresolved(selectors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::UnresolvedSelector {
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cyclic(chain: Vec<String>) -> Self {
        Self::CyclicReference { chain }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}
