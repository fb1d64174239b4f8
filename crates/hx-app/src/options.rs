//! Extraction options shared by every service.

use std::sync::Arc;

use hx_series::{FileOrdering, LexicalOrder, NumericTimestepOrder};

/// How the "latest" series file is chosen among time directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestepOrdering {
    /// Plain path order. Assumes time directories sort as strings.
    #[default]
    Lexical,
    /// Numeric comparison of path components that parse as numbers.
    Numeric,
}

impl TimestepOrdering {
    pub fn to_file_ordering(self) -> Arc<dyn FileOrdering> {
        match self {
            TimestepOrdering::Lexical => Arc::new(LexicalOrder),
            TimestepOrdering::Numeric => Arc::new(NumericTimestepOrder),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub ordering: TimestepOrdering,
    /// Series file extension, without the dot.
    pub extension: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            ordering: TimestepOrdering::Lexical,
            extension: "dat".to_string(),
        }
    }
}
