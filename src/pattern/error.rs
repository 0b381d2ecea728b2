//! Pattern compilation errors.

use thiserror::Error;

/// Errors surfaced while turning a pattern source into a compiled [`Pattern`].
///
/// Only compilation can fail. Once a pattern exists, matching, replacing and
/// splitting are total over any input.
///
/// [`Pattern`]: crate::pattern::Pattern
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// The canonical pattern was rejected by the regex engine.
    #[error("invalid pattern `{pattern}`: {source}")]
    Syntax {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The placeholder pattern for a positional parameter failed to compile.
    #[error("invalid placeholder pattern for parameter {index}: {source}")]
    ParameterSyntax {
        index: usize,
        #[source]
        source: regex::Error,
    },
}

/// Result type for pattern compilation.
pub type PatternResult<T> = Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = PatternError::Syntax {
            pattern: "(".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid pattern `(`"));

        let source = regex::Regex::new("[").unwrap_err();
        let err = PatternError::ParameterSyntax { index: 3, source };
        assert!(err.to_string().contains("parameter 3"));
    }
}
