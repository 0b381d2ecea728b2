//! Pattern canonicalization.
//!
//! # Data Flow
//! ```text
//! raw pattern + params
//!     → quote escapes      (\' becomes a backtick)
//!     → comment stripping  ((?#...) removed)
//!     → substitution       (%N / %{N} replaced by the escaped parameter)
//!     → cleanup            (unresolved %N / %{N} removed)
//!     → canonical pattern  (cache key, compiled as-is)
//! ```
//!
//! # Design Decisions
//! - Pure text transform: the result depends on the inputs only, never on
//!   what the compiled pattern cache holds
//! - Parameters are escaped before insertion, so they match literally
//! - A backslash in front of a placeholder keeps it through every stage
//! - Inserted parameters are never scanned again by later stages

use std::ops::ControlFlow;
use std::sync::LazyLock;

use regex::bytes::{NoExpand, Regex};

use crate::cache::ttl::TtlCache;
use crate::pattern::error::{PatternError, PatternResult};
use crate::pattern::escape::escape;
use crate::pattern::template::{self, into_text};
use crate::pattern::Pattern;

static QUOTE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[\\']").expect("quote escape pattern is valid"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\?#.*?\)").expect("comment pattern is valid"));

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\|)(%\{[0-9]+\}|%[0-9])").expect("placeholder pattern is valid")
});

/// Canonicalize `raw`, substituting `params` for `%1`, `%2`, ... / `%{N}`.
///
/// Placeholder patterns are looked up in (and added to) `placeholders`.
pub fn preprocess<S: AsRef<str>>(
    raw: &str,
    params: &[S],
    placeholders: &TtlCache<Pattern>,
) -> PatternResult<String> {
    let mut text = normalize_quotes(raw);

    if text.contains("(?#") {
        text = into_text(COMMENT.replace_all(text.as_bytes(), NoExpand(b"")).into_owned());
    }

    let mut spans = vec![Span::Raw(text)];
    for (i, value) in params.iter().enumerate() {
        let index = i + 1;
        let source = placeholder_source(index);
        let placeholder = placeholders.get_or_compile(&source, || {
            Pattern::new(&source).map_err(|e| match e {
                PatternError::Syntax { source, .. } => PatternError::ParameterSyntax { index, source },
                other => other,
            })
        })?;

        spans = substitute(spans, &placeholder, &escape(value.as_ref()));
    }

    let mut canonical = String::new();
    for span in spans {
        match span {
            Span::Raw(raw) => canonical.push_str(&drop_unresolved(&raw)),
            Span::Param(literal) => canonical.push_str(&literal),
        }
    }
    Ok(canonical)
}

/// Pattern text during substitution. Inserted parameters are never scanned
/// again, so a value cannot escape or form a later placeholder.
enum Span {
    Raw(String),
    Param(String),
}

/// Split every raw span around the non-escaped matches of `placeholder`.
fn substitute(spans: Vec<Span>, placeholder: &Pattern, literal: &str) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let raw = match span {
            Span::Raw(raw) => raw,
            param => {
                out.push(param);
                continue;
            }
        };

        let mut last = 0;
        placeholder.scan_func(raw.as_bytes(), |m| {
            if m.get(1).is_empty() {
                let range = m.span();
                out.push(Span::Raw(raw[last..range.start].to_string()));
                out.push(Span::Param(literal.to_string()));
                last = range.end;
            }
            ControlFlow::Continue(())
        });
        out.push(Span::Raw(raw[last..].to_string()));
    }
    out
}

/// Delete non-escaped `%N` / `%{N}` left without a parameter.
fn drop_unresolved(raw: &str) -> String {
    into_text(template::replace_with(&PLACEHOLDER, raw.as_bytes(), |m| {
        if m.get(1).is_empty() {
            Some(Vec::new())
        } else {
            Some(m.whole().to_vec())
        }
    }))
}

/// `\'` becomes a backtick; `\\` is left alone.
fn normalize_quotes(raw: &str) -> String {
    if !raw.contains(r"\'") {
        return raw.to_string();
    }
    into_text(template::replace_with(&QUOTE_ESCAPE, raw.as_bytes(), |m| {
        if m.whole() == br"\'" {
            Some(b"`".to_vec())
        } else {
            Some(m.whole().to_vec())
        }
    }))
}

/// Placeholder pattern for the parameter at 1-based `index`.
///
/// Single-digit indices accept both `%N` and `%{N}`; larger ones only the
/// braced form.
fn placeholder_source(index: usize) -> String {
    if index < 10 {
        format!(r"(\\|)(%\{{{index}\}}|%{index})")
    } else {
        format!(r"(\\|)(%\{{{index}\}})")
    }
}
