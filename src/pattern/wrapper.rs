//! Compiled pattern handle and its operations.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use regex::bytes::{NoExpand, Regex};

use crate::pattern::error::{PatternError, PatternResult};
use crate::pattern::split;
use crate::pattern::template::{self, Submatches};

/// A compiled pattern.
///
/// Cloning is cheap: the compiled regex is shared and never mutated, so a
/// `Pattern` can be handed to any number of threads.
#[derive(Clone)]
pub struct Pattern {
    re: Arc<Regex>,
}

impl Pattern {
    /// Compile a canonical pattern. No preprocessing is applied.
    pub fn new(canonical: &str) -> PatternResult<Self> {
        let re = Regex::new(canonical).map_err(|source| PatternError::Syntax {
            pattern: canonical.to_string(),
            source,
        })?;
        Ok(Self { re: Arc::new(re) })
    }

    /// The canonical pattern text.
    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }

    /// Returns true if `input` contains a match.
    pub fn is_match(&self, input: &[u8]) -> bool {
        self.re.is_match(input)
    }

    /// Replace every match with the callback's output.
    ///
    /// The callback gets lazy access to the match's groups. Returning `None`
    /// stops early: everything from the current match onward is copied
    /// through unchanged.
    ///
    /// ```
    /// use regcache::Pattern;
    ///
    /// let re = Pattern::new(r"(\w)(\w*)").unwrap();
    /// let out = re.replace_func(b"hello world", |m| {
    ///     let mut word = m.get(1).to_ascii_uppercase();
    ///     word.extend_from_slice(m.get(2));
    ///     Some(word)
    /// });
    /// assert_eq!(out, b"Hello World");
    /// ```
    pub fn replace_func<F>(&self, input: &[u8], rep: F) -> Vec<u8>
    where
        F: FnMut(&mut Submatches<'_, '_>) -> Option<Vec<u8>>,
    {
        template::replace_with(&self.re, input, rep)
    }

    /// Visit every match without building any output.
    pub fn scan_func<F>(&self, input: &[u8], visit: F)
    where
        F: FnMut(&mut Submatches<'_, '_>) -> ControlFlow<()>,
    {
        template::scan_with(&self.re, input, visit)
    }

    /// Replace every match with `replacement`, inserted verbatim.
    pub fn replace_literal(&self, input: &[u8], replacement: &[u8]) -> Vec<u8> {
        self.re.replace_all(input, NoExpand(replacement)).into_owned()
    }

    /// Replace every match with `template`, expanding `$N` and `${N}`.
    ///
    /// `\$` gives a literal `$`; any other backslash is copied as-is.
    ///
    /// ```
    /// use regcache::Pattern;
    ///
    /// let re = Pattern::new(r"(\w+)@(\w+)").unwrap();
    /// assert_eq!(re.replace_template(b"me@host", b"$2 <- $1"), b"host <- me");
    /// ```
    pub fn replace_template(&self, input: &[u8], template: &[u8]) -> Vec<u8> {
        template::replace_template(&self.re, input, template)
    }

    /// Split `input` around matches, keeping non-empty capture groups.
    pub fn split<'h>(&self, input: &'h [u8]) -> Vec<&'h [u8]> {
        split::split(&self.re, input)
    }

    /// Returns true if both handles share the same compiled regex.
    pub fn ptr_eq(&self, other: &Pattern) -> bool {
        Arc::ptr_eq(&self.re, &other.re)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
