//! Capture-group aware replacement.
//!
//! # Responsibilities
//! - Walk every non-overlapping match left to right
//! - Hand each match to a callback through a lazy [`Submatches`] accessor
//! - Expand `$N` / `${N}` selectors in string templates
//!
//! # Template Syntax
//! ```text
//! $0        whole match
//! $1 .. $9  single digit group
//! ${12}     any group number
//! \$        literal `$`
//! ```
//! Unknown or non-participating groups expand to nothing. Any other
//! backslash is copied through as-is.
//!
//! # Design Decisions
//! - Template expansion runs the function engine over the template itself,
//!   with the selector pattern as the matcher
//! - Capture locations are resolved only when a group other than 0 is asked for

use std::collections::HashMap;
use std::ops::{ControlFlow, Range};
use std::sync::LazyLock;

use regex::bytes::{CaptureLocations, Regex};

/// Recognizes `\$` and the `$N` / `${N}` selectors.
static SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\\$|\$([0-9]|\{[0-9]+\})").expect("selector pattern is valid")
});

/// Lazy view over the capture groups of a single match.
///
/// Group 0 is always available. Other groups trigger one capture search the
/// first time any of them is requested; every resolved index is memoized for
/// the lifetime of the callback.
pub struct Submatches<'r, 'h> {
    re: &'r Regex,
    haystack: &'h [u8],
    span: Range<usize>,
    locations: Option<CaptureLocations>,
    resolved: HashMap<usize, &'h [u8]>,
}

impl<'r, 'h> Submatches<'r, 'h> {
    pub(crate) fn new(re: &'r Regex, haystack: &'h [u8], span: Range<usize>) -> Self {
        Self {
            re,
            haystack,
            span,
            locations: None,
            resolved: HashMap::new(),
        }
    }

    /// The whole match.
    pub fn whole(&self) -> &'h [u8] {
        &self.haystack[self.span.clone()]
    }

    /// Byte range of the whole match within the input.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Number of groups in the pattern, group 0 included.
    pub fn group_count(&self) -> usize {
        self.re.captures_len()
    }

    /// Bytes matched by group `index`.
    ///
    /// Empty when the index is out of range or the group did not participate.
    pub fn get(&mut self, index: usize) -> &'h [u8] {
        if index == 0 {
            return self.whole();
        }
        if let Some(bytes) = self.resolved.get(&index) {
            return *bytes;
        }
        let bytes = self.resolve(index);
        self.resolved.insert(index, bytes);
        bytes
    }

    fn resolve(&mut self, index: usize) -> &'h [u8] {
        if index >= self.re.captures_len() {
            return &[];
        }

        let re = self.re;
        let haystack = self.haystack;
        let span = self.span.clone();
        let locations = self.locations.get_or_insert_with(|| {
            let mut locs = re.capture_locations();
            let found = re
                .captures_read_at(&mut locs, haystack, span.start)
                .map(|m| m.range());
            if found != Some(span) {
                // Keep group 0 authoritative; report the others as absent.
                locs = re.capture_locations();
            }
            locs
        });

        match locations.get(index) {
            Some((start, end)) => &haystack[start..end],
            None => &[],
        }
    }
}

/// Replace every match with the callback's output.
///
/// Returning `None` stops the walk: the output so far is followed by the
/// input from the start of the current match, untouched.
pub(crate) fn replace_with<F>(re: &Regex, input: &[u8], mut rep: F) -> Vec<u8>
where
    F: FnMut(&mut Submatches<'_, '_>) -> Option<Vec<u8>>,
{
    let mut out = Vec::with_capacity(input.len());
    let mut trim = 0;

    for m in re.find_iter(input) {
        out.extend_from_slice(&input[trim..m.start()]);

        let mut subs = Submatches::new(re, input, m.range());
        match rep(&mut subs) {
            Some(bytes) => out.extend_from_slice(&bytes),
            None => {
                out.extend_from_slice(&input[m.start()..]);
                return out;
            }
        }
        trim = m.end();
    }

    out.extend_from_slice(&input[trim..]);
    out
}

/// Run the callback once per match for its side effects.
pub(crate) fn scan_with<F>(re: &Regex, input: &[u8], mut visit: F)
where
    F: FnMut(&mut Submatches<'_, '_>) -> ControlFlow<()>,
{
    for m in re.find_iter(input) {
        let mut subs = Submatches::new(re, input, m.range());
        if visit(&mut subs).is_break() {
            return;
        }
    }
}

/// Replace every match with `template`, expanding group selectors.
pub(crate) fn replace_template(re: &Regex, input: &[u8], template: &[u8]) -> Vec<u8> {
    replace_with(re, input, |outer| Some(expand(outer, template)))
}

/// Expand `template` against the groups of one outer match.
fn expand(outer: &mut Submatches<'_, '_>, template: &[u8]) -> Vec<u8> {
    replace_with(&SELECTOR, template, |sel| {
        if sel.whole() == br"\$" {
            return Some(b"$".to_vec());
        }
        let group = parse_selector(sel.get(1));
        Some(group.map(|i| outer.get(i).to_vec()).unwrap_or_default())
    })
}

fn parse_selector(raw: &[u8]) -> Option<usize> {
    let digits = raw
        .strip_prefix(b"{")
        .and_then(|d| d.strip_suffix(b"}"))
        .unwrap_or(raw);
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Bytes produced by the preprocessing and escaping passes back into text.
///
/// Those passes only splice ASCII at match boundaries of valid UTF-8 input,
/// so the lossy branch is not expected to run.
pub(crate) fn into_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
