//! Capture-retaining split.
//!
//! For each match, the text before it becomes one segment and every
//! non-empty capture group (1..N) becomes its own segment. The tail after the
//! last match is kept only when non-empty. A leading empty segment is kept.

use regex::bytes::Regex;

pub(crate) fn split<'h>(re: &Regex, input: &'h [u8]) -> Vec<&'h [u8]> {
    let mut segments = Vec::new();
    let mut trim = 0;

    for caps in re.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        segments.push(&input[trim..whole.start()]);
        trim = whole.end();

        segments.extend(
            caps.iter()
                .skip(1)
                .flatten()
                .map(|g| g.as_bytes())
                .filter(|g| !g.is_empty()),
        );
    }

    let tail = &input[trim..];
    if !tail.is_empty() {
        segments.push(tail);
    }

    segments
}
