//! Line classification for the radvd configuration subset.
//!
//! Each input line is trimmed and matched case-insensitively against the
//! handful of shapes the state machine cares about. Everything else is
//! [`Line::Other`] and passes through untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Token marking where discovered prefixes are synthesized.
pub const PLACEHOLDER: &str = "@PREFIX@";

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(interface|prefix)\b\s*([^\s{};]*)").expect("header pattern is valid")
});

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(AdvValidLifetime|AdvPreferredLifetime|DecrementLifetimes)\s+([^\s;]+)")
        .expect("directive pattern is valid")
});

/// A directive recognized inside a prefix block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `AdvValidLifetime <value>;`
    Valid(&'a str),
    /// `AdvPreferredLifetime <value>;`
    Preferred(&'a str),
    /// `DecrementLifetimes <on|off>;`
    Decrement(bool),
}

/// Classification of one trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `interface <name> {`; the name is `None` when it cannot be extracted.
    Interface(Option<&'a str>),
    /// `prefix <address> {`; the address is `None` when it cannot be extracted.
    Prefix(Option<&'a str>),
    /// The placeholder, bare or opening a body.
    Placeholder {
        /// Whether the placeholder opens a `{ ... }` body.
        has_body: bool,
    },
    /// A recognized lifetime directive.
    Directive(Directive<'a>),
    /// Any other line opening a brace block.
    BlockOpen,
    /// A closing brace, `}` or `};`.
    Close,
    /// Anything else, including comments and blank lines.
    Other,
}

/// Classifies a raw line.
#[must_use]
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();

    if line.starts_with('}') {
        return Line::Close;
    }

    // A brace on its own line belongs to the header above it.
    if line == "{" {
        return Line::Other;
    }

    if line
        .get(..PLACEHOLDER.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(PLACEHOLDER))
    {
        return Line::Placeholder {
            has_body: opens_block(line),
        };
    }

    if let Some(caps) = HEADER.captures(line) {
        let name = caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty());
        let keyword = caps.get(1).map_or("", |m| m.as_str());
        return if keyword.eq_ignore_ascii_case("interface") {
            Line::Interface(name)
        } else {
            Line::Prefix(name)
        };
    }

    if let Some(caps) = DIRECTIVE.captures(line) {
        let keyword = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str());
        let directive = if keyword.eq_ignore_ascii_case("AdvValidLifetime") {
            Directive::Valid(value)
        } else if keyword.eq_ignore_ascii_case("AdvPreferredLifetime") {
            Directive::Preferred(value)
        } else {
            Directive::Decrement(value.eq_ignore_ascii_case("on"))
        };
        return Line::Directive(directive);
    }

    if opens_block(line) {
        return Line::BlockOpen;
    }

    Line::Other
}

/// Returns the leading whitespace of `raw`.
#[must_use]
pub fn indent_of(raw: &str) -> &str {
    let trimmed = raw.trim_start();
    &raw[..raw.len() - trimmed.len()]
}

/// Returns true if the trimmed line ends by opening a brace block.
fn opens_block(line: &str) -> bool {
    !line.starts_with('#') && line.trim_end_matches(';').trim_end().ends_with('{')
}

/// Returns the brace depth after `raw` inside an opaque block.
///
/// Zero means the block that was open at `depth` has just been closed.
#[must_use]
pub(crate) fn track_depth(depth: usize, raw: &str) -> usize {
    if matches!(classify(raw), Line::Close) {
        depth.saturating_sub(1)
    } else if opens_block(raw.trim()) {
        depth + 1
    } else {
        depth
    }
}
