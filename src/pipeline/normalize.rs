//! Text normalisation of rendered Markdown.
//!
//! Three pure transforms, always applied in this order:
//!
//! 1. Numbered lists become bullet lists. Word numbering restarts and
//!    nesting rarely survive conversion intact, so a uniform `- ` marker is
//!    the lesser evil.
//! 2. Unicode whitespace-family codepoints collapse to ordinary spaces (or
//!    to nothing for the zero-width pair).
//! 3. Smart quotes and dashes become their ASCII equivalents.
//!
//! Transforms 2 and 3 each run as a single full-string scan with a
//! per-character lookup, bounding the whole normaliser at three passes over
//! the text. The sequence is idempotent: no substituted character re-matches
//! any rule.

use once_cell::sync::Lazy;
use regex::Regex;

/// `  3. Buy milk` → `  - Buy milk`. Indentation survives; numbers not at
/// line start are untouched.
static RE_NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)\d+\. ").unwrap());

/// Apply all three normalisation passes in order.
pub fn normalize(markdown: &str) -> String {
    let s = numbered_to_bullets(markdown);
    let s = normalize_whitespace_chars(&s);
    normalize_punctuation(&s)
}

/// Rewrite `N. ` line prefixes to `- `, preserving leading whitespace.
pub fn numbered_to_bullets(markdown: &str) -> String {
    RE_NUMBERED_ITEM.replace_all(markdown, "$1- ").to_string()
}

/// Map unicode whitespace-family codepoints to a space or to nothing.
pub fn normalize_whitespace_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => out.push(' '), // nbsp, figure, narrow nbsp
            '\u{2060}' | '\u{FEFF}' => {}                          // word joiner, BOM
            _ => out.push(ch),
        }
    }
    out
}

/// Map smart quotes and dashes to ASCII.
pub fn normalize_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            _ => out.push(ch),
        }
    }
    out
}
