//! HTML entity decoding applied to extracted HTML just before rendering.
//!
//! Word exports (and the extraction stage itself) leave character references
//! like `&nbsp;` and `&#8220;` in the HTML. Decoding them here, rather than
//! leaving it to the Markdown engine, keeps the downstream text-normalisation
//! passes working on real codepoints.
//!
//! `&lt;` and `&gt;` are deliberately **not** in the table: literal
//! angle-bracket text must stay encoded so the renderer does not reinterpret
//! it as markup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum scan-and-replace passes. Entities are rarely re-encoded, so one
/// pass almost always reaches the fixed point; the cap bounds adversarial
/// inputs like `&amp;amp;amp;…`.
const MAX_PASSES: usize = 3;

/// Anything that looks like an entity reference: `&`, word/hash chars, `;`.
static RE_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[\w#]+;").unwrap());

/// Named entities the pipeline recognises. Unrecognised references pass
/// through unchanged: that is policy, not an error path.
fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "amp" => "&",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{00A0}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "hellip" => "\u{2026}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        _ => return None,
    })
}

/// Decode one entity token (`&…;` including delimiters). Returns `None`
/// when the token is not recognised.
fn decode_token(token: &str) -> Option<String> {
    let body = &token[1..token.len() - 1];

    if let Some(rest) = body.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            rest.parse::<u32>().ok()?
        };
        return char::from_u32(code).map(String::from);
    }

    named_entity(body).map(String::from)
}

/// Decode the bounded set of named, decimal and hex character references.
///
/// Bounded fixed-point loop: each pass replaces every entity-like token in
/// one scan; the loop stops when a pass changes nothing or after
/// [`MAX_PASSES`] passes. Inputs with no `&` skip the loop entirely.
pub fn decode_entities(html: &str) -> String {
    if !html.contains('&') {
        return html.to_string();
    }

    let mut current = html.to_string();
    for _ in 0..MAX_PASSES {
        let next = RE_ENTITY
            .replace_all(&current, |caps: &regex::Captures<'_>| {
                let token = &caps[0];
                decode_token(token).unwrap_or_else(|| token.to_string())
            })
            .to_string();
        if next == current {
            break;
        }
        current = next;
    }
    current
}
