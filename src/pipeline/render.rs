//! HTML-to-Markdown rendering: a thin adapter over the `htmd` engine.
//!
//! The adapter owns instance selection, not conversion logic:
//!
//! * Default options → a shared engine, built lazily on first use and reused
//!   for every later default-options call. The `OnceCell` guards the
//!   check-then-construct sequence so concurrent conversions build at most
//!   one instance.
//! * Custom options → a fresh one-shot engine, merged with the fixed
//!   defaults and dropped after the call. Custom calls never read or mutate
//!   the shared instance.
//!
//! Merge contract: the fixed defaults (ATX headings, fenced code blocks,
//! `-` bullets) win over user-supplied values for those keys. The engine is
//! always configured with the GFM extensions (tables, strikethrough, task
//! lists) via custom element handlers.
//!
//! Entity decoding happens here, immediately before rendering: the DOM
//! rewriter upstream sees the original entity-encoded text.

use std::sync::Arc;

use htmd::options::{
    BulletListMarker, CodeBlockFence, CodeBlockStyle as EngineCodeBlockStyle,
    HeadingStyle as EngineHeadingStyle, LinkStyle as EngineLinkStyle, Options,
};
use htmd::{Element, HtmlToMarkdown};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::{LinkStyle, RenderOptions};
use crate::error::MarkdocxError;
use crate::pipeline::entities::decode_entities;

/// Renderer with a process-lifetime cached default engine.
///
/// Hold one of these for the lifetime of the application (the
/// [`crate::convert::Converter`] does) rather than constructing per call.
pub struct MarkdownRenderer {
    default_engine: OnceCell<Arc<HtmlToMarkdown>>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            default_engine: OnceCell::new(),
        }
    }

    /// Decode entities, then render `html` to Markdown, trimmed.
    ///
    /// Engine failures propagate unchanged as [`MarkdocxError::Render`].
    pub fn render(&self, html: &str, options: &RenderOptions) -> Result<String, MarkdocxError> {
        let decoded = decode_entities(html);

        let markdown = if options.is_default() {
            self.default_engine().convert(&decoded)
        } else {
            // One-shot engine; never touches the cached instance.
            debug!("building one-shot renderer for custom options");
            build_engine(options).convert(&decoded)
        }
        .map_err(|e| MarkdocxError::Render {
            detail: e.to_string(),
        })?;

        Ok(markdown.trim().to_string())
    }

    /// The shared default-options engine, built on first use.
    ///
    /// Exposed so callers (and tests) can observe instance identity.
    pub fn default_engine(&self) -> &Arc<HtmlToMarkdown> {
        self.default_engine.get_or_init(|| {
            debug!("initialising shared default renderer");
            Arc::new(build_engine(&RenderOptions::default()))
        })
    }
}

/// Build an engine from user options merged under the fixed defaults.
fn build_engine(options: &RenderOptions) -> HtmlToMarkdown {
    let opts = Options {
        // The three core knobs are pinned; user values for them are ignored.
        heading_style: EngineHeadingStyle::Atx,
        code_block_style: EngineCodeBlockStyle::Fenced,
        bullet_list_marker: BulletListMarker::Dash,
        // Pass-through knobs.
        link_style: match options.link_style {
            Some(LinkStyle::Referenced) => EngineLinkStyle::Referenced,
            _ => EngineLinkStyle::Inlined,
        },
        code_block_fence: if options.code_fence_tildes == Some(true) {
            CodeBlockFence::Tildes
        } else {
            CodeBlockFence::Backticks
        },
        ..Options::default()
    };

    HtmlToMarkdown::builder()
        .options(opts)
        .skip_tags(vec!["script", "style"])
        // GFM: tables come out of htmd as plain text without these.
        .add_handler(vec!["table"], table_handler)
        .add_handler(vec!["thead", "tbody", "tfoot"], passthrough_handler)
        .add_handler(vec!["tr"], row_handler)
        .add_handler(vec!["th", "td"], cell_handler)
        // GFM: strikethrough.
        .add_handler(vec!["del", "s", "strike"], strikethrough_handler)
        // GFM: task-list checkboxes.
        .add_handler(vec!["input"], checkbox_handler)
        .build()
}

// ── GFM element handlers ─────────────────────────────────────────────────

/// Emit `| cell `: the closing pipe comes from the row handler.
fn cell_handler(element: Element) -> Option<String> {
    let text = element
        .content
        .trim()
        .replace('\n', " ")
        .replace('|', "\\|");
    Some(format!("| {} ", text))
}

fn row_handler(element: Element) -> Option<String> {
    Some(format!("{}|\n", element.content))
}

fn passthrough_handler(element: Element) -> Option<String> {
    Some(element.content.to_string())
}

/// Assemble rows into a GFM table. The first row is the header (the DOM
/// rewriter guarantees exactly one header row per table), so the separator
/// goes after line one.
fn table_handler(element: Element) -> Option<String> {
    let rows: Vec<&str> = element
        .content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();
    let Some(header) = rows.first() else {
        return Some(String::new());
    };

    let columns = delimiter_pipes(header).saturating_sub(1).max(1);
    let mut out = String::from("\n\n");
    out.push_str(header);
    out.push('\n');
    out.push('|');
    for _ in 0..columns {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in &rows[1..] {
        out.push_str(row);
        out.push('\n');
    }
    out.push('\n');
    Some(out)
}

/// Count cell-delimiting pipes; `\|` escapes emitted by the cell handler
/// are cell content, not delimiters.
fn delimiter_pipes(line: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '\\' => escaped = !escaped,
            '|' => {
                if !escaped {
                    count += 1;
                }
                escaped = false;
            }
            _ => escaped = false,
        }
    }
    count
}

fn strikethrough_handler(element: Element) -> Option<String> {
    let text = element.content.trim();
    if text.is_empty() {
        return Some(String::new());
    }
    Some(format!("~~{}~~", text))
}

/// Render `<input type="checkbox">` as a GFM task-list marker; every other
/// input is dropped.
fn checkbox_handler(element: Element) -> Option<String> {
    let mut is_checkbox = false;
    let mut checked = false;
    for attr in element.attrs.iter() {
        match attr.name.local.as_ref() {
            "type" if &*attr.value == "checkbox" => is_checkbox = true,
            "checked" => checked = true,
            _ => {}
        }
    }
    if !is_checkbox {
        return Some(String::new());
    }
    Some(if checked { "[x] ".to_string() } else { "[ ] ".to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertOptions;

    fn render_default(html: &str) -> String {
        MarkdownRenderer::new()
            .render(html, &ConvertOptions::default().render)
            .expect("render")
    }

    #[test]
    fn renders_atx_headings_and_dash_bullets() {
        let md = render_default("<h2>Title</h2><ul><li>one</li><li>two</li></ul>");
        assert!(md.contains("## Title"), "got: {md}");
        assert!(md.contains("- one"), "got: {md}");
        assert!(md.contains("- two"), "got: {md}");
    }

    #[test]
    fn output_is_trimmed() {
        let md = render_default("<p>hello</p>");
        assert_eq!(md, "hello");
    }

    #[test]
    fn entities_are_decoded_before_rendering() {
        let md = render_default("<p>Fish &amp; Chips &ldquo;fresh&rdquo;</p>");
        assert!(md.contains("Fish & Chips"), "got: {md}");
        assert!(md.contains("\u{201C}fresh\u{201D}"), "got: {md}");
    }

    #[test]
    fn table_renders_as_gfm() {
        let md = render_default(
            "<table><tr><th>Name</th><th>Age</th></tr>\
             <tr><td>Ada</td><td>36</td></tr></table>",
        );
        assert!(md.contains("| Name | Age |"), "got: {md}");
        assert!(md.contains("| --- | --- |"), "got: {md}");
        assert!(md.contains("| Ada | 36 |"), "got: {md}");
    }

    #[test]
    fn cell_pipes_are_escaped() {
        let md = render_default("<table><tr><th>a|b</th></tr></table>");
        assert!(md.contains("| a\\|b |"), "got: {md}");
    }

    #[test]
    fn escaped_pipes_do_not_widen_the_separator() {
        let md = render_default("<table><tr><th>a|b</th><th>c</th></tr></table>");
        assert!(md.contains("| a\\|b | c |"), "got: {md}");
        assert!(md.contains("| --- | --- |"), "got: {md}");
        assert!(!md.contains("| --- | --- | --- |"), "got: {md}");
    }

    #[test]
    fn delimiter_pipes_skips_escapes() {
        assert_eq!(delimiter_pipes("| a | b |"), 3);
        assert_eq!(delimiter_pipes("| a\\|b |"), 2);
        assert_eq!(delimiter_pipes("| \\\\| |"), 3); // escaped backslash, real pipe
    }

    #[test]
    fn strikethrough_renders_as_tildes() {
        let md = render_default("<p><del>gone</del></p>");
        assert!(md.contains("~~gone~~"), "got: {md}");
    }

    #[test]
    fn default_engine_is_reused() {
        let renderer = MarkdownRenderer::new();
        let first = Arc::clone(renderer.default_engine());
        renderer
            .render("<p>a</p>", &RenderOptions::default())
            .unwrap();
        assert!(Arc::ptr_eq(&first, renderer.default_engine()));
    }

    #[test]
    fn custom_options_never_touch_the_shared_engine() {
        let renderer = MarkdownRenderer::new();
        let shared = Arc::clone(renderer.default_engine());

        let custom = RenderOptions {
            link_style: Some(LinkStyle::Referenced),
            ..RenderOptions::default()
        };
        renderer.render("<p><a href=\"https://x.test\">x</a></p>", &custom)
            .unwrap();

        assert!(Arc::ptr_eq(&shared, renderer.default_engine()));
    }

    #[test]
    fn custom_options_cannot_override_pinned_defaults() {
        use crate::config::{BulletMarker, HeadingStyle};
        let renderer = MarkdownRenderer::new();
        let custom = RenderOptions {
            heading_style: Some(HeadingStyle::Setext),
            bullet_marker: Some(BulletMarker::Asterisk),
            ..RenderOptions::default()
        };
        let md = renderer
            .render("<h1>T</h1><ul><li>x</li></ul>", &custom)
            .unwrap();
        assert!(md.contains("# T"), "ATX must win over Setext: {md}");
        assert!(md.contains("- x"), "dash must win over asterisk: {md}");
    }
}
