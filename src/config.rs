//! Configuration types for DOCX-to-Markdown conversion.
//!
//! Two layers of configuration exist:
//!
//! * [`ConvertOptions`]: per-conversion knobs for the whole pipeline
//!   (render options, download timeout for URL inputs).
//! * [`RenderOptions`]: knobs forwarded to the HTML-to-Markdown engine.
//!
//! `RenderOptions` identity matters: a *default* (all-`None`) value routes
//! the conversion through the shared cached renderer instance, while any
//! *custom* value builds a fresh one-shot instance. See
//! [`crate::pipeline::render`] for the merge rules.

use serde::{Deserialize, Serialize};

/// Heading syntax emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Heading`: the fixed default.
    Atx,
    /// Underlined `Heading\n=======`.
    Setext,
}

/// Code block syntax emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeBlockStyle {
    /// Triple-backtick fences: the fixed default.
    Fenced,
    /// Four-space indentation.
    Indented,
}

/// Unordered-list marker emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletMarker {
    /// `- item`: the fixed default.
    Dash,
    /// `* item`.
    Asterisk,
}

/// Link syntax emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `[text](url)`.
    Inlined,
    /// `[text][1]` with a reference list at the bottom.
    Referenced,
}

/// Renderer configuration supplied per conversion call.
///
/// All fields are optional. An all-`None` value is the *default* options and
/// selects the shared cached renderer instance. Any set field makes the
/// options *custom*, which always builds (and discards) a fresh instance.
///
/// Note the deliberate contract from [`crate::pipeline::render`]: the three
/// core knobs (`heading_style`, `code_block_style`, `bullet_marker`) are
/// pinned to their fixed defaults on merge and are **not** user-overridable
/// through this path. They exist here so the merge is explicit rather than
/// silent. The remaining knobs pass through to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Ignored on merge; the fixed default (ATX) always wins.
    pub heading_style: Option<HeadingStyle>,
    /// Ignored on merge; the fixed default (fenced) always wins.
    pub code_block_style: Option<CodeBlockStyle>,
    /// Ignored on merge; the fixed default (`-`) always wins.
    pub bullet_marker: Option<BulletMarker>,
    /// Link syntax. Default: inlined.
    pub link_style: Option<LinkStyle>,
    /// Use tildes (`~~~`) instead of backticks for fences.
    pub code_fence_tildes: Option<bool>,
}

impl RenderOptions {
    /// True when no knob is set: the conversion may reuse the shared
    /// cached renderer instance.
    pub fn is_default(&self) -> bool {
        *self == RenderOptions::default()
    }
}

/// Configuration for a DOCX-to-Markdown conversion.
///
/// Built via [`ConvertOptions::builder()`] or [`ConvertOptions::default()`].
///
/// # Example
/// ```rust
/// use markdocx::{BulletMarker, ConvertOptions};
///
/// let options = ConvertOptions::builder()
///     .bullet_marker(BulletMarker::Asterisk) // pinned back to '-' on merge
///     .download_timeout_secs(30)
///     .build();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Renderer configuration. Default: all-`None` (shared instance).
    pub render: RenderOptions,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            download_timeout_secs: 120,
        }
    }
}

impl ConvertOptions {
    /// Create a new builder for `ConvertOptions`.
    pub fn builder() -> ConvertOptionsBuilder {
        ConvertOptionsBuilder {
            options: Self::default(),
        }
    }
}

/// Builder for [`ConvertOptions`].
#[derive(Debug)]
pub struct ConvertOptionsBuilder {
    options: ConvertOptions,
}

impl ConvertOptionsBuilder {
    pub fn render(mut self, render: RenderOptions) -> Self {
        self.options.render = render;
        self
    }

    pub fn heading_style(mut self, style: HeadingStyle) -> Self {
        self.options.render.heading_style = Some(style);
        self
    }

    pub fn code_block_style(mut self, style: CodeBlockStyle) -> Self {
        self.options.render.code_block_style = Some(style);
        self
    }

    pub fn bullet_marker(mut self, marker: BulletMarker) -> Self {
        self.options.render.bullet_marker = Some(marker);
        self
    }

    pub fn link_style(mut self, style: LinkStyle) -> Self {
        self.options.render.link_style = Some(style);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.options.download_timeout_secs = secs;
        self
    }

    /// Build the options. No cross-field constraints to validate.
    pub fn build(self) -> ConvertOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_default() {
        assert!(RenderOptions::default().is_default());
        assert!(ConvertOptions::default().render.is_default());
    }

    #[test]
    fn any_set_field_makes_options_custom() {
        let opts = RenderOptions {
            link_style: Some(LinkStyle::Referenced),
            ..RenderOptions::default()
        };
        assert!(!opts.is_default());
    }

    #[test]
    fn builder_sets_render_fields() {
        let opts = ConvertOptions::builder()
            .bullet_marker(BulletMarker::Asterisk)
            .link_style(LinkStyle::Inlined)
            .build();
        assert_eq!(opts.render.bullet_marker, Some(BulletMarker::Asterisk));
        assert!(!opts.render.is_default());
    }
}
