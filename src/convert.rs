//! Conversion entry points and the pipeline orchestrator.
//!
//! [`Converter`] owns the one piece of shared state in the system, the
//! lazily-initialised default renderer engine, so it is meant to be created
//! once (at application startup) and shared, e.g. behind an `Arc`, by every
//! caller. The free [`convert`] function exists for one-off scripts; it
//! builds a throwaway `Converter` and therefore gets no cross-call engine
//! reuse.
//!
//! The pipeline is strictly linear and aborts on the first failing stage;
//! there is no retry and no partial output.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::ConvertOptions;
use crate::error::MarkdocxError;
use crate::pipeline::render::MarkdownRenderer;
use crate::pipeline::{dom, extract, input, lint, normalize};

/// Orchestrates the DOCX-to-Markdown pipeline.
///
/// # Example
/// ```rust,no_run
/// use markdocx::{Converter, ConvertOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let converter = Converter::new();
///     let markdown = converter
///         .convert("report.docx", &ConvertOptions::default())
///         .await?;
///     println!("{markdown}");
///     Ok(())
/// }
/// ```
pub struct Converter {
    renderer: MarkdownRenderer,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
        }
    }

    /// The renderer handle, exposing the shared default engine.
    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Convert a .docx file path or HTTP(S) URL to Markdown.
    ///
    /// # Errors
    /// * [`MarkdocxError::UnsupportedFormat`] for `.doc` inputs, raised
    ///   before any I/O
    /// * input-resolution errors (not found, permission, download)
    /// * any pipeline-stage failure, propagated unchanged
    pub async fn convert(
        &self,
        input_str: impl AsRef<str>,
        options: &ConvertOptions,
    ) -> Result<String, MarkdocxError> {
        let input_str = input_str.as_ref();

        // Legacy .doc refusal happens before any I/O or download.
        if is_legacy_doc(input_str) {
            return Err(MarkdocxError::UnsupportedFormat {
                path: PathBuf::from(input_str),
            });
        }

        let total_start = Instant::now();
        info!("Starting conversion: {}", input_str);

        let resolved = input::resolve_input(input_str, options.download_timeout_secs).await?;
        let bytes = tokio::fs::read(resolved.path()).await.map_err(|e| {
            MarkdocxError::Internal(format!(
                "failed to read '{}': {e}",
                resolved.path().display()
            ))
        })?;

        let markdown = self.convert_bytes(bytes, options).await?;
        info!(
            "Conversion complete: {} bytes of Markdown in {}ms",
            markdown.len(),
            total_start.elapsed().as_millis()
        );
        Ok(markdown)
    }

    /// Convert an in-memory .docx byte buffer to Markdown.
    ///
    /// This is the API the HTTP upload handlers use; no temp file involved.
    pub async fn convert_bytes(
        &self,
        bytes: Vec<u8>,
        options: &ConvertOptions,
    ) -> Result<String, MarkdocxError> {
        // ZIP + XML decoding is CPU-bound; keep it off the async workers.
        let html = tokio::task::spawn_blocking(move || extract::extract_html(&bytes))
            .await
            .map_err(|e| MarkdocxError::Internal(format!("extraction task failed: {e}")))??;

        self.html_to_markdown(&html, options)
    }

    /// Run the post-extraction pipeline: DOM rewrite, entity decode + render,
    /// normalise, lint. Synchronous CPU-bound work, no suspension points.
    pub fn html_to_markdown(
        &self,
        html: &str,
        options: &ConvertOptions,
    ) -> Result<String, MarkdocxError> {
        let rewritten = dom::process_html(html);
        debug!("DOM rewrite: {} -> {} bytes", html.len(), rewritten.len());

        let rendered = self.renderer.render(&rewritten, &options.render)?;
        let normalized = normalize::normalize(&rendered);
        Ok(lint::lint(&normalized))
    }
}

/// `.doc` (legacy Word binary format) detection, case-insensitive.
///
/// Only `.doc` is refused; any other extension, recognised or not, is
/// passed through to extraction, which may itself fail.
pub fn is_legacy_doc(input: &str) -> bool {
    let lower = input.trim_end().to_ascii_lowercase();
    lower.ends_with(".doc")
}

/// One-off conversion with a throwaway [`Converter`].
pub async fn convert(
    input_str: impl AsRef<str>,
    options: &ConvertOptions,
) -> Result<String, MarkdocxError> {
    Converter::new().convert(input_str, options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_doc_detection_is_case_insensitive() {
        assert!(is_legacy_doc("letter.doc"));
        assert!(is_legacy_doc("LETTER.DOC"));
        assert!(is_legacy_doc("/tmp/a/letter.Doc"));
        assert!(!is_legacy_doc("letter.docx"));
        assert!(!is_legacy_doc("letter.rtf"));
        assert!(!is_legacy_doc("doc"));
    }

    #[tokio::test]
    async fn doc_path_is_rejected_before_any_io() {
        // The file does not exist; UnsupportedFormat must win over FileNotFound.
        let err = Converter::new()
            .convert("/nonexistent/legacy.doc", &ConvertOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MarkdocxError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn missing_docx_is_file_not_found() {
        let err = Converter::new()
            .convert("/nonexistent/report.docx", &ConvertOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MarkdocxError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn garbage_bytes_fail_extraction() {
        let err = Converter::new()
            .convert_bytes(b"junk".to_vec(), &ConvertOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MarkdocxError::Extraction { .. }));
    }

    #[test]
    fn html_pipeline_end_to_end_nbsp() {
        // Smoke test for the whole text path: entity decoded, nbsp normalised.
        let converter = Converter::new();
        let md = converter
            .html_to_markdown("<p>Hello&nbsp;World</p>", &ConvertOptions::default())
            .unwrap();
        assert_eq!(md, "Hello World");
    }

    #[test]
    fn html_pipeline_table_promotion_to_gfm() {
        let converter = Converter::new();
        let md = converter
            .html_to_markdown(
                "<table><tr><td>Name</td><td>Age</td></tr>\
                 <tr><td>Ada</td><td>36</td></tr></table>",
                &ConvertOptions::default(),
            )
            .unwrap();
        assert!(md.contains("| Name | Age |"), "got: {md}");
        assert!(md.contains("| --- | --- |"), "got: {md}");
        assert!(md.contains("| Ada | 36 |"), "got: {md}");
    }

    #[test]
    fn html_pipeline_numbered_list_becomes_bullets() {
        let converter = Converter::new();
        let md = converter
            .html_to_markdown(
                "<ol><li>first</li><li>second</li></ol>",
                &ConvertOptions::default(),
            )
            .unwrap();
        assert!(md.contains("- first"), "got: {md}");
        assert!(md.contains("- second"), "got: {md}");
        assert!(!md.contains("1."), "got: {md}");
    }

    #[test]
    fn html_pipeline_strips_bullet_glyphs() {
        let converter = Converter::new();
        let md = converter
            .html_to_markdown(
                "<ul><li>\u{2022} Hello</li></ul>",
                &ConvertOptions::default(),
            )
            .unwrap();
        assert_eq!(md, "- Hello");
    }
}
