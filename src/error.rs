//! Error types for the markdocx library.
//!
//! The taxonomy mirrors the pipeline boundaries:
//!
//! * [`MarkdocxError::UnsupportedFormat`]: raised synchronously, before any
//!   I/O, for legacy `.doc` inputs. Callers branch on the variant (not the
//!   message text); [`MarkdocxError::is_client_error`] gives the 400-class
//!   vs 500-class split.
//! * Input-resolution errors (`FileNotFound`, `PermissionDenied`, download
//!   failures): the file or URL could not be turned into readable bytes.
//! * `Extraction` / `Render`: a pipeline stage failed; markdocx performs
//!   no retry and no partial-result recovery, the whole conversion aborts.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the markdocx library.
#[derive(Debug, Error)]
pub enum MarkdocxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Legacy `.doc` input. Rejected before extraction is attempted.
    #[error("Legacy .doc files are not supported: '{path}'\nSave the document as .docx in Word and try again.")]
    UnsupportedFormat { path: PathBuf },

    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// The DOCX container or its document body could not be read.
    #[error("Failed to extract document content: {detail}")]
    Extraction { detail: String },

    /// The HTML-to-Markdown engine failed.
    #[error("Markdown rendering failed: {detail}")]
    Render { detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarkdocxError {
    /// True for errors the caller caused (bad input), false for server faults.
    ///
    /// The plain-text endpoint maps this to its response status; the JSON
    /// endpoint validates uploads up front and keeps a fixed 500 envelope
    /// for conversion failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MarkdocxError::UnsupportedFormat { .. }
                | MarkdocxError::FileNotFound { .. }
                | MarkdocxError::PermissionDenied { .. }
        )
    }
}
