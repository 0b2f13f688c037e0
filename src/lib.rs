//! # markdocx
//!
//! Convert Word documents (.docx) to GitHub-flavored Markdown.
//!
//! The conversion runs as a linear pipeline:
//!
//! 1. **Input resolution**: accept a local path or an HTTP(S) URL; URLs are
//!    downloaded to a temp directory. Legacy `.doc` inputs are refused
//!    before any I/O.
//! 2. **Extraction**: read `word/document.xml` out of the DOCX container and
//!    emit intermediate HTML.
//! 3. **DOM rewrite**: promote the first table row to a header row, strip
//!    literal bullet glyphs from list items.
//! 4. **Render**: decode HTML character references, then convert the HTML to
//!    Markdown with htmd (ATX headings, fenced code, dash bullets).
//! 5. **Normalize**: numbered lists become bullets, unicode whitespace and
//!    smart punctuation become ASCII.
//! 6. **Lint**: markdownlint-style auto-fixes, applied once.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use markdocx::{Converter, ConvertOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = Converter::new();
//!     let markdown = converter
//!         .convert("report.docx", &ConvertOptions::default())
//!         .await?;
//!     println!("{markdown}");
//!     Ok(())
//! }
//! ```
//!
//! With the `server` feature, [`server::router`] exposes the same pipeline
//! over HTTP (multipart upload endpoints plus a healthcheck).

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;

#[cfg(feature = "server")]
pub mod server;

pub use config::{
    BulletMarker, CodeBlockStyle, ConvertOptions, ConvertOptionsBuilder, HeadingStyle, LinkStyle,
    RenderOptions,
};
pub use convert::{convert, Converter};
pub use error::MarkdocxError;
