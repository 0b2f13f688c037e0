//! Pipeline stages for DOCX-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the Markdown engine) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ dom ──▶ entities+render ──▶ normalize ──▶ lint
//! (path/URL) (OOXML)  (rewrite)  (decode, htmd)     (text fixes)  (auto-fix)
//! ```
//!
//! 1. [`input`]   : canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`] : read the DOCX container and emit intermediate HTML; runs
//!    in `spawn_blocking` because ZIP/XML decoding is CPU-bound
//! 3. [`dom`]     : one-parse/one-serialise structural rewrites (table header
//!    promotion, bullet glyph stripping)
//! 4. [`entities`]: decode HTML character references, bounded fixed point
//! 5. [`render`]  : the htmd adapter with the cached default engine
//! 6. [`normalize`]: numbered→bullet lists, unicode whitespace, smart quotes
//! 7. [`lint`]    : markdownlint-style report-then-apply fix pass

pub mod dom;
pub mod entities;
pub mod extract;
pub mod input;
pub mod lint;
pub mod normalize;
pub mod render;
