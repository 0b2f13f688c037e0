//! DOCX extraction: read `word/document.xml` out of the ZIP container and
//! emit intermediate HTML for the rest of the pipeline.
//!
//! This stage is deliberately minimal: it is the external-collaborator seam
//! in front of the DOM rewriter, not a full OOXML implementation. It covers
//! what Word documents actually put in front of this pipeline:
//!
//! * paragraphs and `Heading1`–`Heading6`/`Title` styles
//! * run formatting: bold, italic, strikethrough
//! * tables (cells come out as `<td>`; header promotion happens downstream)
//! * numbered/bulleted paragraphs (`w:numPr` or the `ListParagraph` style),
//!   grouped into `<ul>`: the text normaliser downstream rewrites any
//!   surviving numbered markers to bullets anyway
//!
//! Text is HTML-escaped on the way out; entity decoding happens later, right
//! before Markdown rendering.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::MarkdocxError;

/// Extract the document body of a .docx byte buffer as HTML.
pub fn extract_html(bytes: &[u8]) -> Result<String, MarkdocxError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| MarkdocxError::Extraction {
            detail: format!("not a readable DOCX container: {e}"),
        })?;

    let mut document_xml = Vec::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| MarkdocxError::Extraction {
            detail: format!("word/document.xml missing: {e}"),
        })?
        .read_to_end(&mut document_xml)
        .map_err(|e| MarkdocxError::Extraction {
            detail: format!("failed to read document body: {e}"),
        })?;

    let html = body_to_html(&document_xml)?;
    debug!("extracted {} bytes of HTML", html.len());
    Ok(html)
}

/// Escape text content for embedding in HTML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Walks `word/document.xml` events and writes HTML.
#[derive(Default)]
struct BodyWriter {
    html: String,
    /// Buffer for the current table cell, when inside `w:tc`.
    cell: Option<String>,
    /// Inline HTML of the current paragraph.
    para: String,
    /// Current paragraph is a list item.
    para_is_list: bool,
    /// Heading level (1–6) from the paragraph style, when any.
    para_heading: Option<u8>,
    /// An open `<ul>` is pending closure.
    list_open: bool,
    /// Inside `w:pPr` (paragraph-mark run properties must not set run flags).
    in_para_props: bool,
    /// Current run formatting.
    run_text: String,
    run_bold: bool,
    run_italic: bool,
    run_strike: bool,
}

impl BodyWriter {
    fn close_list(&mut self) {
        if self.list_open {
            self.html.push_str("</ul>");
            self.list_open = false;
        }
    }

    fn start_paragraph(&mut self) {
        self.para.clear();
        self.para_is_list = false;
        self.para_heading = None;
    }

    fn end_paragraph(&mut self) {
        let inner = self.para.trim();
        if inner.is_empty() {
            return;
        }
        let inner = inner.to_string();

        if let Some(cell) = self.cell.as_mut() {
            // Cell paragraphs collapse to space-separated inline content;
            // the Markdown table row is a single line anyway.
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(&inner);
            return;
        }

        if let Some(level) = self.para_heading {
            self.close_list();
            self.html
                .push_str(&format!("<h{level}>{inner}</h{level}>"));
        } else if self.para_is_list {
            if !self.list_open {
                self.html.push_str("<ul>");
                self.list_open = true;
            }
            self.html.push_str(&format!("<li>{inner}</li>"));
        } else {
            self.close_list();
            self.html.push_str(&format!("<p>{inner}</p>"));
        }
    }

    fn start_run(&mut self) {
        self.run_text.clear();
        self.run_bold = false;
        self.run_italic = false;
        self.run_strike = false;
    }

    fn end_run(&mut self) {
        if self.run_text.is_empty() {
            return;
        }
        let mut piece = self.run_text.clone();
        if self.run_strike {
            piece = format!("<del>{piece}</del>");
        }
        if self.run_italic {
            piece = format!("<em>{piece}</em>");
        }
        if self.run_bold {
            piece = format!("<strong>{piece}</strong>");
        }
        self.para.push_str(&piece);
    }

    /// Heading level from a `w:pStyle` value, e.g. `Heading2` → 2.
    fn style_to_heading(value: &str) -> Option<u8> {
        if value.eq_ignore_ascii_case("Title") {
            return Some(1);
        }
        let level = value.strip_prefix("Heading")?.parse::<u8>().ok()?;
        (1..=6).contains(&level).then_some(level)
    }
}

/// `w:val` attribute of a property element, when present.
fn val_attr(element: &BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"w:val")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// A toggle property (`w:b`, `w:i`, `w:strike`) is on unless its `w:val`
/// says otherwise.
fn toggle_on(element: &BytesStart<'_>) -> bool {
    !matches!(
        val_attr(element).as_deref(),
        Some("false") | Some("0") | Some("none")
    )
}

fn body_to_html(document_xml: &[u8]) -> Result<String, MarkdocxError> {
    let mut reader = Reader::from_reader(document_xml);
    reader.config_mut().trim_text(false);

    let mut writer = BodyWriter::default();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| MarkdocxError::Extraction {
                detail: format!("malformed document XML at byte {}: {e}", reader.buffer_position()),
            })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"w:p" => {
                        writer.start_paragraph();
                        if is_empty {
                            writer.end_paragraph();
                        }
                    }
                    b"w:pPr" => writer.in_para_props = !is_empty,
                    b"w:pStyle" if writer.in_para_props => {
                        if let Some(val) = val_attr(e) {
                            writer.para_heading = BodyWriter::style_to_heading(&val);
                            if val == "ListParagraph" {
                                writer.para_is_list = true;
                            }
                        }
                    }
                    b"w:numPr" if writer.in_para_props => writer.para_is_list = true,
                    b"w:r" => {
                        writer.start_run();
                        if is_empty {
                            writer.end_run();
                        }
                    }
                    b"w:b" if !writer.in_para_props => writer.run_bold = toggle_on(e),
                    b"w:i" if !writer.in_para_props => writer.run_italic = toggle_on(e),
                    b"w:strike" if !writer.in_para_props => writer.run_strike = toggle_on(e),
                    b"w:tab" => writer.run_text.push(' '),
                    b"w:br" => writer.run_text.push_str("<br />"),
                    b"w:tbl" => {
                        writer.close_list();
                        writer.html.push_str("<table>");
                    }
                    b"w:tr" => writer.html.push_str("<tr>"),
                    b"w:tc" => writer.cell = Some(String::new()),
                    _ => {}
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:p" => writer.end_paragraph(),
                b"w:pPr" => writer.in_para_props = false,
                b"w:r" => writer.end_run(),
                b"w:tbl" => writer.html.push_str("</table>"),
                b"w:tr" => writer.html.push_str("</tr>"),
                b"w:tc" => {
                    let cell = writer.cell.take().unwrap_or_default();
                    writer
                        .html
                        .push_str(&format!("<td>{cell}</td>"));
                }
                _ => {}
            },
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| MarkdocxError::Extraction {
                    detail: format!("bad text content: {err}"),
                })?;
                writer.run_text.push_str(&escape(&text));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    writer.close_list();
    Ok(writer.html)
}
