//! Single-pass DOM rewriting of the extracted HTML.
//!
//! Two structural fixes for Word-flavoured HTML, applied to one parsed tree
//! before one serialisation:
//!
//! * **Table header promotion**: Word tables carry no `<th>` cells, so the
//!   Markdown engine would emit tables without a header row. Exactly one row
//!   per table is promoted, preferring a populated row over the blank
//!   lead-in row some documents start with.
//! * **Bullet glyph stripping**: list items sometimes keep a literal bullet
//!   glyph (`•`, `◦`, …) in their text. The list markup already carries the
//!   bullet, so the glyph would double up in the Markdown output.
//!
//! The invariant worth keeping is one parse, one serialise; the tree is
//! mutated in place between the two.

use html5ever::{local_name, namespace_url, ns, QualName};
use kuchikiki::traits::TendrilSink;
use kuchikiki::NodeRef;
use tracing::warn;

/// Unicode glyphs treated as redundant leading bullets inside `ul > li`.
const BULLET_GLYPHS: [char; 8] = [
    '\u{2022}', // • bullet
    '\u{25E6}', // ◦ white bullet
    '\u{25AA}', // ▪ black small square
    '\u{25AB}', // ▫ white small square
    '\u{2023}', // ‣ triangular bullet
    '\u{2043}', // ⁃ hyphen bullet
    '\u{00B7}', // · middle dot
    '\u{2219}', // ∙ bullet operator
];

/// Parse `html` once, promote table headers, strip leading bullet glyphs,
/// serialise once.
///
/// Malformed fragments are tolerated: the parser recovers best-effort and
/// the rewrites simply skip structures they do not find.
pub fn process_html(html: &str) -> String {
    let document = kuchikiki::parse_html().one(html);

    promote_table_headers(&document);
    strip_bullet_glyphs(&document);

    let mut out = Vec::new();
    match document.serialize(&mut out) {
        Ok(()) => String::from_utf8(out).unwrap_or_else(|_| html.to_string()),
        Err(e) => {
            warn!("DOM serialisation failed, passing HTML through unchanged: {e}");
            html.to_string()
        }
    }
}

// ── Table header promotion ───────────────────────────────────────────────

/// Ensure each table ends up with exactly one header row.
///
/// Per table, independently:
/// * first row already has `<th>` cells → untouched;
/// * first row empty (no cells, or every cell blank) → drop it and promote
///   the next row's cells, when a next row exists;
/// * otherwise → promote the first row's cells.
fn promote_table_headers(document: &NodeRef) {
    let tables: Vec<NodeRef> = match document.select("table") {
        Ok(sel) => sel.map(|m| m.as_node().clone()).collect(),
        Err(()) => return,
    };

    for table in tables {
        let rows: Vec<NodeRef> = match table.select("tr") {
            Ok(sel) => sel.map(|m| m.as_node().clone()).collect(),
            Err(()) => continue,
        };
        let Some(first_row) = rows.first() else {
            continue;
        };

        if row_has_header_cells(first_row) {
            continue;
        }

        if row_is_empty(first_row) {
            if let Some(next_row) = rows.get(1) {
                first_row.detach();
                retag_cells_as_headers(next_row);
            }
            // A table whose only row is blank is left alone.
        } else {
            retag_cells_as_headers(first_row);
        }
    }
}

fn row_has_header_cells(row: &NodeRef) -> bool {
    row.select("th").map_or(false, |mut sel| sel.next().is_some())
}

/// True when the row has no data cells or every cell's text is blank.
fn row_is_empty(row: &NodeRef) -> bool {
    let Ok(cells) = row.select("td") else {
        return true;
    };
    for cell in cells {
        if !cell.as_node().text_contents().trim().is_empty() {
            return false;
        }
    }
    // No cells at all also counts as empty.
    true
}

/// Replace each `<td>` in the row with a `<th>` carrying the same
/// attributes and children.
fn retag_cells_as_headers(row: &NodeRef) {
    let cells: Vec<NodeRef> = match row.select("td") {
        Ok(sel) => sel.map(|m| m.as_node().clone()).collect(),
        Err(()) => return,
    };

    for cell in cells {
        let Some(element) = cell.as_element() else {
            continue;
        };
        let th = NodeRef::new_element(
            QualName::new(None, ns!(html), local_name!("th")),
            element.attributes.borrow().map.clone(),
        );
        let children: Vec<NodeRef> = cell.children().collect();
        for child in children {
            th.append(child);
        }
        cell.insert_after(th);
        cell.detach();
    }
}

// ── Bullet glyph stripping ───────────────────────────────────────────────

/// Remove a redundant leading bullet glyph from each `ul > li`.
///
/// Ordered-list items are untouched; their markers carry semantic numbering.
fn strip_bullet_glyphs(document: &NodeRef) {
    let items: Vec<NodeRef> = match document.select("ul > li") {
        Ok(sel) => sel.map(|m| m.as_node().clone()).collect(),
        Err(()) => return,
    };

    for item in items {
        let Some(text_node) = leading_text_node(&item) else {
            continue;
        };
        if let Some(text) = text_node.as_text() {
            let mut contents = text.borrow_mut();
            if let Some(stripped) = strip_leading_bullet(&contents) {
                *contents = stripped;
            }
        }
    }
}

/// The text node at the very start of the item's inner markup, descending
/// through leading element wrappers (e.g. `<li><strong>• x</strong></li>`).
fn leading_text_node(item: &NodeRef) -> Option<NodeRef> {
    let mut current = item.first_child();
    while let Some(node) = current {
        if node.as_text().is_some() {
            return Some(node);
        }
        if node.as_element().is_some() {
            current = node.first_child();
        } else {
            break;
        }
    }
    None
}

/// Strip `whitespace* glyph whitespace*` from the start, or `None` when the
/// text does not begin with a bullet glyph.
fn strip_leading_bullet(text: &str) -> Option<String> {
    let after_ws = text.trim_start();
    let mut chars = after_ws.chars();
    let first = chars.next()?;
    if !BULLET_GLYPHS.contains(&first) {
        return None;
    }
    Some(chars.as_str().trim_start().to_string())
}
