//! PDF report export.
//!
//! Walks the reply text line by line: lines starting with a heading marker
//! become section titles, blank lines are skipped, everything else becomes
//! wrapped body paragraphs.

use anyhow::Result;
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 215.9; // US letter
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const BODY_SIZE_PT: f32 = 11.0;
const HEADING_SIZE_PT: f32 = 14.0;
const BODY_LEADING_MM: f32 = 6.0;
const HEADING_GAP_MM: f32 = 4.0;
const WRAP_CHARS: usize = 90;

/// Renders the reply as PDF bytes with the given document title.
pub fn render_report(title: &str, body: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
    let body_font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let heading_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;

    let mut advance = |doc: &printpdf::PdfDocumentReference,
                       layer: &mut printpdf::PdfLayerReference,
                       cursor: &mut f32,
                       step: f32| {
        *cursor -= step;
        if *cursor < MARGIN_MM {
            let (page, layer_idx) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            *layer = doc.get_page(page).get_layer(layer_idx);
            *cursor = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    };

    for raw_line in body.lines() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(heading) = heading_text(line) {
            advance(&doc, &mut layer, &mut cursor_mm, HEADING_GAP_MM);
            layer.use_text(
                heading,
                HEADING_SIZE_PT,
                Mm(MARGIN_MM),
                Mm(cursor_mm),
                &heading_font,
            );
            advance(&doc, &mut layer, &mut cursor_mm, BODY_LEADING_MM + HEADING_GAP_MM);
        } else {
            for wrapped in wrap_line(line, WRAP_CHARS) {
                layer.use_text(wrapped, BODY_SIZE_PT, Mm(MARGIN_MM), Mm(cursor_mm), &body_font);
                advance(&doc, &mut layer, &mut cursor_mm, BODY_LEADING_MM);
            }
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// A line is a section title when it starts with markdown heading markers.
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('#') {
        return None;
    }
    Some(trimmed.trim_start_matches('#').trim_start())
}

/// Greedy word wrap; words longer than the width are hard-split on a
/// character boundary.
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in line.split_whitespace() {
        let word_chars = word.chars().count();
        if current_chars > 0 && current_chars + 1 + word_chars > max_chars {
            out.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if word_chars > max_chars {
            for chunk in char_chunks(word, max_chars) {
                if current_chars > 0 {
                    out.push(std::mem::take(&mut current));
                    current_chars = 0;
                }
                current = chunk;
                current_chars = current.chars().count();
            }
            continue;
        }
        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn char_chunks(word: &str, max_chars: usize) -> Vec<String> {
    word.chars()
        .collect::<Vec<_>>()
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}
