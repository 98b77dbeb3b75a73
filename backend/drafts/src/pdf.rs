//! PDF rendering for the printable draft channel.
//!
//! Produces a single letter-size page: a fixed title, then one text line per
//! newline-delimited segment of the draft, drawn at x=100 with 20-unit
//! spacing. Lines that would run past the bottom margin are dropped rather
//! than paginated. Output contains no timestamps or random identifiers, so
//! rendering the same draft twice yields byte-identical documents.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use restock_core::RestockError;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_X: i64 = 100;
const TITLE_Y: i64 = 750;
const BODY_START_Y: i64 = 720;
const LINE_SPACING: i64 = 20;
const BOTTOM_MARGIN: i64 = 40;
const FONT_SIZE: i64 = 12;

const TITLE: &str = "RESTOCK ORDER";

/// Render the draft text into PDF bytes. Generation happens lazily at
/// export time, never at draft-creation time.
pub fn render(text: &str) -> Result<Vec<u8>, RestockError> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = text_operations(TITLE, MARGIN_X, TITLE_Y);
    let mut y = BODY_START_Y;
    for line in text.lines() {
        if y < BOTTOM_MARGIN {
            break;
        }
        operations.extend(text_operations(line, MARGIN_X, y));
        y -= LINE_SPACING;
    }

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| RestockError::Export(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RestockError::Export(e.to_string()))?;
    Ok(buffer)
}

fn text_operations(line: &str, x: i64, y: i64) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(line)]),
        Operation::new("ET", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_pdf_header() {
        let bytes = render("URGENT REORDER\nRed Bull 8-pack x 36 units").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let text = "URGENT REORDER\nRed Bull 8-pack x 36 units\nDelivery: Nov 21";
        let first = render(text).unwrap();
        let second = render(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn body_lines_appear_in_the_content_stream() {
        let bytes = render("Line one\nLine two").unwrap();
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(haystack.contains("RESTOCK ORDER"));
        assert!(haystack.contains("Line one"));
        assert!(haystack.contains("Line two"));
    }

    #[test]
    fn overflow_lines_are_dropped_not_paginated() {
        let long_text: String = (0..200)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = render(&long_text).unwrap();
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(haystack.contains("line 0"));
        assert!(!haystack.contains("line 199"));
    }

    #[test]
    fn empty_draft_still_renders_the_title() {
        let bytes = render("").unwrap();
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(haystack.contains("RESTOCK ORDER"));
    }
}
