//! Watermark operation
//!
//! Overlays a line of text, centered, on every page of a document.

use crate::config::WatermarkStyle;
use crate::error::PdfToolError;
use crate::pages::media_box;
use crate::{load_document, save_document};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Resource names registered on each page for the overlay. Prefixed to
/// stay clear of names an authoring tool is likely to have used.
const FONT_KEY: &str = "PmWmF0";
const GSTATE_KEY: &str = "PmWmG0";

/// Overlay `text` on every page, horizontally and vertically centered in
/// unrotated page coordinates.
///
/// The overlay is appended as an extra content stream after the page's
/// existing content, drawn in Helvetica-Bold at the configured size,
/// grey level, and opacity. Horizontal centering uses the rendered width
/// of the string at that size. Single line only: no wrapping and no
/// rotation-aware placement.
pub fn watermark_document(
    bytes: &[u8],
    text: &str,
    style: &WatermarkStyle,
) -> Result<Vec<u8>, PdfToolError> {
    if text.trim().is_empty() {
        return Err(PdfToolError::validation("Watermark text must not be blank"));
    }

    let mut doc = load_document(bytes)?;

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let gstate_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => Object::Real(style.opacity),
        "CA" => Object::Real(style.opacity),
    });

    let text_width = text_width(text, style.font_size);

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in page_ids {
        let rect = {
            let page_dict = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .map_err(|e| PdfToolError::structural(e.to_string()))?;
            media_box(&doc, page_dict)
        };

        let x = (rect[0] + rect[2]) / 2.0 - f64::from(text_width) / 2.0;
        let y = (rect[1] + rect[3]) / 2.0 - f64::from(style.font_size) / 2.0;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("gs", vec![Object::Name(GSTATE_KEY.into())]),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(FONT_KEY.into()),
                        Object::Real(style.font_size),
                    ],
                ),
                Operation::new(
                    "rg",
                    vec![
                        Object::Real(style.gray),
                        Object::Real(style.gray),
                        Object::Real(style.gray),
                    ],
                ),
                Operation::new("Td", vec![Object::Real(x as f32), Object::Real(y as f32)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        text.as_bytes().to_vec(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| PdfToolError::structural(e.to_string()))?;
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        attach_resources(&mut doc, page_id, font_id, gstate_id)?;
        append_content(&mut doc, page_id, overlay_id)?;
    }

    save_document(&mut doc)
}

/// Register the watermark font and graphics state in the page's resource
/// dictionary. Effective resources may be direct, referenced, or
/// inherited from the parent node; the merged copy is written back as a
/// direct dictionary so inherited entries survive.
fn attach_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    gstate_id: ObjectId,
) -> Result<(), PdfToolError> {
    let mut resources = effective_resources(doc, page_id);

    let fonts = subdictionary(&mut resources, b"Font");
    fonts.set(FONT_KEY, Object::Reference(font_id));

    let gstates = subdictionary(&mut resources, b"ExtGState");
    gstates.set(GSTATE_KEY, Object::Reference(gstate_id));

    let page_dict = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfToolError::structural(e.to_string()))?;
    page_dict.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Resolve the page's effective resource dictionary to an owned copy.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let page_dict = match doc.get_object(page_id).and_then(Object::as_dict) {
        Ok(dict) => dict,
        Err(_) => return Dictionary::new(),
    };

    for dict in [Some(page_dict), parent_of(doc, page_dict)].into_iter().flatten() {
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(res)) => return res.clone(),
            Ok(Object::Reference(id)) => {
                if let Ok(res) = doc.get_object(*id).and_then(Object::as_dict) {
                    return res.clone();
                }
            }
            _ => {}
        }
    }

    Dictionary::new()
}

fn parent_of<'a>(doc: &'a Document, page_dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = page_dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.objects.get(&parent_id)?.as_dict().ok()
}

/// Get or create a named sub-dictionary, replacing indirect entries with
/// direct ones.
fn subdictionary<'a>(resources: &'a mut Dictionary, key: &[u8]) -> &'a mut Dictionary {
    if !matches!(resources.get(key), Ok(Object::Dictionary(_))) {
        resources.set(key, Object::Dictionary(Dictionary::new()));
    }
    match resources.get_mut(key) {
        Ok(Object::Dictionary(dict)) => dict,
        _ => unreachable!("just set"),
    }
}

/// Append the overlay stream after the page's existing content.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    overlay_id: ObjectId,
) -> Result<(), PdfToolError> {
    let page_dict = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfToolError::structural(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(Object::Array(existing)) => {
            let mut arr = existing.clone();
            arr.push(Object::Reference(overlay_id));
            arr
        }
        Ok(other @ Object::Reference(_)) => {
            vec![other.clone(), Object::Reference(overlay_id)]
        }
        _ => vec![Object::Reference(overlay_id)],
    };
    page_dict.set("Contents", Object::Array(contents));
    Ok(())
}

/// Rendered width of `text` in Helvetica-Bold at `font_size` points.
fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(glyph_width).map(u32::from).sum();
    units as f32 * font_size / 1000.0
}

/// Helvetica-Bold advance width in 1/1000 em units for the printable
/// ASCII range; anything outside it gets the average lowercase width.
fn glyph_width(c: char) -> u16 {
    const WIDTHS: [u16; 95] = [
        278, 333, 474, 556, 556, 889, 722, 238, // space ! " # $ % & '
        333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
        556, 556, 556, 556, 556, 556, 556, 556, // 0-7
        556, 556, 333, 333, 584, 584, 584, 611, // 8 9 : ; < = > ?
        975, 722, 722, 722, 722, 667, 611, 778, // @ A-G
        722, 278, 556, 722, 611, 833, 722, 778, // H-O
        667, 778, 722, 667, 611, 722, 667, 944, // P-W
        667, 667, 611, 333, 278, 333, 584, 556, // X Y Z [ \ ] ^ _
        333, 556, 611, 556, 611, 556, 333, 611, // ` a-g
        611, 278, 278, 556, 278, 889, 611, 611, // h-o
        611, 611, 389, 556, 333, 611, 556, 778, // p-w
        556, 556, 500, 389, 280, 389, 584, // x y z { | } ~
    ];

    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        WIDTHS[(code - 0x20) as usize]
    } else {
        556
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_pdf;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_watermark_blank_text_fails() {
        let pdf = create_test_pdf(1, "Wm");
        let result = watermark_document(&pdf, "   ", &WatermarkStyle::default());
        assert!(matches!(result, Err(PdfToolError::Validation(_))));
    }

    #[test]
    fn test_watermark_preserves_page_count() {
        let pdf = create_test_pdf(3, "Wm");
        let marked = watermark_document(&pdf, "CONFIDENTIAL", &WatermarkStyle::default()).unwrap();

        let doc = Document::load_mem(&marked).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_watermark_appends_overlay_to_every_page() {
        let pdf = create_test_pdf(2, "Wm");
        let marked = watermark_document(&pdf, "DRAFT", &WatermarkStyle::default()).unwrap();

        let doc = Document::load_mem(&marked).unwrap();
        for (_, page_id) in doc.get_pages() {
            let content = doc.get_page_content(page_id).unwrap();
            let content = String::from_utf8_lossy(&content);
            // Original content stays, overlay comes after it
            assert!(content.contains("Wm-Page-"));
            assert!(content.contains("DRAFT"));
        }
    }

    #[test]
    fn test_watermark_registers_font_and_gstate() {
        let pdf = create_test_pdf(1, "Wm");
        let marked = watermark_document(&pdf, "DRAFT", &WatermarkStyle::default()).unwrap();

        let doc = Document::load_mem(&marked).unwrap();
        let pages = doc.get_pages();
        let page_dict = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
        let resources = page_dict.get(b"Resources").unwrap().as_dict().unwrap();
        assert!(resources.get(b"Font").is_ok());
        assert!(resources.get(b"ExtGState").is_ok());
    }

    #[test]
    fn test_watermark_garbage_input_fails_structurally() {
        let result = watermark_document(b"junk", "X", &WatermarkStyle::default());
        assert!(matches!(result, Err(PdfToolError::Structural(_))));
    }

    #[test]
    fn test_text_width_scales_with_font_size() {
        let narrow = text_width("iii", 50.0);
        let wide = text_width("WWW", 50.0);
        assert!(narrow < wide);
        assert_eq!(text_width("AB", 100.0), text_width("AB", 50.0) * 2.0);
    }

    #[test]
    fn test_glyph_width_known_values() {
        assert_eq!(glyph_width(' '), 278);
        assert_eq!(glyph_width('0'), 556);
        assert_eq!(glyph_width('W'), 944);
        // Outside printable ASCII falls back to the average width
        assert_eq!(glyph_width('é'), 556);
    }
}
