//! Page geometry helpers
//!
//! MediaBox and /Rotate may live on the page itself or be inherited from
//! the parent page-tree node; both lookups fall back accordingly.

use lopdf::{Dictionary, Document, Object};

/// US Letter, the fallback when no MediaBox is present anywhere.
const LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Get the MediaBox for a page, inheriting from the parent node if the
/// page does not carry one.
pub fn media_box(doc: &Document, page_dict: &Dictionary) -> [f64; 4] {
    if let Some(rect) = dict_box(page_dict) {
        return rect;
    }

    if let Some(parent_dict) = parent_dict(doc, page_dict) {
        if let Some(rect) = dict_box(parent_dict) {
            return rect;
        }
    }

    LETTER
}

/// Get the rotation for a page, inheriting from the parent node,
/// normalized to {0, 90, 180, 270}.
pub fn rotation(doc: &Document, page_dict: &Dictionary) -> i64 {
    if let Ok(angle) = page_dict.get(b"Rotate").and_then(Object::as_i64) {
        return normalize_rotation(angle);
    }

    if let Some(parent_dict) = parent_dict(doc, page_dict) {
        if let Ok(angle) = parent_dict.get(b"Rotate").and_then(Object::as_i64) {
            return normalize_rotation(angle);
        }
    }

    0
}

/// Normalize an angle in degrees to a non-negative value below 360.
pub fn normalize_rotation(angle: i64) -> i64 {
    angle.rem_euclid(360)
}

fn parent_dict<'a>(doc: &'a Document, page_dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = page_dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.objects.get(&parent_id)?.as_dict().ok()
}

fn dict_box(dict: &Dictionary) -> Option<[f64; 4]> {
    let array = dict.get(b"MediaBox").ok()?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut rect = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        rect[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => return None,
        };
    }
    Some(rect)
}
