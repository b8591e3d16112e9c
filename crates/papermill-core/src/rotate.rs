//! Rotate operation
//!
//! Applies a uniform rotation delta to every page.

use crate::error::PdfToolError;
use crate::pages::{normalize_rotation, rotation};
use crate::{load_document, save_document};
use lopdf::Object;

/// Rotate every page of the document by `delta` degrees.
///
/// The new rotation is `(current + delta) mod 360`, normalized so that
/// negative deltas still land on a non-negative angle. PDF viewers only
/// honour quarter-turn rotations, so deltas that are not multiples of 90
/// are rejected up front.
pub fn rotate_document(bytes: &[u8], delta: i64) -> Result<Vec<u8>, PdfToolError> {
    if delta % 90 != 0 {
        return Err(PdfToolError::validation(format!(
            "Rotation angle must be a multiple of 90, got {}",
            delta
        )));
    }

    let mut doc = load_document(bytes)?;

    let page_ids: Vec<_> = doc.get_pages().values().copied().collect();
    for page_id in page_ids {
        let current = {
            let page_dict = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .map_err(|e| PdfToolError::structural(e.to_string()))?;
            rotation(&doc, page_dict)
        };
        let new_rotation = normalize_rotation(current + delta);

        let page_dict = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| PdfToolError::structural(e.to_string()))?;
        page_dict.set("Rotate", Object::Integer(new_rotation));
    }

    save_document(&mut doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages;
    use crate::test_util::{create_test_pdf, create_test_pdf_with_rotation};
    use lopdf::Document;

    fn first_page_rotation(bytes: &[u8]) -> i64 {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        let page_dict = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
        pages::rotation(&doc, page_dict)
    }

    #[test]
    fn test_rotate_sets_rotation_on_every_page() {
        let pdf = create_test_pdf(3, "Rot");
        let rotated = rotate_document(&pdf, 90).unwrap();

        let doc = Document::load_mem(&rotated).unwrap();
        for (_, page_id) in doc.get_pages() {
            let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
            assert_eq!(pages::rotation(&doc, page_dict), 90);
        }
    }

    #[test]
    fn test_rotate_adds_to_existing_rotation() {
        let pdf = create_test_pdf_with_rotation(1, "Rot", Some(270));
        let rotated = rotate_document(&pdf, 180).unwrap();
        assert_eq!(first_page_rotation(&rotated), 90);
    }

    #[test]
    fn test_rotate_by_360_is_a_no_op() {
        let pdf = create_test_pdf_with_rotation(1, "Rot", Some(90));
        let rotated = rotate_document(&pdf, 360).unwrap();
        assert_eq!(first_page_rotation(&rotated), 90);
    }

    #[test]
    fn test_rotate_negative_delta_normalizes() {
        let pdf = create_test_pdf(1, "Rot");
        let rotated = rotate_document(&pdf, -90).unwrap();
        assert_eq!(first_page_rotation(&rotated), 270);
    }

    #[test]
    fn test_rotate_composes_modulo_360() {
        let pdf = create_test_pdf(1, "Rot");
        let twice = rotate_document(&rotate_document(&pdf, 90).unwrap(), 180).unwrap();
        let once = rotate_document(&pdf, 270).unwrap();
        assert_eq!(first_page_rotation(&twice), first_page_rotation(&once));
    }

    #[test]
    fn test_rotate_rejects_non_quarter_turn() {
        let pdf = create_test_pdf(1, "Rot");
        let result = rotate_document(&pdf, 45);
        assert!(matches!(result, Err(PdfToolError::Validation(_))));
    }

    #[test]
    fn test_rotate_garbage_input_fails_structurally() {
        let result = rotate_document(b"nope", 90);
        assert!(matches!(result, Err(PdfToolError::Structural(_))));
    }
}
