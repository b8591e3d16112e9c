//! Split operation
//!
//! Extracts a selection of pages into a new document.

use crate::error::PdfToolError;
use crate::ranges::parse_page_ranges;
use crate::{load_document, save_document};
use std::collections::HashSet;

/// Extract the pages selected by `expr` (a one-based range expression
/// like "1-3,5") into a new document.
///
/// Pages come out in ascending page order regardless of the order the
/// caller wrote the tokens in: "5,1-2" yields pages 1, 2, 5. That is a
/// documented policy of the range parser, not an accident. An expression
/// that selects no valid page is a validation error.
pub fn split_document(bytes: &[u8], expr: &str) -> Result<Vec<u8>, PdfToolError> {
    let doc = load_document(bytes)?;
    let page_count = doc.get_pages().len() as u32;

    let indices = parse_page_ranges(expr, page_count);
    if indices.is_empty() {
        return Err(PdfToolError::validation(format!(
            "Page range '{}' selects no pages (document has {})",
            expr, page_count
        )));
    }

    // Keep the selection, delete everything else in reverse so earlier
    // page numbers stay valid while we go.
    let keep: HashSet<u32> = indices.iter().map(|i| i + 1).collect();
    let delete: Vec<u32> = (1..=page_count)
        .rev()
        .filter(|p| !keep.contains(p))
        .collect();

    let mut new_doc = doc;
    for page_num in delete {
        new_doc.delete_pages(&[page_num]);
    }

    new_doc.prune_objects();
    new_doc.compress();

    save_document(&mut new_doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_pdf;
    use lopdf::Document;

    #[test]
    fn test_split_empty_expression_fails() {
        let pdf = create_test_pdf(5, "Split");
        let result = split_document(&pdf, "");
        assert!(matches!(result, Err(PdfToolError::Validation(_))));
    }

    #[test]
    fn test_split_out_of_bounds_expression_fails() {
        let pdf = create_test_pdf(5, "Split");
        let result = split_document(&pdf, "0,100");
        assert!(matches!(result, Err(PdfToolError::Validation(_))));
    }

    #[test]
    fn test_split_extracts_single_page() {
        let pdf = create_test_pdf(5, "Split");
        let result = split_document(&pdf, "1").unwrap();
        let doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_split_extracts_range() {
        let pdf = create_test_pdf(10, "Split");
        let result = split_document(&pdf, "2-5").unwrap();
        let doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
    }

    #[test]
    fn test_split_unordered_tokens_come_out_ascending() {
        let pdf = create_test_pdf(5, "Order");
        let result = split_document(&pdf, "5,1-2").unwrap();

        let doc = Document::load_mem(&result).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 3);

        // Output is pages 1, 2, 5 of the original, in that order
        let first = doc.get_page_content(pages[&1]).unwrap();
        let last = doc.get_page_content(pages[&3]).unwrap();
        assert!(String::from_utf8_lossy(&first).contains("Order-Page-1"));
        assert!(String::from_utf8_lossy(&last).contains("Order-Page-5"));
    }

    #[test]
    fn test_split_then_merge_reproduces_page_count() {
        let pdf = create_test_pdf(6, "Round");
        let front = split_document(&pdf, "1-3").unwrap();
        let back = split_document(&pdf, "4-6").unwrap();

        let merged = crate::merge_documents(&[front, back]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 6);
    }

    #[test]
    fn test_split_garbage_input_fails_structurally() {
        let result = split_document(b"not a pdf", "1");
        assert!(matches!(result, Err(PdfToolError::Structural(_))));
    }
}
