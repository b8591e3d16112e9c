//! Document transformation core
//!
//! Takes one or more uploaded documents, applies a single structural or
//! format transformation, and hands back the transformed bytes. In-memory
//! edits (merge, split, rotate, watermark, protect, unlock) go through
//! lopdf; size compression and office conversion are delegated to
//! external tools (Ghostscript, LibreOffice) with managed temp-artifact
//! lifecycles.
//!
//! Every operation is a pure request-scoped transformation: nothing is
//! persisted, and failures are terminal for the request that raised them.

pub mod config;
pub mod error;
pub mod external;
pub mod merge;
pub mod pages;
pub mod protect;
pub mod ranges;
pub mod rotate;
pub mod split;
pub mod watermark;

pub use config::{ExternalToolsConfig, WatermarkStyle};
pub use error::PdfToolError;
pub use external::{compress_pdf, convert_office, ConvertedFile, TempArtifact, TempScope, TempStore};
pub use merge::merge_documents;
pub use protect::{protect_document, unlock_document};
pub use ranges::parse_page_ranges;
pub use rotate::rotate_document;
pub use split::split_document;
pub use watermark::watermark_document;

use lopdf::Document;

/// Load a document from raw bytes, mapping parse failures to the
/// structural error category.
pub(crate) fn load_document(bytes: &[u8]) -> Result<Document, PdfToolError> {
    Document::load_mem(bytes).map_err(|e| PdfToolError::structural(e.to_string()))
}

/// Serialize a document back to bytes.
pub(crate) fn save_document(doc: &mut Document) -> Result<Vec<u8>, PdfToolError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfToolError::structural(format!("Failed to save PDF: {}", e)))?;
    Ok(buffer)
}

/// Parse PDF bytes and return the page count.
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfToolError> {
    let doc = load_document(bytes)?;
    Ok(doc.get_pages().len() as u32)
}

#[cfg(test)]
pub(crate) mod test_util {
    use lopdf::{dictionary, Dictionary, Document, Object, Stream};

    /// Build a minimal valid PDF with `num_pages` pages, each carrying an
    /// identifiable text content stream.
    pub fn create_test_pdf(num_pages: u32, content_prefix: &str) -> Vec<u8> {
        create_test_pdf_with_rotation(num_pages, content_prefix, None)
    }

    /// Same as [`create_test_pdf`] but with an explicit /Rotate entry on
    /// every page.
    pub fn create_test_pdf_with_rotation(
        num_pages: u32,
        content_prefix: &str,
        rotation: Option<i64>,
    ) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for page_num in 0..num_pages {
            let content = format!(
                "BT /F1 12 Tf 50 700 Td ({}-Page-{}) Tj ET",
                content_prefix,
                page_num + 1
            );
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            };
            if let Some(angle) = rotation {
                page_dict.set("Rotate", Object::Integer(angle));
            }
            let page_id = doc.add_object(page_dict);
            page_ids.push(Object::Reference(page_id));
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(num_pages as i64),
            "Kids" => Object::Array(page_ids),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}
