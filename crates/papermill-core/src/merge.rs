//! Merge operation
//!
//! Concatenates the pages of several documents into one, in input order.

use crate::error::PdfToolError;
use crate::{load_document, save_document};
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Merge two or more PDFs into a single document.
///
/// Pages are appended in input-list order, then in each document's own
/// page order; page content and rotation carry over unchanged. Object
/// IDs of every subsequent document are offset past the destination's
/// current maximum so references never collide.
pub fn merge_documents(documents: &[Vec<u8>]) -> Result<Vec<u8>, PdfToolError> {
    if documents.len() < 2 {
        return Err(PdfToolError::validation(
            "Merging requires at least two documents",
        ));
    }

    let mut loaded = Vec::with_capacity(documents.len());
    for (i, bytes) in documents.iter().enumerate() {
        let doc = load_document(bytes).map_err(|e| {
            PdfToolError::structural(format!("Document {}: {}", i + 1, e))
        })?;
        loaded.push(doc);
    }

    let mut dest = loaded.remove(0);
    let mut dest_max_id = dest.max_id;
    let mut dest_page_refs = page_references(&dest);

    for source in loaded {
        let source_pages = page_references(&source);
        let id_offset = dest_max_id;

        let mut remapped = BTreeMap::new();
        for (old_id, object) in source.objects.into_iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            remapped.insert(new_id, offset_references(object, id_offset));
        }
        dest.objects.extend(remapped);

        for page_ref in source_pages {
            dest_page_refs.push((page_ref.0 + id_offset, page_ref.1));
        }

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
    }

    rebuild_page_tree(&mut dest, dest_page_refs)?;
    dest.max_id = dest_max_id;
    dest.compress();

    save_document(&mut dest)
}

/// Page object references in page order.
fn page_references(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Recursively shift every object reference by `offset`.
fn offset_references(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| offset_references(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = offset_references(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = offset_references(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Point the destination's page tree at the combined page list.
fn rebuild_page_tree(doc: &mut Document, page_refs: Vec<ObjectId>) -> Result<(), PdfToolError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfToolError::structural("No Root reference in trailer"))?;

    let pages_id = doc
        .objects
        .get(&catalog_id)
        .ok_or_else(|| PdfToolError::structural("Catalog object missing"))?
        .as_dict()
        .map_err(|_| PdfToolError::structural("Catalog is not a dictionary"))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfToolError::structural("Catalog has no Pages reference"))?;

    match doc.objects.get_mut(&pages_id) {
        Some(Object::Dictionary(pages_dict)) => {
            let kids: Vec<Object> = page_refs.iter().map(|&id| Object::Reference(id)).collect();
            pages_dict.set("Count", Object::Integer(kids.len() as i64));
            pages_dict.set("Kids", Object::Array(kids));
        }
        _ => return Err(PdfToolError::structural("Pages root is not a dictionary")),
    }

    // Flattened tree: every page now hangs off the root node
    for id in page_refs {
        if let Some(Object::Dictionary(page_dict)) = doc.objects.get_mut(&id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(())
}
