//! Password protection and removal
//!
//! Protect encrypts at serialization time with the same owner and user
//! password: whoever can open the document can also administer it.
//! Unlock authenticates against an encrypted document and re-serializes
//! it with the encryption stripped.

use crate::error::PdfToolError;
use crate::{load_document, save_document};
use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::{Object, StringFormat};
use uuid::Uuid;

/// Encrypt a document with `password` as both owner and user password.
pub fn protect_document(bytes: &[u8], password: &str) -> Result<Vec<u8>, PdfToolError> {
    if password.is_empty() {
        return Err(PdfToolError::validation("Password must not be empty"));
    }

    let mut doc = load_document(bytes)?;

    // Key derivation reads the first trailer /ID element; many
    // generators never write one, so seed it before encrypting.
    if doc.trailer.get(b"ID").is_err() {
        doc.trailer.set(
            "ID",
            Object::Array(vec![
                Object::String(
                    Uuid::new_v4().as_bytes().to_vec(),
                    StringFormat::Hexadecimal,
                ),
                Object::String(
                    Uuid::new_v4().as_bytes().to_vec(),
                    StringFormat::Hexadecimal,
                ),
            ]),
        );
    }

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: password,
        user_password: password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .map_err(|e| PdfToolError::structural(format!("Failed to derive encryption keys: {}", e)))?;

    doc.encrypt(&state)
        .map_err(|e| PdfToolError::structural(format!("Failed to encrypt PDF: {}", e)))?;

    save_document(&mut doc)
}

/// Decrypt a document and re-serialize it without encryption.
///
/// A wrong or missing password against an encrypted document is an
/// authentication error, as is supplying a password for a document that
/// is not encrypted; both are distinct from structural failures so
/// callers can prompt for a different password.
pub fn unlock_document(bytes: &[u8], password: Option<&str>) -> Result<Vec<u8>, PdfToolError> {
    let mut doc = load_document(bytes)?;

    if doc.is_encrypted() {
        let password = password.unwrap_or("");
        doc.decrypt(password).map_err(|e| {
            tracing::debug!("Decryption rejected: {}", e);
            PdfToolError::Auth("Incorrect password or unsupported encryption".to_string())
        })?;
        doc.trailer.remove(b"Encrypt");
    } else if password.is_some() {
        return Err(PdfToolError::Auth(
            "Document is not encrypted".to_string(),
        ));
    }

    save_document(&mut doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_pdf;
    use lopdf::Document;

    #[test]
    fn test_protect_empty_password_fails() {
        let pdf = create_test_pdf(1, "Lock");
        let result = protect_document(&pdf, "");
        assert!(matches!(result, Err(PdfToolError::Validation(_))));
    }

    #[test]
    fn test_protect_produces_encrypted_document() {
        let pdf = create_test_pdf(2, "Lock");
        let locked = protect_document(&pdf, "s3cret").unwrap();

        let doc = Document::load_mem(&locked).unwrap();
        assert!(doc.is_encrypted());
    }

    #[test]
    fn test_protect_seeds_missing_trailer_id() {
        let pdf = create_test_pdf(1, "Lock");
        // The input has no trailer /ID; protect must still succeed
        let doc = Document::load_mem(&pdf).unwrap();
        assert!(doc.trailer.get(b"ID").is_err());

        let locked = protect_document(&pdf, "s3cret").unwrap();
        let doc = Document::load_mem(&locked).unwrap();
        assert!(doc.is_encrypted());
        assert!(doc.trailer.get(b"ID").is_ok());
    }

    #[test]
    fn test_protect_then_unlock_round_trip() {
        let pdf = create_test_pdf(3, "Lock");
        let locked = protect_document(&pdf, "s3cret").unwrap();
        let unlocked = unlock_document(&locked, Some("s3cret")).unwrap();

        let doc = Document::load_mem(&unlocked).unwrap();
        assert!(!doc.is_encrypted());
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_unlock_wrong_password_is_auth_error() {
        let pdf = create_test_pdf(1, "Lock");
        let locked = protect_document(&pdf, "right").unwrap();

        let result = unlock_document(&locked, Some("wrong"));
        assert!(matches!(result, Err(PdfToolError::Auth(_))));
    }

    #[test]
    fn test_unlock_missing_password_is_auth_error() {
        let pdf = create_test_pdf(1, "Lock");
        let locked = protect_document(&pdf, "right").unwrap();

        let result = unlock_document(&locked, None);
        assert!(matches!(result, Err(PdfToolError::Auth(_))));
    }

    #[test]
    fn test_unlock_unencrypted_with_password_is_auth_error() {
        let pdf = create_test_pdf(1, "Open");
        let result = unlock_document(&pdf, Some("anything"));
        assert!(matches!(result, Err(PdfToolError::Auth(_))));
    }

    #[test]
    fn test_unlock_unencrypted_without_password_passes_through() {
        let pdf = create_test_pdf(2, "Open");
        let unlocked = unlock_document(&pdf, None).unwrap();

        let doc = Document::load_mem(&unlocked).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_protect_garbage_input_fails_structurally() {
        let result = protect_document(b"junk", "pw");
        assert!(matches!(result, Err(PdfToolError::Structural(_))));
    }
}
