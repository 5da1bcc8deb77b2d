//! Plain-text extraction from uploaded resume files.

use thiserror::Error;

use crate::storage::UploadedFile;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}. Upload a PDF or plain text file")]
    Unsupported(String),

    #[error("Could not read PDF text: {0}")]
    Pdf(String),

    #[error("Text file is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Content type wins; the file extension is the fallback.
    pub fn detect(content_type: Option<&str>, extension: Option<&str>) -> Option<Self> {
        let by_type = content_type.and_then(|ct| {
            let mime = ct.split(';').next().unwrap_or(ct).trim();
            match mime {
                "application/pdf" => Some(DocumentKind::Pdf),
                "text/plain" | "text/markdown" => Some(DocumentKind::PlainText),
                _ => None,
            }
        });
        by_type.or_else(|| match extension {
            Some("pdf") => Some(DocumentKind::Pdf),
            Some("txt") | Some("md") => Some(DocumentKind::PlainText),
            _ => None,
        })
    }
}

/// Extracts the raw text of an uploaded resume. CPU-bound for PDFs.
pub fn extract_text(file: &UploadedFile) -> Result<String, ExtractError> {
    let extension = file.extension();
    let kind = DocumentKind::detect(file.content_type.as_deref(), extension.as_deref())
        .ok_or_else(|| {
            ExtractError::Unsupported(
                file.content_type
                    .clone()
                    .or(extension)
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })?;

    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(&file.bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string())),
        DocumentKind::PlainText => Ok(String::from_utf8(file.bytes.to_vec())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(name: &str, content_type: Option<&str>, body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: Some(name.to_string()),
            content_type: content_type.map(String::from),
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn test_detect_by_content_type() {
        assert_eq!(
            DocumentKind::detect(Some("application/pdf"), None),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect(Some("text/plain; charset=utf-8"), Some("pdf")),
            Some(DocumentKind::PlainText)
        );
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(
            DocumentKind::detect(Some("application/octet-stream"), Some("pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::detect(None, Some("md")), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::detect(None, Some("docx")), None);
    }

    #[test]
    fn test_plain_text_is_decoded() {
        let file = upload("cv.txt", Some("text/plain"), b"Ada Lovelace\nEngineer");
        assert_eq!(extract_text(&file).unwrap(), "Ada Lovelace\nEngineer");
    }

    #[test]
    fn test_docx_is_unsupported() {
        let file = upload(
            "cv.docx",
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            b"PK",
        );
        assert!(matches!(extract_text(&file), Err(ExtractError::Unsupported(_))));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let file = upload("cv.txt", None, b"\xff\xfe");
        assert!(matches!(extract_text(&file), Err(ExtractError::Encoding(_))));
    }
}
