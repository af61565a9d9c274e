use bytes::Bytes;
use thiserror::Error;

use crate::intake::sanitize::sanitize;

pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Reasons an upload is turned away. The display text is returned to the
/// client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a file to upload")]
    Empty,

    #[error("File size must be less than {limit}")]
    TooLarge { limit: String },

    #[error("Invalid file")]
    MissingFilename,

    #[error("Invalid filename")]
    InvalidFilename,

    #[error("Only PDF, DOC, and DOCX files are allowed")]
    UnsupportedExtension,

    #[error("Invalid file type. Only PDF, DOC, and DOCX files are allowed")]
    UnsupportedContentType,
}

/// One incoming upload, alive for the duration of a single request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub raw_filename: Option<String>,
    pub declared_content_type: Option<String>,
    pub size_bytes: u64,
    pub owner_id: String,
    pub bytes: Bytes,
}

impl UploadRequest {
    pub fn new(
        raw_filename: Option<String>,
        declared_content_type: Option<String>,
        owner_id: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        Self {
            raw_filename,
            declared_content_type,
            size_bytes: bytes.len() as u64,
            owner_id: owner_id.into(),
            bytes,
        }
    }
}

/// An upload that passed every check, with its sanitized name split at the last dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub sanitized_name: String,
    pub base_name: String,
    /// Includes the leading dot, e.g. `.pdf`.
    pub extension: String,
}

#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_bytes: u64,
}

impl UploadValidator {
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    /// Runs the checks in order and stops at the first failure.
    ///
    /// Extension and content type are both client-declared and are checked
    /// independently; the file bytes are not inspected.
    pub fn validate(&self, req: &UploadRequest) -> Result<ValidatedUpload, ValidationError> {
        if req.size_bytes == 0 || req.bytes.is_empty() {
            return Err(ValidationError::Empty);
        }

        if req.size_bytes > self.max_file_bytes {
            return Err(ValidationError::TooLarge {
                limit: size_label(self.max_file_bytes),
            });
        }

        let raw = req
            .raw_filename
            .as_deref()
            .ok_or(ValidationError::MissingFilename)?;

        let sanitized = sanitize(Some(raw))
            .filter(|s| !s.trim().is_empty())
            .ok_or(ValidationError::InvalidFilename)?;

        let lower = sanitized.to_lowercase();
        if !ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return Err(ValidationError::UnsupportedExtension);
        }

        let content_type_ok = req
            .declared_content_type
            .as_deref()
            .is_some_and(|ct| ALLOWED_CONTENT_TYPES.contains(&ct));
        if !content_type_ok {
            return Err(ValidationError::UnsupportedContentType);
        }

        // An allowed extension guarantees a dot is present.
        let dot = sanitized.rfind('.').unwrap_or(sanitized.len());
        Ok(ValidatedUpload {
            base_name: sanitized[..dot].to_string(),
            extension: sanitized[dot..].to_string(),
            sanitized_name: sanitized,
        })
    }
}

/// Human-readable ceiling, rounded up so it never reads as smaller than the limit.
fn size_label(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{}MB", bytes.div_ceil(MIB))
    } else {
        format!("{}KB", bytes.div_ceil(KIB).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &str = "application/pdf";
    const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    fn validator() -> UploadValidator {
        UploadValidator::new(5 * 1024 * 1024)
    }

    fn request(name: Option<&str>, content_type: Option<&str>, size: usize) -> UploadRequest {
        UploadRequest::new(
            name.map(String::from),
            content_type.map(String::from),
            "u1",
            Bytes::from(vec![b'%'; size]),
        )
    }

    #[test]
    fn test_accepts_pdf() {
        let v = validator()
            .validate(&request(Some("cv.pdf"), Some(PDF), 1024))
            .unwrap();
        assert_eq!(v.sanitized_name, "cv.pdf");
        assert_eq!(v.base_name, "cv");
        assert_eq!(v.extension, ".pdf");
    }

    #[test]
    fn test_accepts_uppercase_extension() {
        let v = validator()
            .validate(&request(Some("CV.DOCX"), Some(DOCX), 10))
            .unwrap();
        assert_eq!(v.extension, ".DOCX");
    }

    #[test]
    fn test_rejects_empty_file() {
        let err = validator()
            .validate(&request(Some("cv.pdf"), Some(PDF), 0))
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty);
    }

    #[test]
    fn test_rejects_oversize_with_message() {
        let err = validator()
            .validate(&request(Some("cv.pdf"), Some(PDF), 6 * 1024 * 1024))
            .unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 5MB");
    }

    #[test]
    fn test_sub_megabyte_limit_message() {
        let err = UploadValidator::new(1_000_000)
            .validate(&request(Some("cv.pdf"), Some(PDF), 1_000_001))
            .unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 977KB");
    }

    #[test]
    fn test_size_label_rounds_up() {
        assert_eq!(size_label(5 * 1024 * 1024), "5MB");
        assert_eq!(size_label(5 * 1024 * 1024 + 1), "6MB");
        assert_eq!(size_label(1024 * 1024), "1MB");
        assert_eq!(size_label(2048), "2KB");
        assert_eq!(size_label(1), "1KB");
    }

    #[test]
    fn test_exact_limit_accepted() {
        assert!(validator()
            .validate(&request(Some("cv.pdf"), Some(PDF), 5 * 1024 * 1024))
            .is_ok());
    }

    #[test]
    fn test_size_checked_before_name() {
        let err = validator()
            .validate(&request(None, None, 6 * 1024 * 1024))
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn test_rejects_missing_filename() {
        let err = validator()
            .validate(&request(None, Some(PDF), 10))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid file");
    }

    #[test]
    fn test_rejects_blank_after_sanitizing() {
        let err = validator()
            .validate(&request(Some("/// "), Some(PDF), 10))
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidFilename);
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = validator()
            .validate(&request(Some("cv.exe"), Some(PDF), 10))
            .unwrap_err();
        assert_eq!(err.to_string(), "Only PDF, DOC, and DOCX files are allowed");
    }

    #[test]
    fn test_rejects_mismatched_content_type() {
        let err = validator()
            .validate(&request(Some("cv.docx"), Some("text/plain"), 10))
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid file type"));
    }

    #[test]
    fn test_docx_declared_as_pdf_passes_independent_checks() {
        // Extension and declared type are each allow-listed on their own;
        // a pairing mismatch between two allowed values is not rejected.
        assert!(validator()
            .validate(&request(Some("cv.docx"), Some(PDF), 10))
            .is_ok());
    }

    #[test]
    fn test_content_type_must_match_exactly() {
        let err = validator()
            .validate(&request(Some("cv.pdf"), Some("application/pdf; charset=binary"), 10))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedContentType);

        let err = validator()
            .validate(&request(Some("cv.pdf"), Some("Application/PDF"), 10))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedContentType);
    }

    #[test]
    fn test_missing_content_type_rejected() {
        let err = validator()
            .validate(&request(Some("cv.pdf"), None, 10))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedContentType);
    }

    #[test]
    fn test_sanitized_name_used_for_split() {
        let v = validator()
            .validate(&request(Some("résumé/v2.pdf"), Some(PDF), 10))
            .unwrap();
        assert_eq!(v.sanitized_name, "résumév2.pdf");
        assert_eq!(v.base_name, "résumév2");
    }

    #[test]
    fn test_base_name_splits_at_last_dot() {
        let v = validator()
            .validate(&request(Some("my.cv.v3.doc"), Some("application/msword"), 10))
            .unwrap();
        assert_eq!(v.base_name, "my.cv.v3");
        assert_eq!(v.extension, ".doc");
    }
}
