use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::input::CandidateInput;

/// Rules gating which inputs may start a pipeline run. Fixed for the lifetime
/// of a run; the core reads no files or environment to build one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Accepted media types mapped to their canonical extension.
    pub accepted_types: HashMap<String, String>,
    pub max_size_bytes: u64,
}

impl ValidationPolicy {
    /// Policy for resume uploads: PDF, DOC, DOCX, TXT, RTF up to 10 MiB.
    pub fn resume_defaults() -> Self {
        let accepted_types = [
            ("application/pdf", ".pdf"),
            ("application/msword", ".doc"),
            (
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ".docx",
            ),
            ("text/plain", ".txt"),
            ("application/rtf", ".rtf"),
        ]
        .into_iter()
        .map(|(mt, ext)| (mt.to_string(), ext.to_string()))
        .collect();

        Self {
            accepted_types,
            max_size_bytes: 10 * 1024 * 1024,
        }
    }

    /// Returns the canonical extension for an accepted media type.
    pub fn extension_for(&self, media_type: &str) -> Option<&str> {
        self.accepted_types.get(media_type).map(String::as_str)
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::resume_defaults()
    }
}

/// Checks a candidate input against the policy. Pure and total: every input
/// yields either `Ok(())` or one of the two rejection variants. The declared
/// media type is trusted as-is; bytes are never inspected.
pub fn validate(input: &CandidateInput, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    if !policy.accepted_types.contains_key(&input.media_type) {
        return Err(ValidationError::UnsupportedFormat(input.media_type.clone()));
    }

    if input.size_bytes > policy.max_size_bytes {
        return Err(ValidationError::FileTooLarge {
            size: input.size_bytes,
            max: policy.max_size_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ValidationPolicy {
        ValidationPolicy::resume_defaults()
    }

    #[test]
    fn test_accepts_pdf_under_limit() {
        let input = CandidateInput::declared("resume.pdf", "application/pdf", 2 * 1024 * 1024);
        assert!(validate(&input, &policy()).is_ok());
    }

    #[test]
    fn test_rejects_unsupported_media_type() {
        let input = CandidateInput::declared("photo.png", "image/png", 1024);
        assert_eq!(
            validate(&input, &policy()),
            Err(ValidationError::UnsupportedFormat("image/png".to_string()))
        );
    }

    #[test]
    fn test_rejects_oversized_file() {
        let input = CandidateInput::declared("resume.pdf", "application/pdf", 11 * 1024 * 1024);
        assert_eq!(
            validate(&input, &policy()),
            Err(ValidationError::FileTooLarge {
                size: 11 * 1024 * 1024,
                max: 10 * 1024 * 1024,
            })
        );
    }

    #[test]
    fn test_format_checked_before_size() {
        // An oversized file of an unsupported type reports the format problem.
        let input = CandidateInput::declared("huge.png", "image/png", 100 * 1024 * 1024);
        assert!(matches!(
            validate(&input, &policy()),
            Err(ValidationError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_zero_byte_input_accepted() {
        // No size floor: an empty file of an accepted type passes.
        let input = CandidateInput::new("empty.txt", "text/plain", vec![]);
        assert!(validate(&input, &policy()).is_ok());
    }

    #[test]
    fn test_exact_limit_accepted() {
        let input = CandidateInput::declared("resume.pdf", "application/pdf", 10 * 1024 * 1024);
        assert!(validate(&input, &policy()).is_ok());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let input = CandidateInput::declared("resume.doc", "application/msword", 500);
        let p = policy();
        assert_eq!(validate(&input, &p), validate(&input, &p));
    }

    #[test]
    fn test_extension_lookup() {
        let p = policy();
        assert_eq!(p.extension_for("application/pdf"), Some(".pdf"));
        assert_eq!(p.extension_for("text/plain"), Some(".txt"));
        assert_eq!(p.extension_for("image/png"), None);
    }
}
