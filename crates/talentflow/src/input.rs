use std::path::Path;

/// A document submitted for processing. Immutable once accepted: the
/// orchestrator only ever reads it.
#[derive(Debug, Clone)]
pub struct CandidateInput {
    pub id: String,
    /// Display name, usually the original file name.
    pub name: String,
    /// Declared media type (e.g., "application/pdf"). Declared by the caller
    /// or guessed from the name; the content is never sniffed.
    pub media_type: String,
    pub size_bytes: u64,
    /// Byte payload, when the caller hands the bytes over directly. Hosts that
    /// keep the file behind a handle leave this `None` and declare the size.
    pub bytes: Option<Vec<u8>>,
}

impl CandidateInput {
    fn new_internal(
        name: String,
        media_type: String,
        size_bytes: u64,
        bytes: Option<Vec<u8>>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            media_type,
            size_bytes,
            bytes,
        }
    }

    /// Creates an input from an in-memory payload with an explicit media type.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new_internal(name.into(), media_type.into(), size, Some(bytes))
    }

    /// Creates an input whose bytes stay with the caller; only the declared
    /// size and media type participate in validation.
    pub fn declared(
        name: impl Into<String>,
        media_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self::new_internal(name.into(), media_type.into(), size_bytes, None)
    }

    /// Creates an input guessing the media type from the file name extension.
    /// Falls back to "application/octet-stream" for unknown extensions.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = detect_media_type(&name)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let size = bytes.len() as u64;
        Self::new_internal(name, media_type, size, Some(bytes))
    }
}

/// Detects a media type from a file name using the mime_guess crate.
/// Returns `None` for unknown extensions.
fn detect_media_type(name: &str) -> Option<String> {
    mime_guess::from_path(Path::new(name))
        .first()
        .map(|m| m.to_string())
}

/// Formats a byte count for human-readable messages ("2.5 MB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = (bytes as f64).log(1024.0).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    // Trim trailing zeros the way a UI would ("2 MB", not "2.00 MB")
    let rounded = (value * 100.0).round() / 100.0;
    if (rounded - rounded.trunc()).abs() < f64::EPSILON {
        format!("{} {}", rounded.trunc() as u64, UNITS[exp])
    } else {
        format!("{} {}", rounded, UNITS[exp])
    }
}
