use serde::{Deserialize, Serialize};

/// Partial structured result produced by the analysis stage and surfaced to
/// the caller before the run terminates. The skill list is stored in full;
/// truncating it for display is the consumer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPreview {
    /// Extracted skills, ordered by relevance.
    pub skills: Vec<String>,
    /// Experience-level label (e.g., "2-3 years").
    pub experience: String,
    /// Education-level label (e.g., "Bachelor's degree").
    pub education: String,
    /// Count of matching opportunities found so far.
    pub matching_jobs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let preview = AnalysisPreview {
            skills: vec!["JavaScript".to_string(), "React".to_string()],
            experience: "2-3 years".to_string(),
            education: "Bachelor's degree".to_string(),
            matching_jobs: 8,
        };

        let json = serde_json::to_value(&preview).unwrap();
        assert_eq!(json["matchingJobs"], 8);
        assert_eq!(json["skills"][0], "JavaScript");

        let back: AnalysisPreview = serde_json::from_value(json).unwrap();
        assert_eq!(back, preview);
    }
}
