//! JSON report printed by `vintel analyze`.

use anyhow::{Context, Result};
use serde::Serialize;
use vintel_models::{AnalysisResult, AutoEditResult, EditAction, ExportClipSpec};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub session_id: String,
    pub source: &'a str,
    pub analysis: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_edit: Option<&'a AutoEditResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beat_sync: Option<Vec<EditAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_plan: Option<Vec<ExportClipSpec>>,
}

/// Serialize any value, pretty or compact.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vintel_models::AudioProvenance;

    fn empty_analysis() -> AnalysisResult {
        AnalysisResult {
            frames: Vec::new(),
            scenes: Vec::new(),
            audio: Vec::new(),
            beats: Vec::new(),
            silent_regions: Vec::new(),
            viral_clips: Vec::new(),
            waveform: Vec::new(),
            duration: 4.0,
            audio_provenance: AudioProvenance::Synthetic,
        }
    }

    #[test]
    fn test_optional_sections_are_omitted() {
        let analysis = empty_analysis();
        let report = Report {
            session_id: "s-1".to_string(),
            source: "clip.mp4",
            analysis: &analysis,
            auto_edit: None,
            beat_sync: None,
            export_plan: None,
        };

        let value: serde_json::Value = serde_json::from_str(&to_json(&report, false).unwrap()).unwrap();
        assert_eq!(value["source"], "clip.mp4");
        assert_eq!(value["sessionId"], "s-1");
        assert!(value.get("autoEdit").is_none());
        assert!(value.get("beatSync").is_none());
        assert!(value["analysis"].is_object());
    }
}
