//! Auto-edit output models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clip::ViralClipCandidate;

/// Kind of timeline edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EditActionType {
    Cut,
    Trim,
    Split,
    Speed,
    Transition,
}

impl EditActionType {
    /// Returns the type as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Trim => "trim",
            Self::Split => "split",
            Self::Speed => "speed",
            Self::Transition => "transition",
        }
    }
}

/// Icon tag rendered next to an action in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EditIcon {
    Scissors,
    Sparkles,
    Gauge,
    Music,
}

/// A single suggested edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditAction {
    /// Kind of edit
    #[serde(rename = "type")]
    pub action_type: EditActionType,

    /// Start in seconds
    pub start_time: f64,

    /// End in seconds (equal to start for point edits)
    pub end_time: f64,

    /// Human-readable description
    pub label: String,

    /// How sure the editor is about this edit (0.0-1.0)
    pub confidence: f64,

    /// Icon tag
    pub icon: EditIcon,

    /// Playback rate for speed actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl EditAction {
    /// Length of the affected span in seconds.
    pub fn span(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

/// A clip in the rebuilt timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineClip {
    /// Clip id, unique within one timeline
    pub id: String,
    /// In-point in seconds
    pub start_time: f64,
    /// Out-point in seconds
    pub end_time: f64,
    /// Length in seconds
    pub duration: f64,
}

impl TimelineClip {
    pub fn new(id: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            duration: end_time - start_time,
        }
    }
}

impl From<&ViralClipCandidate> for TimelineClip {
    fn from(candidate: &ViralClipCandidate) -> Self {
        Self {
            id: candidate.id.clone(),
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            duration: candidate.duration,
        }
    }
}

/// Time-ordered selection of top candidates within a duration budget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightReel {
    /// Selected candidates, ordered by start time
    pub clips: Vec<ViralClipCandidate>,
    /// Sum of selected durations in seconds
    pub total_duration: f64,
    /// Mean score of the selected candidates (0 when empty)
    pub estimated_viral_score: u32,
}

impl HighlightReel {
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Everything the auto-editor produces for one analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoEditResult {
    /// Timeline with silent spans removed
    pub clips: Vec<TimelineClip>,
    /// Suggested edits, ordered by start time
    pub actions: Vec<EditAction>,
    /// Duration-bounded best-of selection
    pub highlight_reel: HighlightReel,
}

impl AutoEditResult {
    /// Actions of one kind, in timeline order.
    pub fn actions_of(&self, action_type: EditActionType) -> impl Iterator<Item = &EditAction> {
        self.actions
            .iter()
            .filter(move |a| a.action_type == action_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_serializes_as_type() {
        let action = EditAction {
            action_type: EditActionType::Transition,
            start_time: 4.8,
            end_time: 5.2,
            label: "Transition".to_string(),
            confidence: 0.8,
            icon: EditIcon::Sparkles,
            speed: None,
        };

        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "transition");
        assert_eq!(json["icon"], "sparkles");
        assert!(json.get("speed").is_none());
        assert!((action.span() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_timeline_clip_duration() {
        let clip = TimelineClip::new("clip-1", 2.0, 5.5);
        assert!((clip.duration - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_actions_of_filters_by_type() {
        let cut = EditAction {
            action_type: EditActionType::Cut,
            start_time: 0.0,
            end_time: 1.0,
            label: "cut".to_string(),
            confidence: 0.9,
            icon: EditIcon::Scissors,
            speed: None,
        };
        let result = AutoEditResult {
            actions: vec![cut.clone(), cut],
            ..Default::default()
        };

        assert_eq!(result.actions_of(EditActionType::Cut).count(), 2);
        assert_eq!(result.actions_of(EditActionType::Speed).count(), 0);
    }
}
