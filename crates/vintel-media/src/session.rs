//! Editor session context.
//!
//! Holds the state an editor works against: which source is loaded, the
//! latest analysis, the latest auto-edit and the working timeline. Components
//! that need this state take the session explicitly.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;
use vintel_models::{AnalysisResult, AutoEditResult, EditAction, ExportClipSpec, TimelineClip};

use crate::auto_edit::AutoEditor;
use crate::cancel::CancelSignal;
use crate::config::AnalysisConfig;
use crate::error::{MediaError, MediaResult};
use crate::pipeline::VideoAnalyzer;
use crate::progress::ProgressCallback;
use crate::source::{AudioDecoder, MediaSource};

/// Which clips an export plan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportSelection {
    /// The working timeline
    #[default]
    Timeline,
    /// The highlight reel from the latest auto-edit
    HighlightReel,
}

/// One editor's view of one source.
pub struct EditorSession {
    id: Uuid,
    config: AnalysisConfig,
    progress: Option<ProgressCallback>,
    cancel: CancelSignal,
    source_id: Option<String>,
    analyzed_at: Option<DateTime<Utc>>,
    analysis: Option<AnalysisResult>,
    auto_edit: Option<AutoEditResult>,
    timeline: Vec<TimelineClip>,
}

impl EditorSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            progress: None,
            cancel: CancelSignal::none(),
            source_id: None,
            analyzed_at: None,
            analysis: None,
            auto_edit: None,
            timeline: Vec::new(),
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub fn analyzed_at(&self) -> Option<DateTime<Utc>> {
        self.analyzed_at
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn auto_edit_result(&self) -> Option<&AutoEditResult> {
        self.auto_edit.as_ref()
    }

    /// Working timeline: the whole source after analysis, the rebuilt clip
    /// list after an auto-edit.
    pub fn timeline(&self) -> &[TimelineClip] {
        &self.timeline
    }

    /// Analyze `source` and replace all prior state. On failure the session
    /// is left as it was.
    pub async fn analyze<S, D>(&mut self, source: &mut S, decoder: &D) -> MediaResult<&AnalysisResult>
    where
        S: MediaSource + ?Sized,
        D: AudioDecoder + ?Sized,
    {
        let analyzer = VideoAnalyzer::new(self.config.clone())
            .with_progress_callback(self.progress.clone())
            .with_cancel(self.cancel.clone());

        let analysis = analyzer.analyze(source, decoder).await?;

        info!(
            session_id = %self.id,
            source = source.id(),
            clips = analysis.viral_clips.len(),
            degraded = analysis.is_degraded(),
            "Session analysis replaced"
        );

        self.source_id = Some(source.id().to_string());
        self.analyzed_at = Some(Utc::now());
        self.timeline = vec![TimelineClip::new("clip-1", 0.0, analysis.duration)];
        self.auto_edit = None;

        Ok(&*self.analysis.insert(analysis))
    }

    /// Run the auto-editor over the stored analysis and adopt its clip list
    /// as the working timeline.
    pub fn auto_edit(&mut self) -> MediaResult<&AutoEditResult> {
        let analysis = self.analysis.as_ref().ok_or(MediaError::NotAnalyzed)?;
        let result = AutoEditor::from(&self.config).run(analysis);

        self.timeline = result.clips.clone();
        Ok(&*self.auto_edit.insert(result))
    }

    /// Split points on strong beats of the stored analysis.
    pub fn beat_sync_actions(&self) -> MediaResult<Vec<EditAction>> {
        let analysis = self.analysis.as_ref().ok_or(MediaError::NotAnalyzed)?;
        Ok(AutoEditor::from(&self.config).beat_sync_actions(analysis))
    }

    /// Clip specs for the export step.
    pub fn export_plan(&self, selection: ExportSelection, remove_watermark: bool) -> MediaResult<Vec<ExportClipSpec>> {
        let analysis = self.analysis.as_ref().ok_or(MediaError::NotAnalyzed)?;
        let source = self.source_id.clone().unwrap_or_default();

        let clips: Vec<TimelineClip> = match selection {
            ExportSelection::Timeline => self.timeline.clone(),
            ExportSelection::HighlightReel => {
                let reel = match &self.auto_edit {
                    Some(result) => result.highlight_reel.clone(),
                    None => AutoEditor::from(&self.config).run(analysis).highlight_reel,
                };
                reel.clips.iter().map(TimelineClip::from).collect()
            }
        };

        Ok(clips
            .iter()
            .map(|clip| ExportClipSpec::from_clip(clip, source.clone(), remove_watermark))
            .collect())
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("id", &self.id)
            .field("source_id", &self.source_id)
            .field("analyzed_at", &self.analyzed_at)
            .field("has_analysis", &self.analysis.is_some())
            .field("timeline_clips", &self.timeline.len())
            .finish()
    }
}
