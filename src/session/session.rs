use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::guard::RequestGuard;
use super::state::{format_elapsed, ElapsedClock, Phase};
use crate::api::{ApiClient, Language, TaskProgress};
use crate::audio::{CaptureSession, RecordedAudio};
use crate::config::{AudioConfig, Config};
use crate::summary::Summary;
use crate::transcript::extract_transcript;

/// Result of stopping a recording and running the upload flow.
#[derive(Debug)]
pub struct StopOutcome {
    pub task_id: String,
    /// Early transcript, when the service had one ready right away.
    pub transcript: Option<String>,
    pub recording: RecordedAudio,
}

/// One meeting session: owns the capture lifecycle, the upload flow and
/// the manually triggered transcript/summary actions.
///
/// Everything is driven from a single task; the request guards only
/// exist to keep repeated triggers from stacking concurrent calls for
/// the same task.
pub struct MeetingSession {
    api: ApiClient,
    language: Language,
    audio: AudioConfig,
    phase: Phase,
    capture: Option<CaptureSession>,
    clock: ElapsedClock,
    task_id: Option<String>,
    transcript: Option<String>,
    summary: Option<Summary>,
    transcript_guard: RequestGuard,
    summary_guard: RequestGuard,
}

impl MeetingSession {
    pub fn new(config: &Config) -> Self {
        Self {
            api: ApiClient::new(&config.service.base_url),
            language: Language::parse(&config.service.language),
            audio: config.audio.clone(),
            phase: Phase::Idle,
            capture: None,
            clock: ElapsedClock::new(),
            task_id: None,
            transcript: None,
            summary: None,
            transcript_guard: RequestGuard::new(),
            summary_guard: RequestGuard::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn default_language(&self) -> Language {
        self.language
    }

    /// Begin a new recording; clears results from the previous one.
    pub fn start(&mut self) -> Result<()> {
        if self.phase.is_capturing() {
            warn!("Recording already started");
            return Ok(());
        }

        self.summary = None;
        self.transcript = None;

        let capture = CaptureSession::open(&self.audio).context("Failed to access microphone")?;
        self.clock.start();
        self.capture = Some(capture);
        self.phase = Phase::Recording;

        Ok(())
    }

    /// No-op unless currently recording.
    pub fn pause(&mut self) {
        if self.phase != Phase::Recording {
            return;
        }
        if let Some(capture) = &self.capture {
            capture.pause();
            self.clock.pause();
            self.phase = Phase::Paused;
        }
    }

    /// No-op unless currently paused.
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        if let Some(capture) = &self.capture {
            capture.resume();
            self.clock.resume();
            self.phase = Phase::Recording;
        }
    }

    /// Stop the recording, wait for the encoder flush, and run the upload
    /// flow: prepare task -> upload the single segment -> best-effort
    /// first transcript fetch. Summarization stays manual.
    pub async fn stop(&mut self) -> Result<StopOutcome> {
        let capture = self.capture.take().context("No active recording")?;
        self.clock.pause();
        self.phase = Phase::Uploading;

        let result = match capture.stop().await {
            Ok(recorded) => self.upload_flow(recorded).await,
            Err(e) => Err(e),
        };

        // The session stays usable after a failed upload; the user can
        // record again.
        self.phase = Phase::Ready;
        result
    }

    async fn upload_flow(&mut self, recorded: RecordedAudio) -> Result<StopOutcome> {
        let file_name = recorded.file_name();
        info!(
            "Uploading recording: {} ({} bytes, {:.1}s)",
            file_name,
            recorded.byte_len(),
            recorded.duration_seconds()
        );

        let task_id = self
            .api
            .prepare_task(&file_name, recorded.byte_len(), 1)
            .await
            .context("Failed to prepare upload task")?;
        info!("Task prepared: {}", task_id);
        self.task_id = Some(task_id.clone());

        self.api
            .upload_segment(
                &task_id,
                1,
                recorded.byte_len(),
                recorded.bytes.clone(),
                &file_name,
            )
            .await
            .context("Failed to upload audio segment")?;
        info!("Upload complete for task {}", task_id);

        // The transcript may not exist yet; absence and failure here are
        // both fine, the user can refresh later.
        let transcript = match self.api.get_result(&task_id).await {
            Ok(Some(payload)) => extract_transcript(&payload),
            Ok(None) => None,
            Err(e) => {
                debug!("Initial transcript fetch failed: {}", e);
                None
            }
        };
        if let Some(text) = &transcript {
            self.transcript = Some(text.clone());
        }

        Ok(StopOutcome {
            task_id,
            transcript,
            recording: recorded,
        })
    }

    /// Manually re-fetch the transcript. Repeatable, but guarded against
    /// overlapping requests.
    pub async fn refresh_transcript(&mut self) -> Result<Option<String>> {
        let task_id = self
            .task_id
            .clone()
            .context("No task available. Record first.")?;
        let _token = self
            .transcript_guard
            .acquire()
            .context("A transcript request is already in flight")?;

        let payload = self
            .api
            .get_result(&task_id)
            .await
            .context("Failed to fetch transcript")?;

        let transcript = payload.as_ref().and_then(extract_transcript);
        if let Some(text) = &transcript {
            self.transcript = Some(text.clone());
        }
        Ok(transcript)
    }

    /// Manually request a summary; unsupported language tags were folded
    /// to English when parsed.
    pub async fn summarize(&mut self, language: Option<Language>) -> Result<Option<Summary>> {
        let task_id = self
            .task_id
            .clone()
            .context("No task available. Record first.")?;
        let _token = self
            .summary_guard
            .acquire()
            .context("A summarize request is already in flight")?;

        let language = language.unwrap_or(self.language);
        info!("Requesting summary for task {} ({})", task_id, language);

        let payload = self
            .api
            .summarize_from_task(&task_id, language)
            .await
            .context("Summarize call failed")?;

        let summary = payload.as_ref().map(Summary::from_payload);
        if summary.is_some() {
            self.summary = summary.clone();
        }
        Ok(summary)
    }

    /// Poll the service for processing progress.
    pub async fn progress(&self) -> Result<Option<TaskProgress>> {
        let task_id = self
            .task_id
            .clone()
            .context("No task available. Record first.")?;
        self.api
            .get_progress(&task_id)
            .await
            .context("Failed to fetch progress")
    }

    /// Live input level, 0.0-1.0; zero when not capturing.
    pub fn level(&self) -> f32 {
        self.capture
            .as_ref()
            .map(|c| c.meter().level())
            .unwrap_or(0.0)
    }

    /// One-line waveform rendering of recent input.
    pub fn waveform_bar(&self) -> String {
        self.capture
            .as_ref()
            .map(|c| c.meter().render_bar())
            .unwrap_or_default()
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.clock.elapsed())
    }
}
