pub mod api;
pub mod audio;
pub mod config;
pub mod session;
pub mod summary;
pub mod transcript;

pub use api::{ApiClient, ApiError, Language, TaskProgress};
pub use audio::{
    encode_wav, record, AudioFrame, CaptureError, CaptureSession, LevelMeter, RecordedAudio,
};
pub use config::{AudioConfig, Config, ServiceConfig};
pub use session::{format_elapsed, ElapsedClock, MeetingSession, Phase, StopOutcome};
pub use summary::Summary;
pub use transcript::{classify, extract_transcript, TranscriptPayload};
