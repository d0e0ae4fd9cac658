pub mod capture;
pub mod encode;
pub mod level;

pub use capture::{AudioFrame, CaptureError, CaptureSession};
pub use encode::{encode_wav, record, RecordedAudio};
pub use level::LevelMeter;
