use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::capture::AudioFrame;

/// A finished recording held in memory as a complete WAV container.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    /// Encoded WAV bytes (header plus 16-bit PCM data).
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub sample_count: usize,
    pub recorded_at: DateTime<Utc>,
}

impl RecordedAudio {
    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.sample_count as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    /// Upload file name, e.g. `recording_1716899100123.wav`.
    pub fn file_name(&self) -> String {
        format!("recording_{}.wav", self.recorded_at.timestamp_millis())
    }

    /// Write the WAV bytes to disk (the "keep a local copy" path).
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("Failed to write recording: {}", path.display()))?;
        info!("Recording saved: {}", path.display());
        Ok(())
    }
}

/// Accumulate captured frames until the channel closes, then encode them
/// as a single WAV buffer.
///
/// An empty capture still produces a valid WAV with a zero-length data
/// chunk; callers never hang waiting for audio that was never produced.
pub async fn record(
    mut rx: mpsc::UnboundedReceiver<AudioFrame>,
    sample_rate: u32,
    channels: u16,
) -> Result<RecordedAudio> {
    let mut samples: Vec<i16> = Vec::new();
    let mut frames = 0usize;

    while let Some(frame) = rx.recv().await {
        samples.extend_from_slice(&frame.samples);
        frames += 1;
    }

    debug!("Assembling recording: {} frames, {} samples", frames, samples.len());

    let bytes = encode_wav(&samples, sample_rate, channels)?;

    Ok(RecordedAudio {
        bytes,
        sample_rate,
        channels,
        sample_count: samples.len(),
        recorded_at: Utc::now(),
    })
}

/// Encode 16-bit PCM samples as a WAV container in memory.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .context("Failed to write sample to WAV buffer")?;
        }
        writer.finalize().context("Failed to finalize WAV buffer")?;
    }

    Ok(cursor.into_inner())
}
