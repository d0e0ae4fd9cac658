// Integration tests for recording assembly
//
// These tests drive the frame accumulator directly over its channel and
// verify the assembled WAV buffer, including the empty-recording and
// pause/resume edge cases.

use std::io::Cursor;

use anyhow::Result;
use meeting_scribe::{encode_wav, record, AudioFrame};
use tempfile::TempDir;
use tokio::sync::mpsc;

fn frame(samples: Vec<i16>, timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples,
        sample_rate: 16000,
        channels: 1,
        timestamp_ms,
    }
}

fn decode(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::new(Cursor::new(bytes)).expect("valid WAV");
    let spec = reader.spec();
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("readable samples");
    (spec, samples)
}

#[tokio::test]
async fn stopping_without_audio_still_resolves() -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<AudioFrame>();

    // Close immediately: no frame was ever produced.
    drop(tx);

    let recorded = record(rx, 16000, 1).await?;

    assert_eq!(recorded.sample_count, 0);
    assert_eq!(recorded.duration_seconds(), 0.0);

    // Still a valid WAV container with an empty data chunk.
    let (spec, samples) = decode(&recorded.bytes);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);
    assert!(samples.is_empty());

    Ok(())
}

#[tokio::test]
async fn pause_then_resume_yields_one_combined_buffer() -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<AudioFrame>();
    let handle = tokio::spawn(record(rx, 16000, 1));

    // Before the pause.
    tx.send(frame(vec![1, 2, 3], 0))?;
    tx.send(frame(vec![4, 5], 100))?;

    // While paused the capture callback emits nothing; the next frame
    // arrives much later.
    tx.send(frame(vec![6, 7, 8, 9], 5000))?;
    drop(tx);

    let recorded = handle.await??;
    assert_eq!(recorded.sample_count, 9);

    let (_, samples) = decode(&recorded.bytes);
    assert_eq!(samples, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);

    Ok(())
}

#[tokio::test]
async fn sample_count_and_duration_agree() -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<AudioFrame>();
    let handle = tokio::spawn(record(rx, 16000, 1));

    // One second of audio in 100ms batches.
    for i in 0..10 {
        tx.send(frame(vec![0i16; 1600], i * 100))?;
    }
    drop(tx);

    let recorded = handle.await??;
    assert_eq!(recorded.sample_count, 16000);
    assert!((recorded.duration_seconds() - 1.0).abs() < 1e-9);
    assert!(recorded.byte_len() > 16000 * 2);

    Ok(())
}

#[tokio::test]
async fn kept_copy_is_written_to_disk() -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<AudioFrame>();
    let handle = tokio::spawn(record(rx, 16000, 1));
    tx.send(frame(vec![10, -10, 20, -20], 0))?;
    drop(tx);

    let recorded = handle.await??;
    assert!(recorded.file_name().starts_with("recording_"));
    assert!(recorded.file_name().ends_with(".wav"));

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("meetings").join(recorded.file_name());
    recorded.save_to(&path)?;

    let on_disk = std::fs::read(&path)?;
    assert_eq!(on_disk, recorded.bytes);

    Ok(())
}

#[test]
fn encode_wav_preserves_format() -> Result<()> {
    let bytes = encode_wav(&[100, -100, 200], 48000, 2)?;
    let (spec, samples) = decode(&bytes);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples, vec![100, -100, 200]);
    Ok(())
}
