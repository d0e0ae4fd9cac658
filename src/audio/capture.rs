use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SampleRate, SizedSample, StreamConfig};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::encode::{record, RecordedAudio};
use super::level::LevelMeter;
use crate::config::AudioConfig;

/// Errors that can occur while opening or running a capture session.
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// No usable input device (missing hardware or access denied).
    NoInputDevice,
    NoSupportedConfig,
    StreamCreation(String),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::NoInputDevice => write!(f, "No audio input device available"),
            CaptureError::NoSupportedConfig => write!(f, "No supported audio input configuration"),
            CaptureError::StreamCreation(e) => write!(f, "Failed to create audio stream: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

/// One batch of captured audio samples (16-bit PCM, interleaved).
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Milliseconds since capture started.
    pub timestamp_ms: u64,
}

/// Shared state handed to the stream callback.
#[derive(Clone)]
struct CallbackState {
    tx: mpsc::UnboundedSender<AudioFrame>,
    is_capturing: Arc<AtomicBool>,
    is_paused: Arc<AtomicBool>,
    meter: Arc<LevelMeter>,
    started: Instant,
    sample_rate: u32,
    channels: u16,
}

/// An active microphone capture with an explicit lifecycle:
/// open -> (pause/resume)* -> stop.
///
/// The cpal stream lives on a dedicated thread (streams are not Send).
/// Captured frames flow over a channel into an accumulator task; `stop`
/// tears the stream down, waits for the accumulator to drain the channel,
/// and only then yields the finished WAV buffer. Dropping the session
/// without stopping releases the device and discards the audio.
pub struct CaptureSession {
    session_id: Uuid,
    is_capturing: Arc<AtomicBool>,
    is_paused: Arc<AtomicBool>,
    meter: Arc<LevelMeter>,
    capture_thread: Option<thread::JoinHandle<()>>,
    collector: Option<tokio::task::JoinHandle<Result<RecordedAudio>>>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl CaptureSession {
    /// Open the default input device and start capturing immediately.
    ///
    /// The configured sample rate and channel count are preferences; when
    /// the device does not support them, its default configuration wins.
    pub fn open(prefs: &AudioConfig) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice)?;

        if let Ok(name) = device.name() {
            info!("Using audio input device: {}", name);
        }

        let supported = match preferred_config(&device, prefs) {
            Some(cfg) => cfg,
            None => device
                .default_input_config()
                .map_err(|_| CaptureError::NoSupportedConfig)?,
        };

        let sample_format = supported.sample_format();
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        let config: StreamConfig = supported.into();

        info!(
            "Audio config: {} Hz, {} channels, {:?}",
            sample_rate, channels, sample_format
        );

        let session_id = Uuid::new_v4();
        let is_capturing = Arc::new(AtomicBool::new(true));
        let is_paused = Arc::new(AtomicBool::new(false));
        let meter = Arc::new(LevelMeter::new());

        let (tx, rx) = mpsc::unbounded_channel::<AudioFrame>();
        let collector = tokio::spawn(record(rx, sample_rate, channels));

        let state = CallbackState {
            tx,
            is_capturing: Arc::clone(&is_capturing),
            is_paused: Arc::clone(&is_paused),
            meter: Arc::clone(&meter),
            started: Instant::now(),
            sample_rate,
            channels,
        };

        // The thread owns the stream for the whole capture. Startup errors
        // are reported back before open() returns.
        let (startup_tx, startup_rx) = std::sync::mpsc::channel::<Result<(), CaptureError>>();
        let capturing_flag = Arc::clone(&is_capturing);

        let capture_thread = thread::spawn(move || {
            let stream = match build_stream(&device, &config, sample_format, state) {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = startup_tx.send(Err(e));
                    return;
                }
            };

            if let Err(e) = stream.play() {
                let _ = startup_tx.send(Err(CaptureError::StreamCreation(e.to_string())));
                return;
            }

            let _ = startup_tx.send(Ok(()));

            while capturing_flag.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(25));
            }

            // Dropping the stream here drops the callback and with it the
            // frame sender, which lets the accumulator finish its drain.
            drop(stream);
            debug!("Capture thread exited");
        });

        match startup_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Error accessing microphone: {}", e);
                is_capturing.store(false, Ordering::SeqCst);
                collector.abort();
                let _ = capture_thread.join();
                return Err(e);
            }
            Err(_) => {
                is_capturing.store(false, Ordering::SeqCst);
                collector.abort();
                let _ = capture_thread.join();
                return Err(CaptureError::StreamCreation(
                    "capture thread exited during startup".to_string(),
                ));
            }
        }

        info!("Recording started (session {})", session_id);

        Ok(Self {
            session_id,
            is_capturing,
            is_paused,
            meter,
            capture_thread: Some(capture_thread),
            collector: Some(collector),
            sample_rate,
            channels,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Samples arriving while paused are discarded, so the final buffer
    /// stitches pre- and post-pause audio together with nothing duplicated.
    pub fn pause(&self) {
        if !self.is_capturing.load(Ordering::SeqCst) {
            return;
        }
        if !self.is_paused.swap(true, Ordering::SeqCst) {
            self.meter.reset();
            info!("Recording paused (session {})", self.session_id);
        }
    }

    pub fn resume(&self) {
        if !self.is_capturing.load(Ordering::SeqCst) {
            return;
        }
        if self.is_paused.swap(false, Ordering::SeqCst) {
            info!("Recording resumed (session {})", self.session_id);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused.load(Ordering::SeqCst)
    }

    pub fn meter(&self) -> Arc<LevelMeter> {
        Arc::clone(&self.meter)
    }

    /// Stop capturing and wait for the final flush of queued frames.
    ///
    /// Resolves even when nothing was captured, yielding a WAV buffer with
    /// an empty data chunk.
    pub async fn stop(mut self) -> Result<RecordedAudio> {
        self.is_capturing.store(false, Ordering::SeqCst);
        self.is_paused.store(false, Ordering::SeqCst);
        self.meter.reset();

        if let Some(handle) = self.capture_thread.take() {
            let joined = tokio::task::spawn_blocking(move || handle.join())
                .await
                .context("Failed to join capture thread")?;
            if joined.is_err() {
                warn!("Capture thread panicked during shutdown");
            }
        }

        let collector = self
            .collector
            .take()
            .context("Capture session already stopped")?;

        let recorded = collector
            .await
            .context("Recorder task panicked")?
            .context("Failed to assemble recording")?;

        info!(
            "Recording stopped (session {}): {} samples, {:.1}s",
            self.session_id,
            recorded.sample_count,
            recorded.duration_seconds()
        );

        Ok(recorded)
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.is_capturing.store(false, Ordering::SeqCst);
        if let Some(handle) = self.capture_thread.take() {
            let _ = handle.join();
        }
        if let Some(collector) = self.collector.take() {
            collector.abort();
        }
    }
}

/// Look for an input configuration matching the configured preferences.
fn preferred_config(
    device: &cpal::Device,
    prefs: &AudioConfig,
) -> Option<cpal::SupportedStreamConfig> {
    let ranges = device.supported_input_configs().ok()?;
    for range in ranges {
        if range.channels() != prefs.channels {
            continue;
        }
        if let Some(cfg) = range.try_with_sample_rate(SampleRate(prefs.sample_rate)) {
            return Some(cfg);
        }
    }
    None
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    state: CallbackState,
) -> Result<cpal::Stream, CaptureError> {
    match sample_format {
        SampleFormat::I16 => build_stream_typed::<i16>(device, config, state),
        SampleFormat::U16 => build_stream_typed::<u16>(device, config, state),
        SampleFormat::F32 => build_stream_typed::<f32>(device, config, state),
        _ => Err(CaptureError::NoSupportedConfig),
    }
}

fn build_stream_typed<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    state: CallbackState,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample + Send + 'static,
    i16: FromSample<T>,
{
    let err_fn = |err| error!("Audio stream error: {}", err);

    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if !state.is_capturing.load(Ordering::SeqCst)
                    || state.is_paused.load(Ordering::SeqCst)
                {
                    return;
                }

                let samples: Vec<i16> = data.iter().map(|&s| i16::from_sample(s)).collect();
                state.meter.push_samples(&samples);

                let frame = AudioFrame {
                    timestamp_ms: state.started.elapsed().as_millis() as u64,
                    sample_rate: state.sample_rate,
                    channels: state.channels,
                    samples,
                };

                // Receiver gone means we are shutting down.
                let _ = state.tx.send(frame);
            },
            err_fn,
            None,
        )
        .map_err(|e| CaptureError::StreamCreation(e.to_string()))?;

    Ok(stream)
}
