use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Ring buffer capacity (~200ms at 48kHz mono).
const WINDOW_CAPACITY: usize = 10_000;

/// Number of segments in the rendered waveform bar.
const NUM_BARS: usize = 24;

/// Live input level monitor. Purely cosmetic: it never influences what
/// gets recorded or uploaded.
///
/// The capture callback pushes raw sample batches; readers poll the
/// normalized RMS level and a coarse waveform rendering once per UI tick.
pub struct LevelMeter {
    /// Latest normalized RMS, stored as f32 bits for lock-free reads.
    amplitude: AtomicU32,
    window: Mutex<VecDeque<i16>>,
}

impl LevelMeter {
    pub fn new() -> Self {
        Self {
            amplitude: AtomicU32::new(0),
            window: Mutex::new(VecDeque::with_capacity(WINDOW_CAPACITY)),
        }
    }

    /// Feed a batch of captured samples. Called from the audio callback,
    /// so it must never block: the level store is lock-free, and the
    /// window update is skipped when a reader holds the lock.
    pub fn push_samples(&self, samples: &[i16]) {
        if samples.is_empty() {
            return;
        }

        let sum_squares: f64 = samples
            .iter()
            .map(|&s| {
                let v = s as f64 / i16::MAX as f64;
                v * v
            })
            .sum();
        let rms = (sum_squares / samples.len() as f64).sqrt();
        // Typical speech sits around 0.1-0.3 RMS; scale up and clamp.
        let level = ((rms * 3.0) as f32).clamp(0.0, 1.0);
        self.amplitude.store(level.to_bits(), Ordering::Relaxed);

        let Ok(mut window) = self.window.try_lock() else {
            return;
        };
        let len = samples.len();
        if len >= WINDOW_CAPACITY {
            window.clear();
            window.extend(&samples[len - WINDOW_CAPACITY..]);
            return;
        }
        let to_remove = (window.len() + len).saturating_sub(WINDOW_CAPACITY);
        if to_remove > 0 {
            window.drain(0..to_remove);
        }
        window.extend(samples);
    }

    /// Current input level in the 0.0-1.0 range.
    pub fn level(&self) -> f32 {
        f32::from_bits(self.amplitude.load(Ordering::Relaxed))
    }

    /// Per-segment RMS over the recent window, normalized 0.0-1.0.
    pub fn waveform(&self) -> [f32; NUM_BARS] {
        let mut bars = [0.0f32; NUM_BARS];
        let window = self.window.lock().unwrap();

        if window.is_empty() {
            return bars;
        }

        let samples_per_bar = (window.len() / NUM_BARS).max(1);
        for (bar_idx, bar) in bars.iter_mut().enumerate() {
            let start = bar_idx * samples_per_bar;
            let end = ((bar_idx + 1) * samples_per_bar).min(window.len());
            if start >= window.len() || start == end {
                break;
            }

            let sum_squares: f64 = (start..end)
                .map(|i| {
                    let v = window[i] as f64 / i16::MAX as f64;
                    v * v
                })
                .sum();
            let rms = (sum_squares / (end - start) as f64).sqrt();
            *bar = (rms as f32).clamp(0.0, 1.0);
        }

        bars
    }

    /// Render the waveform as a one-line terminal bar.
    pub fn render_bar(&self) -> String {
        const GLYPHS: [char; 5] = [' ', '▂', '▄', '▆', '█'];
        self.waveform()
            .iter()
            .map(|&v| {
                let idx = ((v * (GLYPHS.len() - 1) as f32).round() as usize).min(GLYPHS.len() - 1);
                GLYPHS[idx]
            })
            .collect()
    }

    /// Clear the window and zero the level (pause/stop).
    pub fn reset(&self) {
        self.amplitude.store(0.0f32.to_bits(), Ordering::Relaxed);
        self.window.lock().unwrap().clear();
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new()
    }
}
