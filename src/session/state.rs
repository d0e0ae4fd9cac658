use std::time::{Duration, Instant};

/// UI phase of one meeting session:
/// idle -> recording <-> paused -> uploading -> ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recording,
    Paused,
    Uploading,
    Ready,
}

impl Phase {
    /// True while the microphone is held open.
    pub fn is_capturing(self) -> bool {
        matches!(self, Phase::Recording | Phase::Paused)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Recording => "recording",
            Phase::Paused => "paused",
            Phase::Uploading => "uploading",
            Phase::Ready => "ready",
        }
    }
}

/// Wall-clock recording timer that excludes paused intervals.
#[derive(Debug, Default)]
pub struct ElapsedClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and start counting.
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or(Duration::ZERO);
        self.accumulated + running
    }
}

/// Format an elapsed duration as `m:ss`, or `h:mm:ss` past the hour.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_under_an_hour() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0:00");
        assert_eq!(format_elapsed(Duration::from_secs(9)), "0:09");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "1:05");
        assert_eq!(format_elapsed(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn format_past_the_hour() {
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "1:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3600 + 61)), "1:01:01");
    }

    #[test]
    fn paused_time_is_excluded() {
        let mut clock = ElapsedClock::new();
        clock.start();
        std::thread::sleep(Duration::from_millis(20));
        clock.pause();

        let at_pause = clock.elapsed();
        assert!(at_pause >= Duration::from_millis(20));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(clock.elapsed(), at_pause, "clock must not advance while paused");

        clock.resume();
        std::thread::sleep(Duration::from_millis(10));
        assert!(clock.elapsed() > at_pause);
    }

    #[test]
    fn capturing_phases() {
        assert!(Phase::Recording.is_capturing());
        assert!(Phase::Paused.is_capturing());
        assert!(!Phase::Idle.is_capturing());
        assert!(!Phase::Uploading.is_capturing());
        assert!(!Phase::Ready.is_capturing());
    }
}
