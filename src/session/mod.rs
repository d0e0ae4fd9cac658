//! Meeting session management
//!
//! This module provides the `MeetingSession` abstraction that manages:
//! - Microphone capture lifecycle (start/pause/resume/stop)
//! - The upload flow (prepare task, upload segment, first transcript)
//! - Manual transcript refresh and summarization with in-flight guards
//! - Elapsed time and UI phase tracking

pub mod guard;
pub mod session;
pub mod state;

pub use guard::RequestGuard;
pub use session::{MeetingSession, StopOutcome};
pub use state::{format_elapsed, ElapsedClock, Phase};
