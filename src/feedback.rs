//! Feedback cues
//!
//! Optional hook for presentation effects (sounds, animations). Nothing in
//! the core depends on a sink being installed.

use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Query input changed
    Tick,
    /// A selection started scanning
    Scan,
    /// A selection was revealed or an export completed
    Match,
    /// A history entry was removed
    Error,
    /// The session came up
    Boot,
}

pub trait FeedbackSink: Send + Sync {
    fn cue(&self, cue: Cue);
}

/// Shared, possibly absent sink
pub type Feedback = Option<Arc<dyn FeedbackSink>>;

/// Emit a cue if a sink is installed
pub fn emit(feedback: &Feedback, cue: Cue) {
    if let Some(sink) = feedback {
        sink.cue(cue);
    }
}

/// Sink that writes cues to the debug log
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn cue(&self, cue: Cue) {
        debug!("feedback cue: {:?}", cue);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every cue it receives
    #[derive(Default)]
    pub struct RecordingFeedback {
        pub cues: Mutex<Vec<Cue>>,
    }

    impl RecordingFeedback {
        pub fn take(&self) -> Vec<Cue> {
            std::mem::take(&mut *self.cues.lock().unwrap())
        }
    }

    impl FeedbackSink for RecordingFeedback {
        fn cue(&self, cue: Cue) {
            self.cues.lock().unwrap().push(cue);
        }
    }
}
