//! Events emitted by the voice core
//!
//! Every observable transition of the controller, capture session, and
//! output channel is announced on a `tokio::sync::broadcast` channel so
//! the host UI can mirror state (button pulse, listening label) without
//! reaching into the components.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// Events broadcast by the voice core during an interaction cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEvent {
    /// The activation prompt started speaking
    PromptStarted,

    /// The capture device is open and listening
    ListeningStarted,

    /// A finalized transcript arrived from the capture session
    TranscriptReceived {
        /// The recognized text, as delivered by the device
        transcript: String,
    },

    /// A transcript was interpreted and its intent executed
    IntentDispatched {
        /// The intent derived from the transcript
        intent: Intent,
    },

    /// The capture session failed (permission, hardware, no speech)
    CaptureFailed {
        /// Device-reported reason
        reason: String,
    },

    /// The listening cap elapsed without a transcript
    ListeningTimedOut,

    /// A non-interrupting utterance was discarded while speech was active
    SpeechDropped {
        /// Text of the discarded utterance
        text: String,
    },
}

impl std::fmt::Display for VoiceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceEvent::PromptStarted => write!(f, "PROMPT_STARTED"),
            VoiceEvent::ListeningStarted => write!(f, "LISTENING_STARTED"),
            VoiceEvent::TranscriptReceived { transcript } => {
                write!(f, "TRANSCRIPT_RECEIVED ({transcript:?})")
            }
            VoiceEvent::IntentDispatched { intent } => {
                write!(f, "INTENT_DISPATCHED ({intent})")
            }
            VoiceEvent::CaptureFailed { reason } => {
                write!(f, "CAPTURE_FAILED ({reason})")
            }
            VoiceEvent::ListeningTimedOut => write!(f, "LISTENING_TIMED_OUT"),
            VoiceEvent::SpeechDropped { text } => {
                write!(f, "SPEECH_DROPPED ({text:?})")
            }
        }
    }
}
