//! Speech output
//!
//! All narration in the app flows through one [`SpeakerChannel`], which
//! owns the platform synthesis primitive behind the
//! [`SynthesizerBackend`] seam and guarantees that at most one utterance
//! is audible at any time. Screens must never talk to the audio output
//! directly.

mod channel;
mod synth;
mod voices;

pub use channel::{SpeakerChannel, SpeakingState};
pub use synth::{SynthesizerBackend, Utterance, UtteranceOutcome, VoiceInfo};
pub use voices::VoiceSelector;
