//! Synthesizer backend seam

use tokio::sync::oneshot;

/// One voice reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Platform identifier for the voice
    pub id: String,
    /// BCP-47 style locale tag, e.g. "es-ES" or "es-419"
    pub locale: String,
}

/// One discrete spoken-output request. Not retained after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// Whether this utterance pre-empted prior speech
    pub interrupt_prior: bool,
}

/// How an utterance ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceOutcome {
    /// Spoken to the end
    Completed,
    /// Cancelled before completion
    Cancelled,
    /// The platform reported a synthesis error
    Failed,
}

/// Platform speech synthesis capability.
///
/// Implementations must resolve `done` exactly once per `utter`,
/// including when the utterance is cancelled.
pub trait SynthesizerBackend: Send + Sync + 'static {
    /// Currently available voices. May be empty right after startup;
    /// platforms are allowed to report their voice list late.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Start speaking one utterance with the given voice (platform
    /// default when `None`)
    fn utter(
        &self,
        utterance: &Utterance,
        voice: Option<&VoiceInfo>,
        done: oneshot::Sender<UtteranceOutcome>,
    );

    /// Cancel the in-flight utterance, if any
    fn cancel(&self);
}
