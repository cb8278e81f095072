//! Recognizer backend seam
//!
//! The platform speech-to-text primitive (browser API, OS framework,
//! test double) is injected through [`RecognizerBackend`]. Completion is
//! delivered over an explicit `oneshot` handle rather than ambient
//! callbacks, so a session result belongs to exactly one owner.

use tokio::sync::oneshot;

/// Finalized output of one capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    /// Recognized text, as delivered by the device
    pub transcript: String,
    /// Always true for single-shot recognition; interim results are
    /// never surfaced
    pub is_final: bool,
}

/// Terminal outcome of a begun session. Exactly one per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The device produced a finalized transcript
    Recognized(RecognitionResult),
    /// Permission denied, hardware failure, or no speech detected
    Failed {
        /// Device-reported reason
        reason: String,
    },
}

/// Errors raised when opening a capture session
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("speech recognition is not available on this platform")]
    Unsupported,

    #[error("capture device error: {0}")]
    Device(String),
}

/// Platform speech-to-text capability.
///
/// Implementations must resolve `done` at most once per `begin`; an
/// aborted session may either drop the sender or resolve it as
/// [`CaptureOutcome::Failed`].
pub trait RecognizerBackend: Send + Sync + 'static {
    /// Whether the platform exposes a speech-to-text capability
    fn has_support(&self) -> bool;

    /// Open the device for one single-shot recognition in `locale`
    fn begin(
        &self,
        locale: &str,
        done: oneshot::Sender<CaptureOutcome>,
    ) -> Result<(), CaptureError>;

    /// Abort the in-flight recognition, if any
    fn abort(&self);
}
