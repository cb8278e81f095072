//! Speech capture
//!
//! Wraps single-shot speech-to-text recognition behind the
//! [`RecognizerBackend`] seam. One [`CaptureSession`] owns the
//! listening state; a new start always wins over a still-active
//! session, and the previous transcript is cleared before the device
//! opens so a stale result is never replayed as a new command.

mod backend;
mod session;

pub use backend::{CaptureError, CaptureOutcome, RecognitionResult, RecognizerBackend};
pub use session::{CaptureSession, ListeningState, SessionHandle};
