//! Single-shot capture session management

use std::sync::Arc;

use tokio::sync::{broadcast, oneshot, Mutex};
use tracing::{debug, warn};

use crate::events::VoiceEvent;

use super::backend::{CaptureError, CaptureOutcome, RecognitionResult, RecognizerBackend};

/// Listening state owned by the capture session.
///
/// `Error` is transient: a device failure passes through it on the way
/// back to `Idle` and is reported on the event channel. The resting
/// state after any session is always `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListeningState {
    Idle,
    Listening,
    Error(String),
}

impl std::fmt::Display for ListeningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListeningState::Idle => write!(f, "Idle"),
            ListeningState::Listening => write!(f, "Listening"),
            ListeningState::Error(reason) => write!(f, "Error({reason})"),
        }
    }
}

struct SessionInner {
    state: ListeningState,
    /// Bumped on every start/stop; completion bookkeeping from a
    /// superseded session is discarded when generations differ
    generation: u64,
    last: Option<RecognitionResult>,
}

/// Await-able handle to one capture session's outcome.
///
/// Resolves `None` when the session was superseded or stopped before
/// producing an outcome.
pub struct SessionHandle {
    rx: oneshot::Receiver<CaptureOutcome>,
}

impl SessionHandle {
    /// Wait for the session outcome
    pub async fn recv(&mut self) -> Option<CaptureOutcome> {
        (&mut self.rx).await.ok()
    }
}

/// Owns the recognition device and enforces one active session
pub struct CaptureSession {
    backend: Arc<dyn RecognizerBackend>,
    locale: String,
    events: broadcast::Sender<VoiceEvent>,
    inner: Arc<Mutex<SessionInner>>,
}

impl CaptureSession {
    pub fn new(
        backend: Arc<dyn RecognizerBackend>,
        locale: &str,
        events: broadcast::Sender<VoiceEvent>,
    ) -> Self {
        Self {
            backend,
            locale: locale.to_string(),
            events,
            inner: Arc::new(Mutex::new(SessionInner {
                state: ListeningState::Idle,
                generation: 0,
                last: None,
            })),
        }
    }

    /// Whether the platform exposes a speech-to-text capability
    pub fn has_support(&self) -> bool {
        self.backend.has_support()
    }

    /// Open a single-shot capture session.
    ///
    /// Restart-wins: a still-active session is aborted first. The stored
    /// transcript is cleared before the device opens, otherwise a stale
    /// result would be replayed as a new command.
    pub async fn start(&self) -> Result<SessionHandle, CaptureError> {
        if !self.backend.has_support() {
            debug!("speech recognition unsupported, start is a no-op");
            return Err(CaptureError::Unsupported);
        }

        let mut inner = self.inner.lock().await;
        if inner.state == ListeningState::Listening {
            debug!("start while listening, aborting prior session");
            self.backend.abort();
        }
        inner.last = None;
        inner.generation += 1;
        let generation = inner.generation;

        let (done_tx, done_rx) = oneshot::channel();
        if let Err(e) = self.backend.begin(&self.locale, done_tx) {
            warn!(error = %e, "capture device failed to open");
            inner.state = ListeningState::Idle;
            let _ = self.events.send(VoiceEvent::CaptureFailed {
                reason: e.to_string(),
            });
            return Err(e);
        }
        inner.state = ListeningState::Listening;
        drop(inner);

        let (out_tx, out_rx) = oneshot::channel();
        let inner_arc = Arc::clone(&self.inner);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = match done_rx.await {
                Ok(outcome) => outcome,
                // Backend dropped the sender: session was aborted
                Err(_) => return,
            };

            let mut inner = inner_arc.lock().await;
            if inner.generation != generation {
                debug!("discarding outcome from superseded session");
                return;
            }
            match &outcome {
                CaptureOutcome::Recognized(result) => {
                    debug!(transcript = %result.transcript, "capture session finished");
                    inner.last = Some(result.clone());
                    inner.state = ListeningState::Idle;
                }
                CaptureOutcome::Failed { reason } => {
                    warn!(reason = %reason, "capture session failed");
                    inner.state = ListeningState::Error(reason.clone());
                    let _ = events.send(VoiceEvent::CaptureFailed {
                        reason: reason.clone(),
                    });
                    // No automatic retry; settle back to Idle
                    inner.state = ListeningState::Idle;
                }
            }
            drop(inner);
            let _ = out_tx.send(outcome);
        });

        Ok(SessionHandle { rx: out_rx })
    }

    /// Force the session back to `Idle`. Safe from any state.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == ListeningState::Listening {
            self.backend.abort();
        }
        inner.generation += 1;
        inner.state = ListeningState::Idle;
    }

    /// Current listening state
    pub async fn state(&self) -> ListeningState {
        self.inner.lock().await.state.clone()
    }

    /// Whether a session is currently listening
    pub async fn is_listening(&self) -> bool {
        self.inner.lock().await.state == ListeningState::Listening
    }

    /// The transcript of the last completed session, if any.
    /// Cleared by every `start`.
    pub async fn last_transcript(&self) -> Option<RecognitionResult> {
        self.inner.lock().await.last.clone()
    }
}
