//! Controller state machine
//!
//! Drives one interaction cycle per activation:
//! prompt -> settle delay -> capture -> interpret -> confirm.
//! Runs on the cooperative scheduler; capture and synthesis completion
//! arrive as channel events, never by polling.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::capture::{CaptureError, CaptureOutcome, CaptureSession, SessionHandle};
use crate::config::AccessibilityConfig;
use crate::events::VoiceEvent;
use crate::intent::{interpret, plan, Navigator};
use crate::output::SpeakerChannel;

const PROMPT: &str = "Te escucho";
const NOTICE_UNSUPPORTED: &str =
    "El reconocimiento de voz no está disponible en este dispositivo.";
const NOTICE_CAPTURE_FAILED: &str = "No pude escucharte. Inténtalo de nuevo.";
const NOTICE_TIMED_OUT: &str = "No te escuché. Toca de nuevo para hablar.";

/// The four states of an interaction cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Resting state, waiting for user activation
    AwaitingInput,
    /// Speaking the activation prompt and settling
    Prompting,
    /// Capture device open, waiting for a transcript
    Listening,
    /// Interpreting a transcript and executing its plan
    Processing,
}

impl std::fmt::Display for ControlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlState::AwaitingInput => write!(f, "AwaitingInput"),
            ControlState::Prompting => write!(f, "Prompting"),
            ControlState::Listening => write!(f, "Listening"),
            ControlState::Processing => write!(f, "Processing"),
        }
    }
}

/// Commands from the host UI to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerCommand {
    /// User tapped the activation affordance
    Activate,
    /// Halt narration without waiting for a transcript
    Silence,
}

enum CaptureWait {
    Done(Option<CaptureOutcome>),
    TimedOut,
}

enum LoopEvent {
    Command(Option<ControllerCommand>),
    Capture(CaptureWait),
}

/// Orchestrates capture, interpretation, and spoken feedback
pub struct VoiceController {
    config: watch::Receiver<AccessibilityConfig>,
    capture: Arc<CaptureSession>,
    speaker: Arc<SpeakerChannel>,
    navigator: Arc<dyn Navigator>,
    events: broadcast::Sender<VoiceEvent>,
    state: ControlState,
    pending: Option<SessionHandle>,
    deadline: Option<Instant>,
}

impl VoiceController {
    pub fn new(
        config: watch::Receiver<AccessibilityConfig>,
        capture: Arc<CaptureSession>,
        speaker: Arc<SpeakerChannel>,
        navigator: Arc<dyn Navigator>,
        events: broadcast::Sender<VoiceEvent>,
    ) -> Self {
        Self {
            config,
            capture,
            speaker,
            navigator,
            events,
            state: ControlState::AwaitingInput,
            pending: None,
            deadline: None,
        }
    }

    /// Current controller state
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Run the controller, processing commands until the channel closes
    pub async fn run(&mut self, mut commands: mpsc::Receiver<ControllerCommand>) {
        info!(state = %self.state, "voice controller started");

        loop {
            let event = if let Some(handle) = self.pending.as_mut() {
                let deadline = self.deadline;
                tokio::select! {
                    cmd = commands.recv() => LoopEvent::Command(cmd),
                    wait = Self::await_capture(handle, deadline) => LoopEvent::Capture(wait),
                }
            } else {
                LoopEvent::Command(commands.recv().await)
            };

            match event {
                LoopEvent::Command(None) => break,
                LoopEvent::Command(Some(command)) => self.handle_command(command).await,
                LoopEvent::Capture(wait) => {
                    self.pending = None;
                    self.deadline = None;
                    self.handle_capture_outcome(wait).await;
                }
            }
        }

        info!("voice controller stopped");
    }

    async fn await_capture(handle: &mut SessionHandle, deadline: Option<Instant>) -> CaptureWait {
        match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, handle.recv()).await {
                Ok(outcome) => CaptureWait::Done(outcome),
                Err(_) => CaptureWait::TimedOut,
            },
            None => CaptureWait::Done(handle.recv().await),
        }
    }

    async fn handle_command(&mut self, command: ControllerCommand) {
        match command {
            ControllerCommand::Activate => self.handle_activate().await,
            ControllerCommand::Silence => self.speaker.stop().await,
        }
    }

    async fn handle_activate(&mut self) {
        let config = self.config.borrow().clone();
        if !config.voice_enabled {
            debug!("voice disabled, activation ignored");
            return;
        }

        match self.state {
            ControlState::AwaitingInput => self.begin_cycle(&config).await,
            ControlState::Listening => {
                // Restart-wins: reopen the capture device, no new prompt
                debug!("re-activation while listening, restarting capture");
                self.start_capture(&config).await;
            }
            ControlState::Prompting | ControlState::Processing => {
                debug!(state = %self.state, "activation ignored");
            }
        }
    }

    async fn begin_cycle(&mut self, config: &AccessibilityConfig) {
        self.transition_to(ControlState::Prompting);
        let _ = self.events.send(VoiceEvent::PromptStarted);
        // Always interrupts: the prompt must be audible over ambient narration
        self.speaker.speak(PROMPT, true).await;

        // Fixed settle delay so the microphone does not pick up the
        // prompt's own audio tail
        tokio::time::sleep(config.settle_delay()).await;

        self.start_capture(config).await;
    }

    async fn start_capture(&mut self, config: &AccessibilityConfig) {
        match self.capture.start().await {
            Ok(handle) => {
                self.pending = Some(handle);
                self.deadline = config.max_listen().map(|d| Instant::now() + d);
                self.transition_to(ControlState::Listening);
                let _ = self.events.send(VoiceEvent::ListeningStarted);
            }
            Err(CaptureError::Unsupported) => {
                warn!("speech recognition unsupported on this platform");
                self.speaker.speak(NOTICE_UNSUPPORTED, true).await;
                self.transition_to(ControlState::AwaitingInput);
            }
            Err(e) => {
                warn!(error = %e, "capture device failed to open");
                self.speaker.speak(NOTICE_CAPTURE_FAILED, true).await;
                self.transition_to(ControlState::AwaitingInput);
            }
        }
    }

    async fn handle_capture_outcome(&mut self, wait: CaptureWait) {
        match wait {
            CaptureWait::TimedOut => {
                info!("listening timed out without a transcript");
                self.capture.stop().await;
                let _ = self.events.send(VoiceEvent::ListeningTimedOut);
                self.speaker.speak(NOTICE_TIMED_OUT, true).await;
                self.transition_to(ControlState::AwaitingInput);
            }
            CaptureWait::Done(None) => {
                // Session was superseded or stopped before an outcome
                debug!("capture session ended without an outcome");
                self.transition_to(ControlState::AwaitingInput);
            }
            CaptureWait::Done(Some(CaptureOutcome::Failed { reason })) => {
                warn!(reason = %reason, "capture failed, no retry");
                self.speaker.speak(NOTICE_CAPTURE_FAILED, true).await;
                self.transition_to(ControlState::AwaitingInput);
            }
            CaptureWait::Done(Some(CaptureOutcome::Recognized(result))) => {
                self.transition_to(ControlState::Processing);
                let _ = self.events.send(VoiceEvent::TranscriptReceived {
                    transcript: result.transcript.clone(),
                });
                self.dispatch(&result.transcript).await;
                self.transition_to(ControlState::AwaitingInput);
            }
        }
    }

    async fn dispatch(&mut self, transcript: &str) {
        let intent = interpret(transcript);
        let action = plan(&intent, Local::now());
        info!(intent = %intent, "dispatching voice command");

        if action.halt_speech {
            self.speaker.stop().await;
        }
        if let Some((route, payload)) = action.nav.clone() {
            self.navigator.navigate(route, payload);
        }
        // Fire-and-forget relative to navigation
        self.speaker.speak(&action.confirmation, true).await;

        let _ = self.events.send(VoiceEvent::IntentDispatched { intent });
    }

    fn transition_to(&mut self, new_state: ControlState) {
        if new_state == self.state {
            return;
        }
        info!(from = %self.state, to = %new_state, "state transition");
        self.state = new_state;
    }
}
