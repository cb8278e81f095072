//! rumbo-voice: hands-free voice interaction core for the Rumbo
//! accessible ride-hailing app
//!
//! This crate provides:
//! - Single-shot speech capture sessions behind a [`RecognizerBackend`] seam
//! - A serialized speech output channel enforcing at-most-one utterance
//! - A keyword-based command interpreter with fixed rule priority
//! - A controller state machine orchestrating prompt, capture, and dispatch
//!
//! The host application owns the UI and the platform speech primitives.
//! It injects backends and a [`Navigator`] at startup, distributes
//! [`AccessibilityConfig`] over a `tokio::sync::watch` channel, and drives
//! the controller with [`ControllerCommand`]s. Screens request narration
//! exclusively through [`SpeakerChannel`]; nothing else may talk to the
//! audio output primitive.

pub mod capture;
pub mod config;
pub mod controller;
pub mod events;
pub mod intent;
pub mod output;

pub use capture::{
    CaptureError, CaptureOutcome, CaptureSession, ListeningState, RecognitionResult,
    RecognizerBackend, SessionHandle,
};
pub use config::{AccessibilityConfig, AccessibilityMode};
pub use controller::{
    activation_presentation, ActivationPresentation, ControlState, ControllerCommand,
    SurfaceLayout, VoiceController,
};
pub use events::VoiceEvent;
pub use intent::{interpret, plan, ActionPlan, Intent, NavPayload, Navigator, Route};
pub use output::{
    SpeakerChannel, SpeakingState, SynthesizerBackend, Utterance, UtteranceOutcome, VoiceInfo,
};
