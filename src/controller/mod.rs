//! Voice interaction controller
//!
//! Orchestrates the interaction cycle: spoken prompt, fixed settle
//! delay, single-shot capture, interpretation, and confirmation speech.
//! Also owns the presentation contract for the activation affordance.

mod machine;
mod presentation;

pub use machine::{ControlState, ControllerCommand, VoiceController};
pub use presentation::{activation_presentation, ActivationPresentation, SurfaceLayout};
