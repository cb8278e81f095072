//! Presentation contract for the activation affordance
//!
//! The same `AccessibilityMode` that governs font scaling elsewhere
//! decides how the voice activation control is rendered. In Blind mode
//! the affordance must be a large target occupying a big fraction of
//! the interactive surface and must carry a persistent state label;
//! other modes get a small persistent control. The host UI renders
//! whatever descriptor this module computes.

use crate::config::{AccessibilityConfig, AccessibilityMode};

/// How the activation affordance occupies the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceLayout {
    /// Large-target panel anchored to the bottom of the screen
    FullBleedPanel,
    /// Small floating control in a screen corner
    FloatingCorner,
}

/// Render descriptor for the activation affordance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationPresentation {
    pub layout: SurfaceLayout,
    /// Persistent visible label, only present in Blind mode
    pub state_label: Option<&'static str>,
    /// Accessibility description announced by screen readers
    pub spoken_hint: &'static str,
}

fn spoken_hint(listening: bool) -> &'static str {
    if listening {
        "Escuchando, habla ahora"
    } else {
        "Activar comandos por voz"
    }
}

/// Compute the affordance presentation for the current settings.
///
/// Returns `None` when the voice feature is disabled: the affordance
/// renders nothing and exposes nothing.
pub fn activation_presentation(
    config: &AccessibilityConfig,
    listening: bool,
) -> Option<ActivationPresentation> {
    if !config.voice_enabled {
        return None;
    }

    let presentation = match config.vision_mode {
        AccessibilityMode::Blind => ActivationPresentation {
            layout: SurfaceLayout::FullBleedPanel,
            state_label: Some(if listening {
                "Escuchando…"
            } else {
                "Tocar para hablar"
            }),
            spoken_hint: spoken_hint(listening),
        },
        AccessibilityMode::Standard | AccessibilityMode::LowVision => ActivationPresentation {
            layout: SurfaceLayout::FloatingCorner,
            state_label: None,
            spoken_hint: spoken_hint(listening),
        },
    };
    Some(presentation)
}
