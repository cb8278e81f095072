//! Accessibility configuration
//!
//! Process-wide, user-selected settings read by every presentation layer
//! and by the voice components. The host app loads them at startup,
//! publishes them over a `tokio::sync::watch` channel, and republishes
//! whenever the user changes a setting.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// User-selected presentation profile.
///
/// Affects font scaling elsewhere in the app; here it drives the
/// activation affordance layout and the ambient narration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityMode {
    /// Default presentation, no automatic narration
    Standard,
    /// Enlarged UI with automatic narration
    LowVision,
    /// Large-target, voice-first presentation
    Blind,
}

impl Default for AccessibilityMode {
    fn default() -> Self {
        Self::Standard
    }
}

/// Pause between the end of the spoken prompt and opening the capture
/// device, so the microphone does not pick up the prompt's audio tail.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 550;

/// Default cap on a single listening session. The underlying capture
/// device usually enforces its own limit; this sits above it.
pub const DEFAULT_MAX_LISTEN_MS: u64 = 15_000;

fn default_voice_enabled() -> bool {
    true
}

fn default_locale() -> String {
    "es-ES".to_string()
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

fn default_max_listen_ms() -> Option<u64> {
    Some(DEFAULT_MAX_LISTEN_MS)
}

/// Accessibility settings consumed by the voice core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityConfig {
    /// Gates the entire voice feature; when false the controller is inert
    #[serde(default = "default_voice_enabled")]
    pub voice_enabled: bool,

    /// Presentation profile, also governs ambient narration
    #[serde(default)]
    pub vision_mode: AccessibilityMode,

    /// Recognition and synthesis locale, fixed per process
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Settle delay between prompt and capture, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Maximum duration of one listening session, in milliseconds.
    /// `None` leaves the limit to the capture device.
    #[serde(default = "default_max_listen_ms")]
    pub max_listen_ms: Option<u64>,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self {
            voice_enabled: default_voice_enabled(),
            vision_mode: AccessibilityMode::default(),
            locale: default_locale(),
            settle_delay_ms: default_settle_delay_ms(),
            max_listen_ms: default_max_listen_ms(),
        }
    }
}

impl AccessibilityConfig {
    /// Load settings from a JSON preferences file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| {
            format!(
                "failed to read accessibility settings at {}",
                path.display()
            )
        })?;
        let config =
            serde_json::from_str(&raw).context("failed to parse accessibility settings")?;
        Ok(config)
    }

    /// Whether screens should narrate themselves without an explicit
    /// user request. Only vision-assist modes auto-narrate.
    pub fn auto_narrate(&self) -> bool {
        matches!(
            self.vision_mode,
            AccessibilityMode::LowVision | AccessibilityMode::Blind
        )
    }

    /// Settle delay as a [`Duration`]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Listening cap as a [`Duration`], if configured
    pub fn max_listen(&self) -> Option<Duration> {
        self.max_listen_ms.map(Duration::from_millis)
    }
}
