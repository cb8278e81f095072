//! Keyword rules for transcript interpretation
//!
//! First-match-wins over a fixed rule order. A rule fires when the
//! normalized transcript contains ANY of its keywords as a substring.
//! No word-boundary check: with a vocabulary this small the occasional
//! false positive ("recasar" contains "casa") is an accepted tradeoff.
//!
//! Rule order is part of the contract. Safety keywords run first and
//! short-circuit everything else, so an emergency can never be shadowed
//! by a broader rule. Named-destination deep links run before the
//! generic ride request, so "quiero ir al hospital" fixes the hospital
//! as destination instead of opening a blank search.

use serde::{Deserialize, Serialize};

/// The action derived from one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Safety escalation, navigates to trip status with the emergency flag
    Emergency,
    /// Return to the home screen
    GoHome,
    /// Open the trip history
    GoHistory,
    /// Spoken guidance about the profile menu, no navigation
    OpenProfile,
    /// Open destination search for a new ride
    RequestRide,
    /// Halt narration; never navigates
    Cancel,
    /// Speak the current (simulated) location
    QueryLocation,
    /// Speak the current time
    QueryTime,
    /// Ride request with a pre-filled destination
    DeepLink {
        /// Resolved destination name, e.g. "Hospital Central"
        destination: String,
    },
    /// Fallback: speak a hint listing example commands
    Unrecognized,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Emergency => write!(f, "EMERGENCY"),
            Intent::GoHome => write!(f, "GO_HOME"),
            Intent::GoHistory => write!(f, "GO_HISTORY"),
            Intent::OpenProfile => write!(f, "OPEN_PROFILE"),
            Intent::RequestRide => write!(f, "REQUEST_RIDE"),
            Intent::Cancel => write!(f, "CANCEL"),
            Intent::QueryLocation => write!(f, "QUERY_LOCATION"),
            Intent::QueryTime => write!(f, "QUERY_TIME"),
            Intent::DeepLink { destination } => write!(f, "DEEP_LINK ({destination})"),
            Intent::Unrecognized => write!(f, "UNRECOGNIZED"),
        }
    }
}

const EMERGENCY_KEYWORDS: &[&str] = &["ayuda", "socorro", "emergencia"];
const HOME_KEYWORDS: &[&str] = &["inicio", "casa", "home"];
const HISTORY_KEYWORDS: &[&str] = &["historial", "viajes"];
const PROFILE_KEYWORDS: &[&str] = &["perfil", "configuración"];
const RIDE_KEYWORDS: &[&str] = &["pedir", "necesito", "quiero ir"];
const CANCEL_KEYWORDS: &[&str] = &["cancelar"];
const TIME_KEYWORDS: &[&str] = &["hora"];
const LOCATION_KEYWORDS: &[&str] = &["dónde estoy", "ubicación"];

/// Named destinations recognized as deep links
const DESTINATIONS: &[(&str, &str)] = &[("hospital", "Hospital Central")];

/// Derive the intent for a finalized transcript.
///
/// Pure function of the lower-cased, trimmed text. Never fails;
/// unmatched input yields [`Intent::Unrecognized`].
pub fn interpret(transcript: &str) -> Intent {
    let command = transcript.trim().to_lowercase();
    if command.is_empty() {
        return Intent::Unrecognized;
    }

    let matches_any = |keywords: &[&str]| keywords.iter().any(|kw| command.contains(kw));

    if matches_any(EMERGENCY_KEYWORDS) {
        return Intent::Emergency;
    }
    if matches_any(HOME_KEYWORDS) {
        return Intent::GoHome;
    }
    if matches_any(HISTORY_KEYWORDS) {
        return Intent::GoHistory;
    }
    if matches_any(PROFILE_KEYWORDS) {
        return Intent::OpenProfile;
    }
    if let Some((_, name)) = DESTINATIONS.iter().find(|(kw, _)| command.contains(kw)) {
        return Intent::DeepLink {
            destination: (*name).to_string(),
        };
    }
    if matches_any(RIDE_KEYWORDS) {
        return Intent::RequestRide;
    }
    if matches_any(CANCEL_KEYWORDS) {
        return Intent::Cancel;
    }
    if matches_any(TIME_KEYWORDS) {
        return Intent::QueryTime;
    }
    if matches_any(LOCATION_KEYWORDS) {
        return Intent::QueryLocation;
    }

    Intent::Unrecognized
}
