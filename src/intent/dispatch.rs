//! Intent dispatch planning
//!
//! Every matched intent carries a spoken confirmation and, for
//! navigation intents, a target route with an optional typed payload.
//! [`plan`] is pure so the full intent table can be tested without a
//! controller; executing the plan (speech + navigation) is the
//! controller's job.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::rules::Intent;

/// Navigation capability consumed by the voice core.
///
/// Implemented by the host app's router. Navigation is fire-and-forget;
/// no ordering is guaranteed between a navigation and the completion of
/// its confirmation speech.
pub trait Navigator: Send + Sync {
    /// Navigate to a route, optionally carrying a payload
    fn navigate(&self, route: Route, payload: Option<NavPayload>);
}

/// Routes the voice core navigates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Search,
    RideSelect,
    TripStatus,
    History,
}

impl Route {
    /// Router path for this route
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::Search => "/search",
            Route::RideSelect => "/ride-select",
            Route::TripStatus => "/trip-status",
            Route::History => "/history",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Structured payload attached to a navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavPayload {
    /// Emergency flag for the trip-status screen
    Emergency { active: bool },
    /// Pre-filled destination for ride selection
    Destination { name: String },
}

/// Concrete actions for one interpreted transcript
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlan {
    /// Required spoken confirmation
    pub confirmation: String,
    /// Navigation target, if the intent navigates
    pub nav: Option<(Route, Option<NavPayload>)>,
    /// Whether in-flight narration must be halted before confirming
    pub halt_speech: bool,
}

impl ActionPlan {
    fn speak_only(confirmation: &str) -> Self {
        Self {
            confirmation: confirmation.to_string(),
            nav: None,
            halt_speech: false,
        }
    }

    fn navigate(confirmation: &str, route: Route, payload: Option<NavPayload>) -> Self {
        Self {
            confirmation: confirmation.to_string(),
            nav: Some((route, payload)),
            halt_speech: false,
        }
    }
}

/// Map an intent to its action plan.
///
/// `now` feeds the spoken time query; passing it in keeps the mapping a
/// pure function.
pub fn plan(intent: &Intent, now: DateTime<Local>) -> ActionPlan {
    match intent {
        Intent::Emergency => ActionPlan::navigate(
            "Emergencia activada. Abriendo pantalla de seguridad.",
            Route::TripStatus,
            Some(NavPayload::Emergency { active: true }),
        ),
        Intent::GoHome => ActionPlan::navigate("Volviendo al inicio.", Route::Home, None),
        Intent::GoHistory => ActionPlan::navigate("Abriendo historial.", Route::History, None),
        Intent::OpenProfile => ActionPlan::speak_only("El perfil está en el menú lateral."),
        Intent::RequestRide => ActionPlan::navigate(
            "¿A dónde quieres ir? Abriendo búsqueda.",
            Route::Search,
            None,
        ),
        Intent::Cancel => ActionPlan {
            confirmation: "Operación cancelada.".to_string(),
            nav: None,
            halt_speech: true,
        },
        Intent::QueryLocation => ActionPlan::speak_only(
            "Estás en la pantalla principal. Ubicación simulada: Avenida Central 123.",
        ),
        Intent::QueryTime => ActionPlan::speak_only(&format!("Son las {}", now.format("%H:%M"))),
        Intent::DeepLink { destination } => ActionPlan::navigate(
            "Destino fijado: Hospital. Selecciona tu vehículo.",
            Route::RideSelect,
            Some(NavPayload::Destination {
                name: destination.clone(),
            }),
        ),
        Intent::Unrecognized => {
            ActionPlan::speak_only("No entendí. Intenta decir: Inicio, Historial, o Ayuda.")
        }
    }
}
