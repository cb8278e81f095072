//! Command interpretation and dispatch
//!
//! Maps finalized transcripts to intents via keyword matching over an
//! ordered rule list ([`rules`]) and turns each intent into a concrete
//! action plan — confirmation speech plus optional navigation
//! ([`dispatch`]).

mod dispatch;
mod rules;

pub use dispatch::{plan, ActionPlan, NavPayload, Navigator, Route};
pub use rules::{interpret, Intent};
