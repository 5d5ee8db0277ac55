//! Session state machine sequencing authorization, token exchange, activity
//! fetch and display.

mod controller;
mod session;
mod transition;

pub use controller::{FlowController, PassOutcome, View};
pub use session::{Session, Stage};
pub use transition::{transition, Action, Event};
