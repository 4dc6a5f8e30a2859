//! Per-session conversation state machine.
//!
//! `plan` is the pure transition table: it maps the current state and one
//! input to an [`Action`]. The assistant performs the action and decides the
//! follow-up state from its outcome (a rejected weight keeps the session in
//! `AwaitingWeight`). The selected destination travels inside the state and is
//! handed to the calculator explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use stockroom_core::SessionId;

use crate::input::{Callback, Command, Input, StockMode};
use crate::keyboard::{ADD_LABEL, BALANCE_LABEL, DELIVERY_LABEL, SUBTRACT_LABEL};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    /// Item keyboard shown for `mode`.
    ChoosingItem { mode: StockMode },
    /// Reset confirmation shown.
    ConfirmingReset,
    /// Destination keyboard shown.
    AwaitingDestination,
    /// Destination chosen; the next text message is the parcel weight.
    AwaitingWeight { destination: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Welcome,
    Help,
    Cancel,
    ShowBalance,
    ChooseItem(StockMode),
    Adjust { mode: StockMode, code: String },
    ConfirmReset,
    Reset,
    ChooseDestination,
    SelectDestination(String),
    Quote { destination: String, weight: String },
    /// A button from a keyboard that no longer matches the session.
    Stale,
}

/// Transition table.
pub fn plan(state: &SessionState, input: &Input) -> Action {
    match input {
        Input::Command(Command::Start) => Action::Welcome,
        Input::Command(Command::Help) => Action::Help,
        Input::Command(Command::Cancel) | Input::Button(Callback::Cancel) => Action::Cancel,
        Input::Command(Command::Balance) => Action::ShowBalance,
        Input::Command(Command::Delivery) => Action::ChooseDestination,
        Input::Command(Command::Clear) => Action::ConfirmReset,

        Input::Button(Callback::ConfirmReset) => match state {
            SessionState::ConfirmingReset => Action::Reset,
            _ => Action::Stale,
        },
        Input::Button(Callback::Item { mode, code }) => match state {
            SessionState::ChoosingItem { mode: shown } if shown == mode => Action::Adjust {
                mode: *mode,
                code: code.clone(),
            },
            _ => Action::Stale,
        },
        Input::Button(Callback::Destination(code)) => match state {
            SessionState::AwaitingDestination => Action::SelectDestination(code.clone()),
            _ => Action::Stale,
        },
        Input::Unrecognized(_) => Action::Stale,

        Input::Text(text) => match text.trim() {
            ADD_LABEL => Action::ChooseItem(StockMode::Add),
            SUBTRACT_LABEL | "−" => Action::ChooseItem(StockMode::Subtract),
            BALANCE_LABEL => Action::ShowBalance,
            DELIVERY_LABEL => Action::ChooseDestination,
            other => match state {
                SessionState::AwaitingWeight { destination } => Action::Quote {
                    destination: destination.clone(),
                    weight: other.to_string(),
                },
                _ => Action::Help,
            },
        },
    }
}

/// Session states keyed by session id.
///
/// Each session has its own mutex. `lock` hands out the guard for the whole
/// plan/perform/store cycle, so inputs of one session are handled one at a time
/// while different sessions proceed independently.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access to `session`'s state; unknown sessions start `Idle`.
    pub async fn lock(&self, session: &SessionId) -> OwnedMutexGuard<SessionState> {
        let slot = {
            let mut sessions = self.sessions.lock().await;
            sessions.entry(session.clone()).or_default().clone()
        };
        slot.lock_owned().await
    }

    pub async fn get(&self, session: &SessionId) -> SessionState {
        self.lock(session).await.clone()
    }

    pub async fn set(&self, session: &SessionId, state: SessionState) {
        *self.lock(session).await = state;
    }
}
