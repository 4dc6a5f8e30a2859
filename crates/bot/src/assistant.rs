//! Conversation handler: executes planned actions against the ledger and the
//! tariff table.

use stockroom_core::{DomainError, SessionId};
use stockroom_delivery::{OveragePolicy, TariffTable, Weight, calculate_cost};
use stockroom_inventory::{LedgerError, StockLedger};

use crate::input::{Input, StockMode};
use crate::keyboard::Keyboard;
use crate::reply::{self, Reply};
use crate::session::{Action, SessionState, SessionStore, plan};

pub struct Assistant<L> {
    ledger: L,
    tariffs: TariffTable,
    policy: OveragePolicy,
    sessions: SessionStore,
}

impl<L> Assistant<L>
where
    L: StockLedger,
{
    pub fn new(ledger: L, tariffs: TariffTable, policy: OveragePolicy) -> Self {
        Self {
            ledger,
            tariffs,
            policy,
            sessions: SessionStore::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub async fn state(&self, session: &SessionId) -> SessionState {
        self.sessions.get(session).await
    }

    /// Handle one input for `session` and return the reply to show.
    ///
    /// Failures never escape: they are turned into replies and the session
    /// falls back to a state from which the user can continue.
    pub async fn handle(&self, session: &SessionId, input: Input) -> Reply {
        // Held until the next state is stored: a second press of the same
        // button waits here and then sees the updated state.
        let mut guard = self.sessions.lock(session).await;
        let state = guard.clone();
        let action = plan(&state, &input);
        tracing::debug!(session = %session, ?state, ?action, "planned action");

        let (reply, next) = self.perform(state.clone(), action).await;
        if next != state {
            tracing::debug!(session = %session, from = ?state, to = ?next, "session transition");
        }
        *guard = next;
        reply
    }

    async fn perform(&self, state: SessionState, action: Action) -> (Reply, SessionState) {
        match action {
            Action::Welcome => (
                Reply::menu("Warehouse accounting is ready.\nChoose an action below:"),
                SessionState::Idle,
            ),
            Action::Help => (Reply::menu(help_text()), state),
            Action::Cancel => (Reply::menu("Action cancelled."), SessionState::Idle),
            Action::ShowBalance => (self.balance().await, SessionState::Idle),
            Action::ChooseItem(mode) => {
                let label = match mode {
                    StockMode::Add => "RECEIPT",
                    StockMode::Subtract => "WRITE-OFF",
                };
                (
                    Reply::text(format!("Mode: {label}\nChoose an item:"))
                        .with_keyboard(Keyboard::items(mode)),
                    SessionState::ChoosingItem { mode },
                )
            }
            Action::Adjust { mode, code } => (self.adjust(mode, &code).await, SessionState::Idle),
            Action::ConfirmReset => (
                Reply::text("WARNING! You are about to zero the whole warehouse.\nAre you sure?")
                    .with_keyboard(Keyboard::confirm_reset()),
                SessionState::ConfirmingReset,
            ),
            Action::Reset => (self.reset().await, SessionState::Idle),
            Action::ChooseDestination => (
                Reply::text("Choose a destination:")
                    .with_keyboard(Keyboard::destinations(&self.tariffs)),
                SessionState::AwaitingDestination,
            ),
            Action::SelectDestination(code) => self.select_destination(code),
            Action::Quote {
                destination,
                weight,
            } => self.quote(destination, &weight),
            Action::Stale => (
                Reply::menu("This button is no longer active.")
                    .with_notice("Button expired"),
                state,
            ),
        }
    }

    async fn balance(&self) -> Reply {
        match self.ledger.snapshot().await {
            Ok(snapshot) => Reply::menu(reply::balance_table(&snapshot)),
            Err(err) => ledger_failure(err),
        }
    }

    async fn adjust(&self, mode: StockMode, code: &str) -> Reply {
        let delta = mode.delta();
        match self.ledger.adjust(code, delta).await {
            Ok(quantity) => {
                let notice = match mode {
                    StockMode::Subtract if quantity < 0 => {
                        "Warning! Balance is negative!".to_string()
                    }
                    StockMode::Add => format!("Added: {code}"),
                    StockMode::Subtract => format!("Written off: {code}"),
                };
                Reply::menu(format!(
                    "Updated\n\nItem: {code}\nChange: {delta:+} pcs\nCurrent balance: {quantity}"
                ))
                .with_notice(notice)
            }
            Err(err) => ledger_failure(err),
        }
    }

    async fn reset(&self) -> Reply {
        match self.ledger.reset_all().await {
            Ok(()) => Reply::menu("Warehouse cleared: every balance is 0."),
            Err(err) => ledger_failure(err),
        }
    }

    fn select_destination(&self, code: String) -> (Reply, SessionState) {
        match self.tariffs.get(&code) {
            Some(tariff) => (
                Reply::text(format!(
                    "Destination: {}\nEnter the parcel weight in kg (e.g. 0.3 or 1,5):",
                    tariff.display_name
                ))
                .with_keyboard(Keyboard::cancel_only()),
                SessionState::AwaitingWeight { destination: code },
            ),
            None => (
                Reply::text(format!("No such destination: {code}"))
                    .with_keyboard(Keyboard::destinations(&self.tariffs)),
                SessionState::AwaitingDestination,
            ),
        }
    }

    fn quote(&self, destination: String, weight_text: &str) -> (Reply, SessionState) {
        let result = Weight::parse(weight_text).and_then(|weight| {
            calculate_cost(&self.tariffs, &destination, weight.kg(), self.policy)
                .map(|cost| (weight, cost))
        });

        match result {
            Ok((weight, cost)) => {
                let name = self
                    .tariffs
                    .get(&destination)
                    .map(|t| t.display_name.as_str())
                    .unwrap_or(destination.as_str());
                tracing::info!(destination = %destination, weight = weight.kg(), cost, "delivery quoted");
                (
                    Reply::menu(format!(
                        "Delivery to {name}\nWeight: {} kg\nCost: {}",
                        weight.kg(),
                        reply::price(cost)
                    )),
                    SessionState::Idle,
                )
            }
            Err(DomainError::InvalidWeight(reason)) => (
                Reply::text(format!(
                    "Invalid weight ({reason}). Enter a positive number of kilograms:"
                ))
                .with_keyboard(Keyboard::cancel_only()),
                SessionState::AwaitingWeight { destination },
            ),
            Err(err) => (Reply::menu(format!("Cannot quote delivery: {err}")), SessionState::Idle),
        }
    }
}

fn help_text() -> String {
    [
        "Use the buttons below:",
        "+ / - : receive or write off one unit of an item",
        "Balance : current stock of every item",
        "Delivery : shipping cost for a parcel",
        "/clear : zero the whole warehouse",
        "/cancel : abort the current action",
    ]
    .join("\n")
}

fn ledger_failure(err: LedgerError) -> Reply {
    match err {
        LedgerError::Domain(DomainError::UnknownItem(code)) => {
            Reply::menu(format!("Unknown item: {code}"))
        }
        LedgerError::Domain(other) => Reply::menu(format!("Request rejected: {other}")),
        LedgerError::Storage(msg) => {
            tracing::error!(error = %msg, "ledger operation failed");
            Reply::menu("Storage is unavailable right now. Please try again.")
                .with_notice("Try again")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use stockroom_infra::InMemoryLedger;
    use stockroom_inventory::{ItemCode, LedgerResult, StockLevel};

    use crate::input::{Callback, Command};

    fn session() -> SessionId {
        SessionId::new("tester").unwrap()
    }

    async fn assistant() -> Assistant<Arc<InMemoryLedger>> {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.initialize().await.unwrap();
        Assistant::new(ledger, TariffTable::builtin(), OveragePolicy::Fractional)
    }

    /// Ledger whose store is always down.
    struct BrokenLedger;

    #[async_trait::async_trait]
    impl StockLedger for BrokenLedger {
        async fn initialize(&self) -> LedgerResult<()> {
            Err(LedgerError::Storage("disk full".to_string()))
        }
        async fn adjust(&self, _code: &str, _delta: i64) -> LedgerResult<i64> {
            Err(LedgerError::Storage("disk full".to_string()))
        }
        async fn levels(&self) -> LedgerResult<Vec<StockLevel>> {
            Err(LedgerError::Storage("disk full".to_string()))
        }
        async fn reset_all(&self) -> LedgerResult<()> {
            Err(LedgerError::Storage("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn subtract_below_zero_warns() {
        let bot = assistant().await;
        let s = session();

        bot.handle(&s, Input::Text("-".to_string())).await;
        let reply = bot
            .handle(
                &s,
                Input::Button(Callback::Item {
                    mode: StockMode::Subtract,
                    code: "11".to_string(),
                }),
            )
            .await;

        assert_eq!(reply.notice.as_deref(), Some("Warning! Balance is negative!"));
        assert!(reply.text.contains("Current balance: -1"));
        assert!(reply.text.contains("Change: -1 pcs"));
        assert_eq!(bot.state(&s).await, SessionState::Idle);
    }

    #[tokio::test]
    async fn invalid_weight_keeps_waiting_for_weight() {
        let bot = assistant().await;
        let s = session();

        bot.handle(&s, Input::Command(Command::Delivery)).await;
        bot.handle(&s, Input::Button(Callback::Destination("kz".to_string())))
            .await;
        let reply = bot.handle(&s, Input::Text("zero".to_string())).await;

        assert!(reply.text.starts_with("Invalid weight"));
        assert_eq!(
            bot.state(&s).await,
            SessionState::AwaitingWeight {
                destination: "kz".to_string()
            }
        );

        let reply = bot.handle(&s, Input::Text("0,5".to_string())).await;
        assert!(reply.text.contains("Cost: 520"), "{}", reply.text);
        assert_eq!(bot.state(&s).await, SessionState::Idle);
    }

    #[tokio::test]
    async fn ceiling_policy_is_applied_when_configured() {
        let ledger = Arc::new(InMemoryLedger::new());
        let bot = Assistant::new(ledger, TariffTable::builtin(), OveragePolicy::CeilKilogram);
        let s = session();

        bot.handle(&s, Input::Command(Command::Delivery)).await;
        bot.handle(&s, Input::Button(Callback::Destination("ru".to_string())))
            .await;
        let reply = bot.handle(&s, Input::Text("1.5".to_string())).await;
        assert!(reply.text.contains("Cost: 420"), "{}", reply.text);
    }

    #[tokio::test]
    async fn unknown_destination_button_stays_on_destination_choice() {
        let bot = assistant().await;
        let s = session();

        bot.handle(&s, Input::Command(Command::Delivery)).await;
        let reply = bot
            .handle(&s, Input::Button(Callback::Destination("mars".to_string())))
            .await;
        assert!(reply.text.contains("No such destination"));
        assert_eq!(bot.state(&s).await, SessionState::AwaitingDestination);
    }

    #[tokio::test]
    async fn unknown_item_button_is_reported() {
        let bot = assistant().await;
        let s = session();

        bot.handle(&s, Input::Text("+".to_string())).await;
        let reply = bot
            .handle(
                &s,
                Input::Button(Callback::Item {
                    mode: StockMode::Add,
                    code: "999".to_string(),
                }),
            )
            .await;
        assert_eq!(reply.text, "Unknown item: 999");
        let snapshot = bot.ledger().snapshot().await.unwrap();
        assert!(snapshot.iter().all(|(_, q)| *q == 0));
    }

    #[tokio::test]
    async fn storage_failures_ask_to_try_again() {
        let bot = Assistant::new(BrokenLedger, TariffTable::builtin(), OveragePolicy::default());
        let s = session();

        let reply = bot.handle(&s, Input::Text("Balance".to_string())).await;
        assert!(reply.text.contains("try again"));
        assert_eq!(reply.notice.as_deref(), Some("Try again"));
        assert_eq!(reply.keyboard, Some(Keyboard::main_menu()));
    }

    #[tokio::test]
    async fn stale_confirmation_does_not_reset() {
        let bot = assistant().await;
        let s = session();
        bot.ledger().adjust("3", 4).await.unwrap();

        let reply = bot.handle(&s, Input::Button(Callback::ConfirmReset)).await;
        assert_eq!(reply.notice.as_deref(), Some("Button expired"));
        let three = ItemCode::parse("3").unwrap();
        assert!(bot.ledger().snapshot().await.unwrap().contains(&(three, 4)));
    }

    #[tokio::test]
    async fn simultaneous_presses_of_one_button_apply_once() {
        let bot = assistant().await;
        let s = session();
        let press = || {
            Input::Button(Callback::Item {
                mode: StockMode::Add,
                code: "05".to_string(),
            })
        };

        bot.handle(&s, Input::Text("+".to_string())).await;
        let (first, second) = tokio::join!(bot.handle(&s, press()), bot.handle(&s, press()));

        let mut notices = vec![first.notice, second.notice];
        notices.sort();
        assert_eq!(
            notices,
            vec![Some("Added: 05".to_string()), Some("Button expired".to_string())]
        );
        let snapshot = bot.ledger().snapshot().await.unwrap();
        assert_eq!(snapshot[0], (ItemCode::parse("05").unwrap(), 1));
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let bot = assistant().await;
        let alice = SessionId::new("alice").unwrap();
        let bob = SessionId::new("bob").unwrap();

        bot.handle(&alice, Input::Command(Command::Delivery)).await;
        bot.handle(&bob, Input::Text("+".to_string())).await;

        assert_eq!(bot.state(&alice).await, SessionState::AwaitingDestination);
        assert_eq!(
            bot.state(&bob).await,
            SessionState::ChoosingItem {
                mode: StockMode::Add
            }
        );
    }
}
