//! Reply payloads and text rendering.

use stockroom_inventory::ItemCode;

use crate::keyboard::Keyboard;

/// What the front end should show for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    /// Short transient alert (pop-up toast on chat clients).
    pub notice: Option<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            notice: None,
        }
    }

    /// Text with the main menu attached.
    pub fn menu(text: impl Into<String>) -> Self {
        Self::text(text).with_keyboard(Keyboard::main_menu())
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Fixed-width balance table in catalogue order; overdrawn rows are marked `!`.
pub fn balance_table(snapshot: &[(ItemCode, i64)]) -> String {
    let mut out = String::from("Current balance\n\n");
    out.push_str(&format!("{:<8} | {:>5}\n", "Item", "Qty"));
    out.push_str(&"-".repeat(16));
    out.push('\n');
    for (code, quantity) in snapshot {
        let flag = if *quantity < 0 { " !" } else { "" };
        out.push_str(&format!("{:<8} | {:>5}{}\n", code.as_str(), quantity, flag));
    }
    out
}

/// Format a price without trailing zeros for whole amounts.
pub fn price(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}
