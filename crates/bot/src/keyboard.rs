//! Button layouts.

use stockroom_delivery::TariffTable;
use stockroom_inventory::ItemCode;

use crate::input::{Callback, StockMode};

pub const ADD_LABEL: &str = "+";
pub const SUBTRACT_LABEL: &str = "-";
pub const BALANCE_LABEL: &str = "Balance";
pub const DELIVERY_LABEL: &str = "Delivery";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub callback: Callback,
}

impl Button {
    fn new(label: impl Into<String>, callback: Callback) -> Self {
        Self {
            label: label.into(),
            callback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent menu whose buttons send their label as a text message.
    Menu(Vec<Vec<String>>),
    /// Buttons attached to a single reply, answered with callback data.
    Inline(Vec<Vec<Button>>),
}

impl Keyboard {
    /// Main menu: `+ -` on the first row, `Balance Delivery` on the second.
    pub fn main_menu() -> Self {
        Keyboard::Menu(vec![
            vec![ADD_LABEL.to_string(), SUBTRACT_LABEL.to_string()],
            vec![BALANCE_LABEL.to_string(), DELIVERY_LABEL.to_string()],
        ])
    }

    /// One button per catalogue item, four per row, then a back button.
    pub fn items(mode: StockMode) -> Self {
        let buttons: Vec<Button> = ItemCode::all()
            .map(|code| {
                Button::new(
                    format!("{} {}", mode.sign(), code),
                    Callback::Item {
                        mode,
                        code: code.as_str().to_string(),
                    },
                )
            })
            .collect();

        let mut rows: Vec<Vec<Button>> = buttons.chunks(4).map(<[Button]>::to_vec).collect();
        rows.push(vec![back()]);
        Keyboard::Inline(rows)
    }

    /// One button per destination, two per row, then a back button.
    pub fn destinations(tariffs: &TariffTable) -> Self {
        let buttons: Vec<Button> = tariffs
            .destinations()
            .map(|t| Button::new(t.display_name.clone(), Callback::Destination(t.code.clone())))
            .collect();

        let mut rows: Vec<Vec<Button>> = buttons.chunks(2).map(<[Button]>::to_vec).collect();
        rows.push(vec![back()]);
        Keyboard::Inline(rows)
    }

    pub fn confirm_reset() -> Self {
        Keyboard::Inline(vec![
            vec![Button::new("Yes, clear everything", Callback::ConfirmReset)],
            vec![Button::new("Cancel", Callback::Cancel)],
        ])
    }

    pub fn cancel_only() -> Self {
        Keyboard::Inline(vec![vec![Button::new("Cancel", Callback::Cancel)]])
    }

    /// Every button in reading order.
    pub fn buttons(&self) -> Vec<&Button> {
        match self {
            Keyboard::Menu(_) => Vec::new(),
            Keyboard::Inline(rows) => rows.iter().flatten().collect(),
        }
    }
}

fn back() -> Button {
    Button::new("Back", Callback::Cancel)
}
