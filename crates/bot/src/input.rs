//! Chat input vocabulary.

/// Direction of a stock adjustment button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockMode {
    /// Goods received: +1.
    Add,
    /// Goods written off: -1.
    Subtract,
}

impl StockMode {
    pub fn delta(self) -> i64 {
        match self {
            StockMode::Add => 1,
            StockMode::Subtract => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockMode::Add => "add",
            StockMode::Subtract => "subtract",
        }
    }

    pub fn sign(self) -> &'static str {
        match self {
            StockMode::Add => "+",
            StockMode::Subtract => "−",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(StockMode::Add),
            "subtract" => Some(StockMode::Subtract),
            _ => None,
        }
    }
}

/// Slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Balance,
    Delivery,
    Clear,
    Cancel,
}

impl Command {
    /// Parse `/name` or `/name@botname`; arguments after whitespace are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let name = text.trim().strip_prefix('/')?;
        let name = name.split_whitespace().next().unwrap_or_default();
        let name = name.split('@').next().unwrap_or_default();
        match name.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "balance" => Some(Command::Balance),
            "delivery" => Some(Command::Delivery),
            "clear" => Some(Command::Clear),
            "cancel" => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// Inline button payload.
///
/// Wire form: `item:<add|subtract>:<code>`, `dest:<code>`, `confirm:reset`,
/// `action:cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// Item codes are not validated here; the ledger rejects unknown ones.
    Item { mode: StockMode, code: String },
    Destination(String),
    ConfirmReset,
    Cancel,
}

impl Callback {
    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.splitn(3, ':');
        match (parts.next()?, parts.next(), parts.next()) {
            ("item", Some(mode), Some(code)) if !code.is_empty() => Some(Callback::Item {
                mode: StockMode::parse(mode)?,
                code: code.to_string(),
            }),
            ("dest", Some(code), None) if !code.is_empty() => {
                Some(Callback::Destination(code.to_string()))
            }
            ("confirm", Some("reset"), None) => Some(Callback::ConfirmReset),
            ("action", Some("cancel"), None) => Some(Callback::Cancel),
            _ => None,
        }
    }

    pub fn to_data(&self) -> String {
        match self {
            Callback::Item { mode, code } => format!("item:{}:{}", mode.as_str(), code),
            Callback::Destination(code) => format!("dest:{code}"),
            Callback::ConfirmReset => "confirm:reset".to_string(),
            Callback::Cancel => "action:cancel".to_string(),
        }
    }
}

/// One unit of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Button(Callback),
    Text(String),
    /// Callback data that no current keyboard produces.
    Unrecognized(String),
}

impl Input {
    /// Classify a typed message. Unknown slash commands are treated as text.
    pub fn message(text: &str) -> Self {
        match Command::parse(text) {
            Some(cmd) => Input::Command(cmd),
            None => Input::Text(text.to_string()),
        }
    }

    pub fn callback(data: &str) -> Self {
        match Callback::parse(data) {
            Some(cb) => Input::Button(cb),
            None => Input::Unrecognized(data.to_string()),
        }
    }
}
