//! Conversation layer: turns chat input into ledger and pricing calls.
//!
//! Transport-agnostic: inputs are plain text messages, slash commands or
//! button callback data, and every reply is data (`Reply`) that a front end
//! renders however it likes.

pub mod assistant;
pub mod input;
pub mod keyboard;
pub mod reply;
pub mod session;

pub use assistant::Assistant;
pub use input::{Callback, Command, Input, StockMode};
pub use keyboard::{Button, Keyboard};
pub use reply::Reply;
pub use session::{Action, SessionState, SessionStore, plan};
