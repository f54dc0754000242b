//! Dialogue side of the shutter quoting assistant.
//!
//! The dialogue framework owns the conversation and calls in here by name:
//! - **Actions** (`actions`) compute quotes and reply with messages and slot events.
//! - **Forms** (`forms`) validate slot values as they are collected, with a bounded number
//!   of retries per slot before the conversation is reset.
//! - **Runtime** (`runtime`) dispatches both and converts every failure into a reply.
//!
//! Prices always come from the catalog and the deterministic quote assembler in
//! `tapparelle-core`; nothing here derives a price from user text.

pub mod actions;
pub mod events;
pub mod forms;
pub mod runtime;

pub use events::{ActionResponse, BotMessage, Button, DialogueEvent};
pub use forms::{FormOutcome, FormState};
pub use runtime::AgentRuntime;
