//! Domain layer of the Tella chat client.
//!
//! Holds everything the chat view reasons about without touching the
//! network: the session and its transcript, confirmation payloads and the
//! confirmation state machine, reply markup, example prompts, user-visible
//! strings, configuration and the [`api::ChatApi`] contract.

pub mod api;
pub mod category;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod locale;
pub mod markup;
pub mod session;

mod serde_util;

// Re-export common types
pub use config::ClientConfig;
pub use error::{Result, TellaError};
pub use locale::Locale;
