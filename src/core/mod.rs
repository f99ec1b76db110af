//! Core components of the `sm-terminal` client.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`SmClient`] and its builder.
//! - The [`Session`] that carries the bearer token.
//! - The primary [`SmError`] type.
//! - Local durable storage and date/time helpers.

/// The main client (`SmClient`), builder, and configuration.
pub mod client;
/// The primary error type (`SmError`) for the crate.
pub mod error;
/// Bearer-token session and logout notification.
pub mod session;
/// Local key/value persistence.
pub mod storage;
/// Query-date formatting and timestamp parsing.
pub mod time;

pub(crate) mod net;
pub(crate) mod wire;

// convenient re-exports so most code can just `use crate::core::SmClient`
pub use client::{SmClient, SmClientBuilder};
pub use error::{ErrorKind, SmError};
pub use session::{Session, SessionState};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
