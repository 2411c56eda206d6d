//! Core domain + application logic for the blog search bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the messaging
//! port, implemented in the adapter crate; upstream blog access lives behind
//! the `PostSource` port.

pub mod card;
pub mod config;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod fetch;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod pager;
pub mod search;

pub use errors::{Error, Result};
