//! Core types and utilities for the ANSI C12.18 protocol
//!
//! This crate provides the error taxonomy, the response status codes,
//! fixed-width credential fields, catalog constants and configuration
//! shared by the transport, session and client crates.

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod status;
pub mod utils;

pub use config::{C1218Config, FragmentSignal, LinkConfig, NegotiationParameters, RetryConfig};
pub use credentials::{SecurityCode, UserName};
pub use error::{C1218Error, C1218Result};
pub use status::ResponseStatus;
