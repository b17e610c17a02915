//! Connection management module

pub mod builder;
pub mod client;

pub use builder::ClientBuilder;
pub use client::{C1218Client, TableReadEntry};
