//! Decoders for C12.19 tables the client reads during discovery

pub mod general_config;
pub mod manufacturer_ident;

pub use general_config::GeneralConfig;
pub use manufacturer_ident::ManufacturerIdentification;
