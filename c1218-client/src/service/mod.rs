//! C12.18 services: request payload builders and response decoders

pub mod request;
pub mod response;

pub use request::{ServiceCode, ServiceRequest};
pub use response::{IdentInfo, NegotiatedParameters, ServiceResponse, TableData};
