//! API middleware components

pub mod cors;
pub mod logging;

pub use cors::create_cors_layer;
pub use logging::{logging_middleware, RequestId};
