// Adapters layer: concrete implementations for external systems.

pub mod http;
pub mod token;

pub use http::FetchClient;
pub use token::{EnvToken, NoToken, StaticToken};
