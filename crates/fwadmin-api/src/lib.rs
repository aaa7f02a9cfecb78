// fwadmin-api: Async Rust clients for firewall management APIs (device REST + XML)

pub mod auth;
pub mod error;
pub mod rest;
pub mod transport;
pub mod xml;

pub use auth::{AuthStrategy, Backend};
pub use error::Error;
pub use rest::RestClient;
pub use transport::{RawResponse, TlsMode, Transport, TransportConfig, redact_url};
pub use xml::XmlClient;
