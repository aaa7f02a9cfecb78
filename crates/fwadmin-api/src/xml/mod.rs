// XML/XPath backend
//
// API-key client for the device XML API. Everything is a GET on the API
// root; the `type`/`action` query parameters select the operation.

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;

pub use client::XmlClient;
pub use codec::{UserEntry, XmlResponse};
