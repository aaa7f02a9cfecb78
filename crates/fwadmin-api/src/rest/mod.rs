// REST/JSON backend
//
// Bearer-token client for the device REST API. Endpoint groups live in
// separate files as inherent methods on `RestClient`.

pub mod auth;
pub mod client;
pub mod models;
pub mod users;

pub use client::RestClient;
pub use models::{DeployJob, SysUser, SysUserList};
