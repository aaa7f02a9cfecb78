//! Backend-neutral user-account management on top of `fwadmin-api`.
//!
//! - **[`DeviceBackend`]**: the operation contract (`authenticate`,
//!   `list_users`, `create_user`, `update_password`, `delete_user`,
//!   `commit`) shared by every management API.
//!
//! - **[`DeviceClient`]**: picks the REST or XML implementation from a
//!   [`DeviceConfig`]. [`DeviceClient::connect()`] builds and logs in.
//!
//! - **Domain model** ([`model`]): [`UserAccount`], [`Role`],
//!   [`BackendKind`] and [`OperationResult`]. Device rejections of a
//!   mutation come back as a failed [`OperationResult`]; transport,
//!   authentication and decode problems are [`CoreError`]s.

pub mod config;
pub mod convert;
pub mod device;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, DeviceConfig, TlsVerification, device_url};
pub use device::{DeviceBackend, DeviceClient, PROTECTED_ACCOUNT, RestDevice, XmlDevice};
pub use error::CoreError;
pub use model::{BackendKind, OperationResult, Role, UserAccount};
