// ── Domain model ──
//
// Backend-neutral representations of user accounts and operation outcomes.
// Both device backends convert their wire formats into these types.

pub mod account;
pub mod result;

pub use account::{BackendKind, Role, UserAccount};
pub use result::OperationResult;
