//! Credential models: redacted token secrets, role-tagged users, persisted auth state, and the
//! login/register wire payloads.

pub mod payload;
pub mod secret;
pub mod state;
pub mod user;

pub use payload::*;
pub use secret::*;
pub use state::*;
pub use user::*;
