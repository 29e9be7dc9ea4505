//! Typed records for the BloodLink resource endpoints.
//!
//! Wire names follow the API's French vocabulary (`groupe_sanguin`, `quantite`, `statut`, ...)
//! while the Rust fields use English names. Free-text status values are normalized into
//! [`Status`] at decode time.

pub mod alert;
pub mod bank;
pub mod blood;
pub mod request;
pub mod status;

pub use alert::*;
pub use bank::*;
pub use blood::*;
pub use request::*;
pub use status::*;

// self
use crate::_prelude::*;

/// Error raised when a closed vocabulary value cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unrecognized {kind} `{value}`.")]
pub struct VocabularyError {
	/// Vocabulary being parsed (blood group, status).
	pub kind: &'static str,
	/// Raw value that failed to parse.
	pub value: String,
}
