//! Persistence contracts and built-in stores for the signed-in session.
//!
//! A store holds exactly one named record ([`RECORD_NAME`]) containing the [`AuthState`]. The
//! session keeps the live copy in memory and writes through the store on every mutation, so a
//! restart restores the last known credentials.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AuthState};

/// Name of the persisted record.
pub const RECORD_NAME: &str = "auth-store";
/// Schema version written alongside the record.
pub const RECORD_VERSION: u32 = 0;

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for the persisted auth record.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Loads the persisted state, if a record exists.
	fn load(&self) -> StoreFuture<'_, Option<AuthState>>;

	/// Persists or replaces the record.
	fn save<'a>(&'a self, state: &'a AuthState) -> StoreFuture<'a, ()>;

	/// Removes the record entirely.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// On-disk envelope around the persisted state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
	/// Record name; always [`RECORD_NAME`].
	pub name: String,
	/// Schema version; always [`RECORD_VERSION`] for records written by this crate.
	pub version: u32,
	/// Persisted credentials and identity.
	pub state: AuthState,
}
impl PersistedRecord {
	/// Wraps a state snapshot in the current envelope.
	pub fn new(state: AuthState) -> Self {
		Self { name: RECORD_NAME.into(), version: RECORD_VERSION, state }
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The record on disk belongs to another store or schema.
	#[error("Record `{name}` (version {version}) is not a supported auth record.")]
	UnsupportedRecord {
		/// Record name found on disk.
		name: String,
		/// Record version found on disk.
		version: u32,
	},
}
