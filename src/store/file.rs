//! File-backed [`CredentialStore`] that survives process restarts.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::AuthState,
	store::{CredentialStore, PersistedRecord, RECORD_NAME, RECORD_VERSION, StoreError, StoreFuture},
};

/// Persists the auth record as a JSON file, replacing it atomically on every write.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	write_guard: Arc<Mutex<()>>,
}
impl FileStore {
	/// Opens a store at the provided path, creating parent directories as needed.
	///
	/// The file itself is only created on the first save.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		Ok(Self { path, write_guard: Default::default() })
	}

	/// Opens `<dir>/auth-store.json`.
	pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
		Self::open(dir.as_ref().join(format!("{RECORD_NAME}.json")))
	}

	/// Returns the record path.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read_record(path: &Path) -> Result<Option<AuthState>, StoreError> {
		let bytes = match fs::read(path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) =>
				return Err(StoreError::Backend {
					message: format!("Failed to read {}: {e}", path.display()),
				}),
		};

		if bytes.is_empty() {
			return Ok(None);
		}

		let record: PersistedRecord =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		if record.name != RECORD_NAME || record.version > RECORD_VERSION {
			return Err(StoreError::UnsupportedRecord { name: record.name, version: record.version });
		}

		Ok(Some(record.state))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, state: &AuthState) -> Result<(), StoreError> {
		let _guard = self.write_guard.lock();

		Self::ensure_parent_exists(&self.path)?;

		let serialized = serde_json::to_vec_pretty(&PersistedRecord::new(state.clone())).map_err(
			|e| StoreError::Serialization { message: format!("Failed to serialize auth record: {e}") },
		)?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn remove(&self) -> Result<(), StoreError> {
		let _guard = self.write_guard.lock();

		match fs::remove_file(&self.path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StoreError::Backend {
				message: format!("Failed to remove {}: {e}", self.path.display()),
			}),
		}
	}
}
impl CredentialStore for FileStore {
	fn load(&self) -> StoreFuture<'_, Option<AuthState>> {
		Box::pin(async move { Self::read_record(&self.path) })
	}

	fn save<'a>(&'a self, state: &'a AuthState) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.persist(state) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.remove() })
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_dir() -> PathBuf {
		let unique = format!(
			"bloodlink_file_store_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn signed_in_state() -> AuthState {
		let user = serde_json::from_str(r#"{"user_type":"banque","id":4,"email":"b@x.com"}"#)
			.expect("Bank fixture should decode.");

		AuthState::signed_in("access-token", "refresh-token", user)
	}

	#[test]
	fn save_and_reload_round_trip() {
		let dir = temp_dir();
		let store = FileStore::in_dir(&dir).expect("Failed to open file store.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let state = signed_in_state();

		assert_eq!(rt.block_on(store.load()).expect("Missing record should load as None."), None);

		rt.block_on(store.save(&state)).expect("Failed to save fixture record.");
		drop(store);

		let reopened = FileStore::in_dir(&dir).expect("Failed to reopen file store.");
		let restored = rt
			.block_on(reopened.load())
			.expect("Failed to load persisted record.")
			.expect("File store lost record after reopen.");

		assert_eq!(restored, state);
		assert!(reopened.path().ends_with("auth-store.json"));

		rt.block_on(reopened.clear()).expect("Failed to clear record.");

		assert!(!reopened.path().exists());
		assert_eq!(rt.block_on(reopened.load()).expect("Cleared record should load."), None);

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[test]
	fn foreign_records_are_rejected() {
		let dir = temp_dir();
		let store = FileStore::in_dir(&dir).expect("Failed to open file store.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		fs::write(store.path(), r#"{"name":"other-store","version":0,"state":{}}"#)
			.expect("Failed to write foreign record.");

		let err = rt.block_on(store.load()).expect_err("Foreign record should be rejected.");

		assert!(matches!(err, StoreError::UnsupportedRecord { .. }));

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}
}
