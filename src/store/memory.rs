//! Thread-safe in-memory [`CredentialStore`] for tests and ephemeral sessions.

// self
use crate::{
	_prelude::*,
	auth::AuthState,
	store::{CredentialStore, StoreFuture},
};

/// Keeps the record in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<AuthState>>>);
impl MemoryStore {
	/// Creates a store pre-seeded with a record, as if restored from a previous run.
	pub fn seeded(state: AuthState) -> Self {
		Self(Arc::new(RwLock::new(Some(state))))
	}

	/// Returns the currently persisted record without going through the async contract.
	pub fn snapshot(&self) -> Option<AuthState> {
		self.0.read().clone()
	}
}
impl CredentialStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Option<AuthState>> {
		let record = self.snapshot();

		Box::pin(async move { Ok(record) })
	}

	fn save<'a>(&'a self, state: &'a AuthState) -> StoreFuture<'a, ()> {
		*self.0.write() = Some(state.clone());

		Box::pin(async { Ok(()) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		self.0.write().take();

		Box::pin(async { Ok(()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn save_load_and_clear() {
		let store = MemoryStore::default();

		assert_eq!(store.load().await.expect("Empty load should succeed."), None);

		let state = AuthState {
			access_token: Some("t1".into()),
			refresh_token: Some("r1".into()),
			user: None,
		};

		store.save(&state).await.expect("Save should succeed.");

		assert_eq!(store.load().await.expect("Load should succeed."), Some(state));

		store.clear().await.expect("Clear should succeed.");

		assert_eq!(store.snapshot(), None);
	}
}
