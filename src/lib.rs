//! BloodLink API client: bearer-token transport with single-flight refresh, persisted
//! credentials, and typed endpoints for doctors, blood banks, and donors.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod obs;
pub mod services;
pub mod session;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ApiClient,
		config::ClientConfig,
		http::ReqwestTransport,
		session::AuthSession,
		store::{CredentialStore, MemoryStore},
	};

	/// Session type alias used by reqwest-backed integration tests.
	pub type ReqwestTestSession = AuthSession<ReqwestTransport>;
	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Builds a client configuration pointing at a mock server root (`/api` is appended).
	pub fn test_config(server_root: &str) -> ClientConfig {
		ClientConfig::builder()
			.server_root(server_root)
			.expect("Mock server root should parse as a URL.")
			.refresh_timeout(Some(std::time::Duration::from_secs(5)))
			.build()
			.expect("Test client configuration should build.")
	}

	/// Wires a session + authenticated client against an in-memory store, mirroring the
	/// production stack used by applications.
	pub async fn build_reqwest_test_stack(
		server_root: &str,
	) -> (ReqwestTestSession, ReqwestTestClient, Arc<MemoryStore>) {
		let config = test_config(server_root);
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let transport = Arc::new(
			ReqwestTransport::from_config(&config)
				.expect("Failed to build Reqwest transport for tests."),
		);
		let session = AuthSession::restore(transport.clone(), &config, store)
			.await
			.expect("Restoring from an empty memory store should succeed.");
		let client = ApiClient::with_session(transport, &config, &session);

		(session, client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::VecDeque,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
