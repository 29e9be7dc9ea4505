//! Client configuration: API location plus timeouts for requests and token refresh.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError};

/// Public deployment used when no override is supplied.
pub const DEFAULT_SERVER_ROOT: &str = "https://bloodlinks.onrender.com";
/// Environment variable overriding [`DEFAULT_SERVER_ROOT`].
pub const SERVER_ROOT_ENV: &str = "BLOODLINK_API_BASE_URL";

/// Resolved settings shared by the transport, the session, and the authenticated client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API base, always ending in `/api/`.
	pub base_url: Url,
	/// Per-request timeout applied by the HTTP transport.
	pub request_timeout: Option<StdDuration>,
	/// Upper bound on a single token refresh; `None` waits indefinitely.
	pub refresh_timeout: Option<StdDuration>,
}
impl ClientConfig {
	/// Default bound on a token refresh.
	pub const DEFAULT_REFRESH_TIMEOUT: StdDuration = StdDuration::from_secs(30);
	/// Default per-request timeout.
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Returns a builder seeded with the public deployment.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Builds the configuration from [`SERVER_ROOT_ENV`], falling back to the defaults.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder();

		if let Some(root) = std::env::var(SERVER_ROOT_ENV).ok().filter(|v| !v.trim().is_empty()) {
			builder = builder.server_root(root.trim())?;
		}

		builder.build()
	}

	/// Resolves an API-relative path (`/users/login/`) against [`ClientConfig::base_url`].
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		resolve(&self.base_url, path)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: api_base(
				Url::parse(DEFAULT_SERVER_ROOT).expect("Default server root must be a valid URL."),
			),
			request_timeout: Some(Self::DEFAULT_REQUEST_TIMEOUT),
			refresh_timeout: Some(Self::DEFAULT_REFRESH_TIMEOUT),
		}
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	config: ClientConfig,
}
impl ClientConfigBuilder {
	/// Points the client at a server root; `/api/` is appended.
	pub fn server_root(self, root: impl AsRef<str>) -> Result<Self, ConfigError> {
		let url = Url::parse(root.as_ref())
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(self.base_url(api_base(url)))
	}

	/// Sets the API base verbatim (a trailing slash is added when missing).
	pub fn base_url(mut self, mut url: Url) -> Self {
		if !url.path().ends_with('/') {
			let path = format!("{}/", url.path());

			url.set_path(&path);
		}

		self.config.base_url = url;

		self
	}

	/// Overrides the per-request timeout.
	pub fn request_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.config.request_timeout = timeout;

		self
	}

	/// Overrides the refresh timeout.
	pub fn refresh_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.config.refresh_timeout = timeout;

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let url = &self.config.base_url;

		if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
			return Err(ConfigError::UnsupportedScheme { url: url.to_string() });
		}

		Ok(self.config)
	}
}

fn api_base(mut root: Url) -> Url {
	let path = format!("{}/api/", root.path().trim_end_matches('/'));

	root.set_path(&path);
	root.set_query(None);

	root
}

pub(crate) fn resolve(base: &Url, path: &str) -> Result<Url, ConfigError> {
	base.join(path.trim_start_matches('/'))
		.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
}
