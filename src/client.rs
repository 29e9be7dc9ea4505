//! Authenticated API client with transparent access-token recovery.
//!
//! [`ApiClient::send`] attaches the current access token as a bearer, and on the first 401 for
//! a request it joins a single-flight refresh: one refresh runs no matter how many requests fail
//! concurrently, every request that met the 401 waits for it, and the outcome either replays
//! each request once with the new token or hands each caller back its own original 401. A
//! replay that still gets 401 is terminal.

mod metrics;
mod refresh;

pub use metrics::RefreshMetrics;
pub use refresh::RefreshOutcome;

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	http::{ApiRequest, ApiResponse, HttpTransport, RawResponse},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::AuthSession,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use refresh::{RefreshGate, Ticket};

/// Returns the access token to attach, or `None` to send unauthenticated.
pub type AccessTokenProvider = Arc<dyn Fn() -> Option<TokenSecret> + Send + Sync>;
/// Future resolved by a [`RefreshOperation`]; `true` means a new access token is stored.
pub type RefreshFuture = Pin<Box<dyn Future<Output = bool> + Send>>;
/// Mints a new access token from the stored refresh token.
///
/// On success the operation must have updated whatever the [`AccessTokenProvider`] reads. On
/// failure it is expected to clear the stored credentials.
pub type RefreshOperation = Arc<dyn Fn() -> RefreshFuture + Send + Sync>;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Authenticated HTTP client for the BloodLink API.
///
/// Clones share the transport, the refresh gate, and the metrics, so a refresh started through
/// one clone is joined by requests sent through any other.
pub struct ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<C>,
	/// API base every request path is resolved against.
	pub base_url: Url,
	/// Upper bound on one refresh operation; `None` waits indefinitely.
	pub refresh_timeout: Option<StdDuration>,
	access_token: AccessTokenProvider,
	refresh: RefreshOperation,
	refresh_gate: Arc<RefreshGate>,
	refresh_metrics: Arc<RefreshMetrics>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client from explicit token accessors.
	pub fn new<P, R>(
		transport: Arc<C>,
		config: &ClientConfig,
		access_token_provider: P,
		refresh_operation: R,
	) -> Self
	where
		P: 'static + Send + Sync + Fn() -> Option<TokenSecret>,
		R: 'static + Send + Sync + Fn() -> RefreshFuture,
	{
		Self::from_parts(
			transport,
			config,
			Arc::new(access_token_provider),
			Arc::new(refresh_operation),
		)
	}

	/// Creates a client whose accessors read from and refresh through `session`.
	pub fn with_session<S>(
		transport: Arc<C>,
		config: &ClientConfig,
		session: &AuthSession<S>,
	) -> Self
	where
		S: ?Sized + HttpTransport,
	{
		Self::from_parts(
			transport,
			config,
			session.access_token_provider(),
			session.refresh_operation(),
		)
	}

	/// Creates a client from already-shared accessors.
	pub fn from_parts(
		transport: Arc<C>,
		config: &ClientConfig,
		access_token_provider: AccessTokenProvider,
		refresh_operation: RefreshOperation,
	) -> Self {
		Self {
			transport,
			base_url: config.base_url.clone(),
			refresh_timeout: config.refresh_timeout,
			access_token: access_token_provider,
			refresh: refresh_operation,
			refresh_gate: Default::default(),
			refresh_metrics: Default::default(),
		}
	}

	/// Counters for the refresh operations this client has run.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	/// Number of requests currently queued behind an in-flight refresh.
	pub fn pending_requests(&self) -> usize {
		self.refresh_gate.pending_len()
	}

	/// Returns `true` while a refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.refresh_gate.is_active()
	}

	/// Sends `request`, recovering once from an expired access token.
	///
	/// Returns the 2xx response, the replayed outcome after a successful refresh, or the
	/// request's own original 401 when the refresh fails. Transport failures and non-401 error
	/// statuses are returned unchanged and never trigger a refresh.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "send");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut request = request;
				let original = match self.dispatch(&request).await?.into_result() {
					Err(err @ Error::Unauthorized { .. }) if !request.retried() => err,
					other => return other,
				};

				request.mark_retried();

				match self.await_refresh().await {
					RefreshOutcome::Refreshed => self.dispatch(&request).await?.into_result(),
					RefreshOutcome::Failed => Err(original),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Sends `request` and decodes the JSON body.
	pub async fn send_json<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.send(request).await?.json()
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<RawResponse> {
		let token = (self.access_token)();
		let outbound = request.to_outbound(&self.base_url, token.as_ref())?;

		Ok(self.transport.execute(outbound).await?)
	}

	async fn await_refresh(&self) -> RefreshOutcome {
		match self.refresh_gate.join() {
			Ticket::Waiter(receiver) => {
				obs::debug_flow(FlowKind::Request, "queued behind in-flight refresh", &"401");

				receiver.await.unwrap_or(RefreshOutcome::Failed)
			},
			Ticket::Leader(lease) => {
				let outcome = if self.run_refresh().await {
					RefreshOutcome::Refreshed
				} else {
					RefreshOutcome::Failed
				};
				let released = lease.settle(outcome);

				obs::debug_flow(FlowKind::Refresh, "released queued requests", &released);

				outcome
			},
		}
	}

	async fn run_refresh(&self) -> bool {
		let span = FlowSpan::new(FlowKind::Refresh, "single_flight");

		self.refresh_metrics.record_attempt();

		let refreshed = span
			.instrument(async {
				let operation = (self.refresh)();

				match self.refresh_timeout {
					Some(limit) => match tokio::time::timeout(limit, operation).await {
						Ok(refreshed) => refreshed,
						Err(elapsed) => {
							self.refresh_metrics.record_timeout();
							obs::warn_flow(FlowKind::Refresh, "refresh timed out", &elapsed);

							false
						},
					},
					None => operation.await,
				}
			})
			.await;

		if refreshed {
			self.refresh_metrics.record_success();
		} else {
			self.refresh_metrics.record_failure();
		}

		refreshed
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			base_url: self.base_url.clone(),
			refresh_timeout: self.refresh_timeout,
			access_token: self.access_token.clone(),
			refresh: self.refresh.clone(),
			refresh_gate: self.refresh_gate.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("refresh_timeout", &self.refresh_timeout)
			.field("refreshing", &self.is_refreshing())
			.field("pending_requests", &self.pending_requests())
			.finish()
	}
}
