//! Signed-in session: the live credential snapshot plus the `users` endpoints that mutate it.
//!
//! [`AuthSession`] owns the only mutable copy of the credentials. It restores them from a
//! [`CredentialStore`] at startup, writes through the store after every mutation, and hands the
//! authenticated client two closures: one reading the access token, one running the refresh
//! exchange. The refresh exchange talks to the transport directly, without bearer injection, so
//! it can never queue behind itself.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthState, AuthUser, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest,
		TokenResponse, TokenSecret,
	},
	client::{AccessTokenProvider, RefreshFuture, RefreshOperation},
	config::ClientConfig,
	http::{ApiRequest, HttpTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::CredentialStore,
};

const LOGIN_PATH: &str = "/users/login/";
const REGISTER_PATH: &str = "/users/register/";
const REFRESH_PATH: &str = "/users/token/refresh/";

/// Credential owner shared by the UI layer and the authenticated client.
///
/// Clones share the same state, store, and mutation guard.
pub struct AuthSession<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for the unauthenticated `users` endpoints.
	pub transport: Arc<C>,
	/// API base the `users` endpoints are resolved against.
	pub base_url: Url,
	/// Persistence backend for the auth record.
	pub store: Arc<dyn CredentialStore>,
	state: Arc<RwLock<AuthState>>,
	mutation_guard: Arc<AsyncMutex<()>>,
}
impl<C> AuthSession<C>
where
	C: ?Sized + HttpTransport,
{
	/// Restores the persisted record, starting signed out when none exists.
	pub async fn restore(
		transport: Arc<C>,
		config: &ClientConfig,
		store: Arc<dyn CredentialStore>,
	) -> Result<Self> {
		let restored = store.load().await?.unwrap_or_default();

		Ok(Self {
			transport,
			base_url: config.base_url.clone(),
			store,
			state: Arc::new(RwLock::new(restored)),
			mutation_guard: Default::default(),
		})
	}

	/// Returns a copy of the current credentials.
	pub fn snapshot(&self) -> AuthState {
		self.state.read().clone()
	}

	/// Returns the current access token.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.state.read().access_token.clone()
	}

	/// Returns the signed-in user.
	pub fn current_user(&self) -> Option<AuthUser> {
		self.state.read().user.clone()
	}

	/// Returns `true` when an access token and a user are present.
	pub fn is_authenticated(&self) -> bool {
		self.state.read().is_authenticated()
	}

	/// Signs in with email and password, persisting the issued credentials.
	pub async fn login(
		&self,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Result<AuthUser> {
		const KIND: FlowKind = FlowKind::Login;

		let payload = LoginRequest::new(email, password);

		payload.validate()?;

		self.sign_in(KIND, "login", LOGIN_PATH, ApiRequest::post(LOGIN_PATH).json(&payload)?)
			.await
	}

	/// Creates an account for the payload's role and signs in with the issued credentials.
	pub async fn register(&self, payload: RegisterRequest) -> Result<AuthUser> {
		const KIND: FlowKind = FlowKind::Register;

		payload.validate()?;

		self.sign_in(
			KIND,
			"register",
			REGISTER_PATH,
			ApiRequest::post(REGISTER_PATH).json(&payload)?,
		)
		.await
	}

	/// Forgets every credential, in memory and in the store.
	pub async fn logout(&self) -> Result<()> {
		const KIND: FlowKind = FlowKind::Logout;

		let _guard = self.mutation_guard.lock().await;

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.clear_locked().await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Exchanges the stored refresh token for a new access token.
	///
	/// Returns `false` without touching the state when no refresh token is stored. Any other
	/// failure (transport, non-2xx, malformed body) clears every credential and returns
	/// `false`, which signs the user out.
	pub async fn refresh(&self) -> bool {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "token_refresh");
		let _guard = self.mutation_guard.lock().await;
		let Some(refresh_token) = self.state.read().refresh_token.clone() else {
			return false;
		};

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let refreshed = span
			.instrument(async {
				match self.exchange_refresh(&refresh_token).await {
					Ok(access) => {
						let snapshot = {
							let mut state = self.state.write();

							state.access_token = Some(access);

							state.clone()
						};

						if let Err(e) = self.store.save(&snapshot).await {
							obs::warn_flow(KIND, "refreshed token was not persisted", &e);
						}

						true
					},
					Err(e) => {
						obs::warn_flow(KIND, "refresh rejected, clearing credentials", &e);

						if let Err(e) = self.clear_locked().await {
							obs::warn_flow(KIND, "cleared credentials were not persisted", &e);
						}

						false
					},
				}
			})
			.await;

		obs::record_flow_outcome(
			KIND,
			if refreshed { FlowOutcome::Success } else { FlowOutcome::Failure },
		);

		refreshed
	}

	/// Builds the accessor the authenticated client calls before every request.
	pub fn access_token_provider(&self) -> AccessTokenProvider {
		let state = self.state.clone();

		Arc::new(move || state.read().access_token.clone())
	}

	/// Builds the refresh operation the authenticated client runs on a 401.
	pub fn refresh_operation(&self) -> RefreshOperation {
		let session = self.clone();

		Arc::new(move || -> RefreshFuture {
			let session = session.clone();

			Box::pin(async move { session.refresh().await })
		})
	}

	async fn sign_in(
		&self,
		kind: FlowKind,
		stage: &'static str,
		path: &'static str,
		request: ApiRequest,
	) -> Result<AuthUser> {
		let span = FlowSpan::new(kind, stage);

		obs::record_flow_outcome(kind, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _guard = self.mutation_guard.lock().await;
				let tokens: TokenResponse = self.post_unauthenticated(path, request).await?;
				let user = tokens.user;
				let state = AuthState::signed_in(tokens.access, tokens.refresh, user.clone());

				self.store.save(&state).await?;

				*self.state.write() = state;

				Ok(user)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange_refresh(&self, refresh_token: &TokenSecret) -> Result<TokenSecret> {
		let request = ApiRequest::post(REFRESH_PATH)
			.json(&RefreshRequest { refresh: refresh_token.expose() })?;
		let response: RefreshResponse = self.post_unauthenticated(REFRESH_PATH, request).await?;

		Ok(response.access)
	}

	async fn post_unauthenticated<T>(&self, path: &'static str, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let outbound = request.to_outbound(&self.base_url, None)?;

		obs::debug_flow(FlowKind::Request, "calling users endpoint", &path);

		self.transport.execute(outbound).await?.into_result()?.json()
	}

	async fn clear_locked(&self) -> Result<()> {
		*self.state.write() = AuthState::default();

		self.store.clear().await?;

		Ok(())
	}
}
impl<C> Clone for AuthSession<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			base_url: self.base_url.clone(),
			store: self.store.clone(),
			state: self.state.clone(),
			mutation_guard: self.mutation_guard.clone(),
		}
	}
}
impl<C> Debug for AuthSession<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.read();

		f.debug_struct("AuthSession")
			.field("base_url", &self.base_url.as_str())
			.field("authenticated", &state.is_authenticated())
			.field("role", &state.user.as_ref().map(AuthUser::role))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::BTreeMap;
	// self
	use super::*;
	use crate::{
		error::TransportError,
		http::{Method, OutboundRequest, RawResponse, TransportFuture},
		store::MemoryStore,
	};

	/// Scripted `users` endpoints keyed by path.
	#[derive(Default)]
	struct FakeUsersApi {
		responses: Mutex<BTreeMap<String, RawResponse>>,
		log: Mutex<Vec<OutboundRequest>>,
	}
	impl FakeUsersApi {
		fn respond(self, path: &str, status: u16, body: serde_json::Value) -> Self {
			self.responses.lock().insert(path.into(), RawResponse::new(status, body.to_string()));

			self
		}

		fn body_of(&self, idx: usize) -> serde_json::Value {
			let log = self.log.lock();
			let body = log[idx].body.as_deref().expect("Logged request should carry a body.");

			serde_json::from_slice(body).expect("Logged body should be JSON.")
		}
	}
	impl HttpTransport for FakeUsersApi {
		fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
			Box::pin(async move {
				let path = request.url.path().to_owned();

				self.log.lock().push(request);

				self.responses.lock().get(&path).cloned().ok_or_else(|| {
					TransportError::Io(std::io::Error::new(
						std::io::ErrorKind::NotFound,
						format!("no script for {path}"),
					))
				})
			})
		}
	}

	fn donor_json() -> serde_json::Value {
		serde_json::json!({ "user_type": "donneur", "id": 1, "email": "a@x.com", "prenom": "Awa" })
	}

	fn config() -> ClientConfig {
		ClientConfig::builder()
			.server_root("https://api.test")
			.expect("Test root should parse.")
			.build()
			.expect("Test config should build.")
	}

	async fn session_with(
		api: FakeUsersApi,
		seed: Option<AuthState>,
	) -> (AuthSession<FakeUsersApi>, Arc<FakeUsersApi>, MemoryStore) {
		let api = Arc::new(api);
		let store = seed.map(MemoryStore::seeded).unwrap_or_default();
		let session = AuthSession::restore(api.clone(), &config(), Arc::new(store.clone()))
			.await
			.expect("Memory store restore should succeed.");

		(session, api, store)
	}

	fn signed_in(access: &str, refresh: &str) -> AuthState {
		AuthState::signed_in(
			access,
			refresh,
			serde_json::from_value(donor_json()).expect("Donor fixture should decode."),
		)
	}

	#[tokio::test]
	async fn login_stores_and_persists_tokens() {
		let api = FakeUsersApi::default().respond(
			"/api/users/login/",
			200,
			serde_json::json!({ "access": "t1", "refresh": "r1", "user": donor_json() }),
		);
		let (session, api, store) = session_with(api, None).await;
		let user = session.login("a@x.com", "p").await.expect("Login should succeed.");

		assert_eq!(user.display_name(), "Awa");
		assert!(session.is_authenticated());
		assert_eq!(session.access_token().as_ref().map(TokenSecret::expose), Some("t1"));
		assert_eq!(store.snapshot(), Some(session.snapshot()));
		assert_eq!(api.body_of(0), serde_json::json!({ "email": "a@x.com", "password": "p" }));
		assert_eq!(api.log.lock()[0].method, Method::Post);
		assert_eq!(api.log.lock()[0].header("authorization"), None);
	}

	#[tokio::test]
	async fn login_rejects_blank_credentials_before_calling_api() {
		let (session, api, _) = session_with(FakeUsersApi::default(), None).await;

		assert!(matches!(
			session.login("", "p").await,
			Err(Error::MissingField { field: "email" })
		));
		assert!(api.log.lock().is_empty());
	}

	#[tokio::test]
	async fn register_signs_in_with_issued_tokens() {
		let bank =
			serde_json::json!({ "user_type": "banque", "id": 4, "email": "b@x.com", "nom": "CNTS" });
		let api = FakeUsersApi::default().respond(
			"/api/users/register/",
			201,
			serde_json::json!({ "access": "t1", "refresh": "r1", "user": bank }),
		);
		let (session, api, store) = session_with(api, None).await;
		let payload = RegisterRequest::BloodBank {
			email: "b@x.com".into(),
			password: "p".into(),
			name: "CNTS".into(),
			location: "Dakar".into(),
			registration_code: "BK-1".into(),
		};
		let user = session.register(payload).await.expect("Registration should succeed.");

		assert_eq!(user.role(), crate::auth::UserRole::BloodBank);
		assert_eq!(user.display_name(), "CNTS");
		assert_eq!(api.body_of(0)["user_type"], "banque");
		assert_eq!(api.body_of(0)["localisation"], "Dakar");
		assert!(store.snapshot().is_some_and(|state| state.is_authenticated()));
	}

	#[tokio::test]
	async fn register_checks_role_fields_first() {
		let (session, api, _) = session_with(FakeUsersApi::default(), None).await;
		let payload = RegisterRequest::Doctor {
			email: "d@x.com".into(),
			password: "p".into(),
			last_name: "Ba".into(),
			first_name: "Ali".into(),
			registration_code: " ".into(),
			bank_id: None,
		};

		assert!(matches!(
			session.register(payload).await,
			Err(Error::MissingField { field: "code_inscription" })
		));
		assert!(api.log.lock().is_empty());
	}

	#[tokio::test]
	async fn failed_login_leaves_state_untouched() {
		let api = FakeUsersApi::default().respond(
			"/api/users/login/",
			401,
			serde_json::json!({ "detail": "bad credentials" }),
		);
		let (session, _, store) = session_with(api, Some(signed_in("t0", "r0"))).await;
		let err = session.login("a@x.com", "wrong").await.expect_err("Login should fail.");

		assert!(err.is_unauthorized());
		assert_eq!(session.access_token().as_ref().map(TokenSecret::expose), Some("t0"));
		assert!(store.snapshot().is_some());
	}

	#[tokio::test]
	async fn refresh_replaces_access_token_and_keeps_refresh_token() {
		let api = FakeUsersApi::default().respond(
			"/api/users/token/refresh/",
			200,
			serde_json::json!({ "access": "t2" }),
		);
		let (session, api, store) = session_with(api, Some(signed_in("t1", "r1"))).await;

		assert!(session.refresh().await);
		assert_eq!(api.body_of(0), serde_json::json!({ "refresh": "r1" }));

		let snapshot = session.snapshot();

		assert_eq!(snapshot.access_token.as_ref().map(TokenSecret::expose), Some("t2"));
		assert_eq!(snapshot.refresh_token.as_ref().map(TokenSecret::expose), Some("r1"));
		assert_eq!(store.snapshot(), Some(snapshot));
	}

	#[tokio::test]
	async fn rejected_refresh_clears_everything() {
		let api = FakeUsersApi::default().respond(
			"/api/users/token/refresh/",
			401,
			serde_json::json!({ "detail": "token_not_valid" }),
		);
		let (session, _, store) = session_with(api, Some(signed_in("t1", "r1"))).await;

		assert!(!session.refresh().await);
		assert!(session.snapshot().is_cleared());
		assert_eq!(store.snapshot(), None);
	}

	#[tokio::test]
	async fn unreachable_refresh_endpoint_clears_everything() {
		let (session, _, store) =
			session_with(FakeUsersApi::default(), Some(signed_in("t1", "r1"))).await;

		assert!(!session.refresh().await);
		assert!(session.snapshot().is_cleared());
		assert_eq!(store.snapshot(), None);
	}

	#[tokio::test]
	async fn refresh_without_refresh_token_is_a_noop() {
		let seeded = AuthState { access_token: Some("t1".into()), ..Default::default() };
		let (session, api, store) = session_with(FakeUsersApi::default(), Some(seeded)).await;

		assert!(!session.refresh().await);
		assert!(api.log.lock().is_empty());
		assert_eq!(session.access_token().as_ref().map(TokenSecret::expose), Some("t1"));
		assert!(store.snapshot().is_some());
	}

	#[tokio::test]
	async fn logout_clears_state_and_store() {
		let (session, _, store) =
			session_with(FakeUsersApi::default(), Some(signed_in("t1", "r1"))).await;

		assert!(session.is_authenticated());

		session.logout().await.expect("Logout should succeed.");

		assert!(session.snapshot().is_cleared());
		assert_eq!(store.snapshot(), None);
	}

	#[tokio::test]
	async fn accessors_follow_session_state() {
		let api = FakeUsersApi::default().respond(
			"/api/users/token/refresh/",
			200,
			serde_json::json!({ "access": "t2" }),
		);
		let (session, _, _) = session_with(api, Some(signed_in("t1", "r1"))).await;
		let provider = session.access_token_provider();
		let refresh = session.refresh_operation();

		assert_eq!(provider().as_ref().map(TokenSecret::expose), Some("t1"));
		assert!(refresh().await);
		assert_eq!(provider().as_ref().map(TokenSecret::expose), Some("t2"));
	}

	#[tokio::test]
	async fn client_wired_to_session_shares_transport_and_tokens() {
		let api = FakeUsersApi::default()
			.respond("/api/users/token/refresh/", 200, serde_json::json!({ "access": "t2" }))
			.respond("/api/banques/", 401, serde_json::json!({ "detail": "token_not_valid" }));
		let (session, api, store) = session_with(api, Some(signed_in("t1", "r1"))).await;
		let client = crate::client::ApiClient::with_session(api.clone(), &config(), &session);
		let err = client.list_banks().await.expect_err("Replay should still be rejected.");
		let log = api.log.lock();

		assert!(err.is_unauthorized());
		assert_eq!(log.len(), 3);
		assert_eq!(log[0].header("authorization"), Some("Bearer t1"));
		assert_eq!(log[1].url.path(), "/api/users/token/refresh/");
		assert_eq!(log[1].header("authorization"), None);
		assert_eq!(log[2].header("authorization"), Some("Bearer t2"));
		assert_eq!(
			store.snapshot().and_then(|state| state.access_token).as_ref().map(TokenSecret::expose),
			Some("t2")
		);
	}
}
