//! Request descriptors issued by callers and decoded responses handed back to them.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config,
	http::{Method, OutboundRequest},
};

/// API-relative request descriptor accepted by [`ApiClient::send`](crate::client::ApiClient::send).
///
/// The descriptor stays reusable across a refresh: the client re-resolves it on replay so the
/// post-refresh token is attached. The single-retry marker is owned by the client and cannot
/// be set by callers.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	headers: Vec<(String, String)>,
	body: Option<serde_json::Value>,
	retried: bool,
}
impl ApiRequest {
	/// Creates a request for an API-relative path such as `/requetes/`.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: None,
			retried: false,
		}
	}

	/// `GET` shortcut.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// `POST` shortcut.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// `PUT` shortcut.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// `PATCH` shortcut.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// `DELETE` shortcut.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body).map_err(Error::Encode)?);

		Ok(self)
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a header. `Authorization` is managed by the client and overwritten on dispatch.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// HTTP verb.
	pub fn method(&self) -> Method {
		self.method
	}

	/// API-relative path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// JSON payload, if any.
	pub fn body(&self) -> Option<&serde_json::Value> {
		self.body.as_ref()
	}

	/// Returns `true` once the client has replayed this request after a refresh.
	pub fn retried(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}

	/// Resolves the descriptor into a transport request, attaching `token` as a bearer.
	pub(crate) fn to_outbound(
		&self,
		base: &Url,
		token: Option<&TokenSecret>,
	) -> Result<OutboundRequest> {
		let mut url = config::resolve(base, &self.path)?;

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];

		headers.extend(
			self.headers
				.iter()
				.filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
				.cloned(),
		);

		if let Some(token) = token {
			headers.push(("Authorization".into(), token.bearer()));
		}

		let body = match &self.body {
			Some(value) => {
				headers.push(("Content-Type".into(), "application/json".into()));

				Some(serde_json::to_vec(value).map_err(Error::Encode)?)
			},
			None => None,
		};

		Ok(OutboundRequest { method: self.method, url, headers, body })
	}
}

/// Successful (2xx) API response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { source, status: self.status })
	}

	/// Returns the body as text, replacing invalid UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base() -> Url {
		Url::parse("https://example.com/api/").expect("Base URL should parse.")
	}

	#[test]
	fn outbound_attaches_bearer_and_query() {
		let token = TokenSecret::new("abc123");
		let request = ApiRequest::get("/alertes/par-groupe/")
			.query("groupe_sanguin", "O+")
			.header("Authorization", "Bearer stale");
		let outbound =
			request.to_outbound(&base(), Some(&token)).expect("Request should resolve.");

		assert_eq!(
			outbound.url.as_str(),
			"https://example.com/api/alertes/par-groupe/?groupe_sanguin=O%2B"
		);
		assert_eq!(outbound.header("authorization"), Some("Bearer abc123"));
		assert_eq!(
			outbound.headers.iter().filter(|(name, _)| name == "Authorization").count(),
			1
		);
		assert!(outbound.body.is_none());
	}

	#[test]
	fn outbound_without_token_has_no_authorization() {
		let outbound = ApiRequest::post("/requetes/")
			.json(&serde_json::json!({ "quantite": 1 }))
			.expect("Body should serialize.")
			.to_outbound(&base(), None)
			.expect("Request should resolve.");

		assert_eq!(outbound.header("authorization"), None);
		assert_eq!(outbound.header("content-type"), Some("application/json"));
		assert_eq!(outbound.body.as_deref(), Some(br#"{"quantite":1}"#.as_slice()));
	}

	#[test]
	fn decode_errors_report_path() {
		let response = ApiResponse::new(200, r#"[{"id":"seven"}]"#);
		let err = response
			.json::<Vec<crate::domain::Bank>>()
			.expect_err("String id should fail to decode.");
		let Error::Decode { source, status } = err else {
			panic!("Expected a decode error.");
		};

		assert_eq!(status, 200);
		assert_eq!(source.path().to_string(), "[0].id");
	}
}
