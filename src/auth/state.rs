//! Persisted credential snapshot.

// self
use crate::{
	_prelude::*,
	auth::{AuthUser, TokenSecret},
};

/// Credentials and identity the session keeps in memory and persists between runs.
///
/// [`AuthState::default`] is the fully cleared state written on logout or after a failed
/// refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
	/// Short-lived token attached to every authenticated request.
	#[serde(default)]
	pub access_token: Option<TokenSecret>,
	/// Long-lived token used only to mint a new access token.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Identity of the signed-in user.
	#[serde(default)]
	pub user: Option<AuthUser>,
}
impl AuthState {
	/// Builds the state produced by a successful login or registration.
	pub fn signed_in(
		access_token: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
		user: AuthUser,
	) -> Self {
		Self {
			access_token: Some(access_token.into()),
			refresh_token: Some(refresh_token.into()),
			user: Some(user),
		}
	}

	/// Returns `true` when an access token and a user are both present.
	pub fn is_authenticated(&self) -> bool {
		self.access_token.is_some() && self.user.is_some()
	}

	/// Returns `true` when every field is empty.
	pub fn is_cleared(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
	}
}
