//! Wire payloads for the `users` endpoints.

// self
use crate::{
	_prelude::*,
	auth::{AuthUser, TokenSecret, UserRole},
	domain::BloodGroup,
	error::Error,
};

/// Body of `POST /users/login/`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl LoginRequest {
	/// Creates a login payload.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}

	/// Rejects blank credentials before any network call.
	pub fn validate(&self) -> Result<()> {
		require("email", &self.email)?;
		require("password", &self.password)
	}
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Role-specific body of `POST /users/register/`, tagged by `user_type`.
#[derive(Clone, Serialize)]
#[serde(tag = "user_type")]
pub enum RegisterRequest {
	/// Donor sign-up.
	#[serde(rename = "donneur")]
	Donor {
		/// Account email.
		email: String,
		/// Account password.
		password: String,
		/// Family name.
		#[serde(rename = "nom")]
		last_name: String,
		/// Given name.
		#[serde(rename = "prenom")]
		first_name: String,
		/// Donor's blood group.
		#[serde(rename = "groupe_sanguin")]
		blood_group: BloodGroup,
	},
	/// Doctor sign-up.
	#[serde(rename = "docteur")]
	Doctor {
		/// Account email.
		email: String,
		/// Account password.
		password: String,
		/// Family name.
		#[serde(rename = "nom")]
		last_name: String,
		/// Given name.
		#[serde(rename = "prenom")]
		first_name: String,
		/// Registration code issued by the medical board.
		#[serde(rename = "code_inscription")]
		registration_code: String,
		/// Bank the doctor works with.
		#[serde(rename = "BanqueDeSang", skip_serializing_if = "Option::is_none")]
		bank_id: Option<u64>,
	},
	/// Blood bank sign-up.
	#[serde(rename = "banque")]
	BloodBank {
		/// Account email.
		email: String,
		/// Account password.
		password: String,
		/// Bank name.
		#[serde(rename = "nom")]
		name: String,
		/// Free-text location.
		#[serde(rename = "localisation")]
		location: String,
		/// Registration code.
		#[serde(rename = "code_inscription")]
		registration_code: String,
	},
}
impl RegisterRequest {
	/// Returns the role being registered.
	pub fn role(&self) -> UserRole {
		match self {
			Self::Donor { .. } => UserRole::Donor,
			Self::Doctor { .. } => UserRole::Doctor,
			Self::BloodBank { .. } => UserRole::BloodBank,
		}
	}

	/// Checks that every required field for the role is filled in.
	pub fn validate(&self) -> Result<()> {
		match self {
			Self::Donor { email, password, last_name, first_name, .. } => {
				require("email", email)?;
				require("password", password)?;
				require("nom", last_name)?;
				require("prenom", first_name)
			},
			Self::Doctor { email, password, last_name, first_name, registration_code, .. } => {
				require("email", email)?;
				require("password", password)?;
				require("nom", last_name)?;
				require("prenom", first_name)?;
				require("code_inscription", registration_code)
			},
			Self::BloodBank { email, password, name, location, registration_code } => {
				require("email", email)?;
				require("password", password)?;
				require("nom", name)?;
				require("localisation", location)?;
				require("code_inscription", registration_code)
			},
		}
	}
}
impl Debug for RegisterRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let email = match self {
			Self::Donor { email, .. } | Self::Doctor { email, .. } | Self::BloodBank { email, .. } =>
				email,
		};

		f.debug_struct("RegisterRequest")
			.field("role", &self.role())
			.field("email", email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Response of the login and register endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// New access token.
	pub access: TokenSecret,
	/// New refresh token.
	pub refresh: TokenSecret,
	/// Signed-in user.
	pub user: AuthUser,
}

/// Body of `POST /users/token/refresh/`.
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
	/// Stored refresh token.
	pub refresh: &'a str,
}

/// Response of `POST /users/token/refresh/`.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshResponse {
	/// Newly minted access token.
	pub access: TokenSecret,
}

fn require(field: &'static str, value: &str) -> Result<()> {
	if value.trim().is_empty() { Err(Error::MissingField { field }) } else { Ok(()) }
}
