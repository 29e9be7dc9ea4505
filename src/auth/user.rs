//! Role-tagged user identity returned by the login and register endpoints.

// self
use crate::{
	_prelude::*,
	domain::{BankRef, BloodGroup},
};

/// Role discriminant carried in the `user_type` wire field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
	/// `donneur`
	#[serde(rename = "donneur")]
	Donor,
	/// `docteur`
	#[serde(rename = "docteur")]
	Doctor,
	/// `banque`
	#[serde(rename = "banque")]
	BloodBank,
}
impl UserRole {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Donor => "donneur",
			Self::Doctor => "docteur",
			Self::BloodBank => "banque",
		}
	}

	/// Generic label used when a profile carries no name.
	pub const fn fallback_name(self) -> &'static str {
		match self {
			Self::Donor => "Donneur",
			Self::Doctor => "Docteur",
			Self::BloodBank => "Banque",
		}
	}
}
impl Display for UserRole {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Nested donor block some payloads use for the blood group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorDetails {
	/// Donor's blood group.
	#[serde(rename = "groupe_sanguin", default, skip_serializing_if = "Option::is_none")]
	pub blood_group: Option<BloodGroup>,
}

/// Donor profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorProfile {
	/// Server-side identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	/// Login email.
	pub email: String,
	/// Account activation flag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
	/// Family name.
	#[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Given name.
	#[serde(rename = "prenom", default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Blood group at the top level of the payload.
	#[serde(rename = "groupe_sanguin", default, skip_serializing_if = "Option::is_none")]
	pub blood_group: Option<BloodGroup>,
	/// Nested donor block.
	#[serde(rename = "donneur", default, skip_serializing_if = "Option::is_none")]
	pub details: Option<DonorDetails>,
}

/// Doctor profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
	/// Server-side identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	/// Login email.
	pub email: String,
	/// Account activation flag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
	/// Family name.
	#[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Given name.
	#[serde(rename = "prenom", default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Registration code issued by the medical board.
	#[serde(rename = "code_inscription", default, skip_serializing_if = "Option::is_none")]
	pub registration_code: Option<String>,
	/// Bank the doctor works with.
	#[serde(rename = "BanqueDeSang", default, skip_serializing_if = "Option::is_none")]
	pub bank: Option<BankRef>,
}

/// Blood bank profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProfile {
	/// Server-side identifier; also the bank id used by bank-scoped endpoints.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	/// Login email.
	pub email: String,
	/// Account activation flag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
	/// Bank name.
	#[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Free-text location.
	#[serde(rename = "localisation", default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	/// Registration code.
	#[serde(rename = "code_inscription", default, skip_serializing_if = "Option::is_none")]
	pub registration_code: Option<String>,
}

/// Authenticated user, decoded by role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "user_type")]
pub enum AuthUser {
	/// Blood donor.
	#[serde(rename = "donneur")]
	Donor(DonorProfile),
	/// Requesting doctor.
	#[serde(rename = "docteur")]
	Doctor(DoctorProfile),
	/// Blood bank.
	#[serde(rename = "banque")]
	BloodBank(BankProfile),
}
impl AuthUser {
	/// Returns the role discriminant.
	pub fn role(&self) -> UserRole {
		match self {
			Self::Donor(_) => UserRole::Donor,
			Self::Doctor(_) => UserRole::Doctor,
			Self::BloodBank(_) => UserRole::BloodBank,
		}
	}

	/// Returns the server-side identifier, if the payload carried one.
	pub fn id(&self) -> Option<u64> {
		match self {
			Self::Donor(p) => p.id,
			Self::Doctor(p) => p.id,
			Self::BloodBank(p) => p.id,
		}
	}

	/// Returns the login email.
	pub fn email(&self) -> &str {
		match self {
			Self::Donor(p) => &p.email,
			Self::Doctor(p) => &p.email,
			Self::BloodBank(p) => &p.email,
		}
	}

	/// Returns the donor's blood group, looking at the nested block when needed.
	pub fn blood_group(&self) -> Option<BloodGroup> {
		match self {
			Self::Donor(p) => p.blood_group.or_else(|| p.details.as_ref()?.blood_group),
			_ => None,
		}
	}

	/// Builds the name shown in headers: bank name, or `prenom nom` for people, falling back to
	/// the role label.
	pub fn display_name(&self) -> String {
		let name = match self {
			Self::BloodBank(p) => p.name.clone().filter(|name| !name.trim().is_empty()),
			Self::Donor(DonorProfile { first_name, last_name, .. })
			| Self::Doctor(DoctorProfile { first_name, last_name, .. }) =>
				join_names(first_name.as_deref(), last_name.as_deref()),
		};

		name.unwrap_or_else(|| self.role().fallback_name().to_owned())
	}
}

fn join_names(first: Option<&str>, last: Option<&str>) -> Option<String> {
	let joined = [first, last]
		.into_iter()
		.flatten()
		.map(str::trim)
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join(" ");

	if joined.is_empty() { None } else { Some(joined) }
}
