//! Bank-originated alerts (`alertes`) targeting donors of a blood group.

// self
use crate::{
	_prelude::*,
	domain::{BloodGroup, PartialBankRef, Status},
};

/// Doctor summary nested inside an alert.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDoctor {
	/// Family name.
	#[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Given name.
	#[serde(rename = "prenom", default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Bank the doctor is attached to.
	#[serde(rename = "BanqueDeSang", default, skip_serializing_if = "Option::is_none")]
	pub bank: Option<PartialBankRef>,
}

/// Request summary nested inside an alert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRequest {
	/// Identifier of the originating blood request.
	pub id: u64,
	/// Requested blood group.
	#[serde(rename = "groupe_sanguin", default, skip_serializing_if = "Option::is_none")]
	pub blood_group: Option<BloodGroup>,
	/// Requested quantity, in bags.
	#[serde(rename = "quantite", default, skip_serializing_if = "Option::is_none")]
	pub quantity: Option<u32>,
	/// Requesting doctor.
	#[serde(rename = "docteur", default, skip_serializing_if = "Option::is_none")]
	pub doctor: Option<AlertDoctor>,
}

/// Alert as returned by the `alertes` endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
	/// Server-side identifier.
	pub id: u64,
	/// Workflow status.
	#[serde(rename = "statut")]
	pub status: Status,
	/// Dispatch instant.
	#[serde(
		rename = "date_envoi",
		default,
		skip_serializing_if = "Option::is_none",
		with = "time::serde::rfc3339::option"
	)]
	pub sent_at: Option<OffsetDateTime>,
	/// Targeted blood group.
	#[serde(rename = "groupe_sanguin", default, skip_serializing_if = "Option::is_none")]
	pub blood_group: Option<BloodGroup>,
	/// Optional headline shown to donors.
	#[serde(rename = "titre", default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Optional body shown to donors.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Originating request.
	#[serde(rename = "requete", default, skip_serializing_if = "Option::is_none")]
	pub request: Option<AlertRequest>,
}
impl Alert {
	/// Returns the alert's blood group, falling back to the originating request's.
	pub fn effective_blood_group(&self) -> Option<BloodGroup> {
		self.blood_group.or_else(|| self.request.as_ref().and_then(|request| request.blood_group))
	}
}

/// Payload for `POST /alertes/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewAlert {
	/// Identifier of the blood request being broadcast.
	#[serde(rename = "requete")]
	pub request_id: u64,
	/// Blood group targeted by the alert.
	#[serde(rename = "groupe_sanguin")]
	pub blood_group: BloodGroup,
}
