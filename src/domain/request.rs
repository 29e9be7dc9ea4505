//! Doctor-originated blood requests (`requetes`).

// self
use crate::{
	_prelude::*,
	domain::{BloodGroup, Status},
	error::Error,
};

/// Bank summary nested under a doctor inside bank-scoped listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSummary {
	/// Display name.
	#[serde(rename = "nom")]
	pub name: String,
	/// Free-text location.
	#[serde(rename = "localisation", default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

/// Doctor attached to a blood request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestingDoctor {
	/// Family name.
	#[serde(rename = "nom")]
	pub last_name: String,
	/// Given name.
	#[serde(rename = "prenom")]
	pub first_name: String,
	/// Registration code issued by the medical board.
	#[serde(rename = "code_inscription", default, skip_serializing_if = "Option::is_none")]
	pub registration_code: Option<String>,
	/// Whether the platform verified the doctor.
	#[serde(rename = "est_verifie", default, skip_serializing_if = "Option::is_none")]
	pub verified: Option<bool>,
	/// Identifier of the doctor's bank.
	#[serde(rename = "BanqueDeSang_id", default, skip_serializing_if = "Option::is_none")]
	pub bank_id: Option<u64>,
	/// Name of the doctor's bank.
	#[serde(rename = "BanqueDeSang_nom", default, skip_serializing_if = "Option::is_none")]
	pub bank_name: Option<String>,
	/// Expanded bank summary, when the listing embeds it.
	#[serde(rename = "banque", default, skip_serializing_if = "Option::is_none")]
	pub bank: Option<BankSummary>,
}
impl RequestingDoctor {
	/// Returns `prenom nom`.
	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name).trim().to_owned()
	}
}

/// Blood request as returned by the `requetes` endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodRequest {
	/// Server-side identifier.
	pub id: u64,
	/// Creation instant.
	#[serde(
		rename = "date_requete",
		default,
		skip_serializing_if = "Option::is_none",
		with = "time::serde::rfc3339::option"
	)]
	pub requested_at: Option<OffsetDateTime>,
	/// Requested blood group.
	#[serde(rename = "groupe_sanguin")]
	pub blood_group: BloodGroup,
	/// Requested quantity, in bags.
	#[serde(rename = "quantite")]
	pub quantity: u32,
	/// Workflow status.
	#[serde(rename = "statut")]
	pub status: Status,
	/// Requesting doctor.
	#[serde(rename = "docteur")]
	pub doctor: RequestingDoctor,
}

/// Payload for `POST /requetes/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewBloodRequest {
	/// Requested blood group.
	#[serde(rename = "groupe_sanguin")]
	pub blood_group: BloodGroup,
	/// Requested quantity, in bags.
	#[serde(rename = "quantite")]
	pub quantity: u32,
}
impl NewBloodRequest {
	/// Creates a request payload.
	pub fn new(blood_group: BloodGroup, quantity: u32) -> Self {
		Self { blood_group, quantity }
	}

	/// Rejects an empty quantity.
	pub fn validate(&self) -> Result<()> {
		if self.quantity == 0 {
			return Err(Error::MissingField { field: "quantite" });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decodes_doctor_listing_payload() {
		let payload = r#"{
			"id": 12,
			"date_requete": "2025-03-04T10:15:30.123456Z",
			"groupe_sanguin": "O-",
			"quantite": 3,
			"statut": "en attente",
			"docteur": {
				"nom": "Diallo",
				"prenom": "Awa",
				"code_inscription": "MED-42",
				"est_verifie": true,
				"BanqueDeSang_id": 4,
				"BanqueDeSang_nom": "CNTS"
			}
		}"#;
		let request: BloodRequest =
			serde_json::from_str(payload).expect("Doctor listing payload should decode.");

		assert_eq!(request.blood_group, BloodGroup::ONegative);
		assert_eq!(request.status, Status::Pending);
		assert_eq!(request.doctor.bank_id, Some(4));
		assert_eq!(request.doctor.full_name(), "Awa Diallo");
		assert!(request.requested_at.is_some());
	}

	#[test]
	fn new_request_requires_quantity() {
		assert!(matches!(
			NewBloodRequest::new(BloodGroup::APositive, 0).validate(),
			Err(Error::MissingField { field: "quantite" })
		));

		let body = serde_json::to_value(NewBloodRequest::new(BloodGroup::APositive, 2))
			.expect("New request should serialize.");

		assert_eq!(body, serde_json::json!({ "groupe_sanguin": "A+", "quantite": 2 }));
	}
}
