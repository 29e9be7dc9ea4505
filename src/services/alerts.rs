// self
use crate::{
	_prelude::*,
	client::ApiClient,
	domain::{Alert, BloodGroup, NewAlert, Status},
	http::{ApiRequest, HttpTransport},
	services::StatusUpdate,
};

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Alerts donors of `blood_group` about an open request.
	///
	/// The API's response body is not part of the contract and is discarded.
	pub async fn create_alert(&self, request_id: u64, blood_group: BloodGroup) -> Result<()> {
		let body = NewAlert { request_id, blood_group };

		self.send(ApiRequest::post("/alertes/").json(&body)?).await?;

		Ok(())
	}

	/// Moves an alert to `status` and returns the updated record.
	pub async fn update_alert_status(&self, id: u64, status: Status) -> Result<Alert> {
		let path = format!("/alertes/{id}/mettre-a-jour-statut/");

		self.send_json(ApiRequest::patch(path).json(&StatusUpdate { statut: status })?).await
	}

	/// Lists the alerts a blood bank has sent.
	pub async fn alerts_sent_by_bank(&self, bank_id: u64) -> Result<Vec<Alert>> {
		self.send_json(ApiRequest::get("/alertes/banque/").query("banque_id", bank_id)).await
	}

	/// Lists the alerts addressed to donors of `blood_group`.
	pub async fn alerts_for_blood_group(&self, blood_group: BloodGroup) -> Result<Vec<Alert>> {
		self.send_json(
			ApiRequest::get("/alertes/par-groupe/").query("groupe_sanguin", blood_group.as_str()),
		)
		.await
	}
}
