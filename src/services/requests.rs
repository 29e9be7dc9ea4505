// self
use crate::{
	_prelude::*,
	client::ApiClient,
	domain::{BloodRequest, NewBloodRequest, Status},
	http::{ApiRequest, HttpTransport},
	services::StatusUpdate,
};

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the signed-in doctor's blood requests.
	pub async fn list_requests(&self) -> Result<Vec<BloodRequest>> {
		self.send_json(ApiRequest::get("/requetes/")).await
	}

	/// Files a new blood request on behalf of the signed-in doctor.
	///
	/// A zero quantity is rejected locally as [`Error::MissingField`].
	pub async fn create_request(&self, request: &NewBloodRequest) -> Result<BloodRequest> {
		request.validate()?;

		self.send_json(ApiRequest::post("/requetes/").json(request)?).await
	}

	/// Moves a blood request to `status` and returns the updated record.
	pub async fn update_request_status(&self, id: u64, status: Status) -> Result<BloodRequest> {
		let path = format!("/requetes/{id}/mettre-a-jour-statut/");

		self.send_json(ApiRequest::patch(path).json(&StatusUpdate { statut: status })?).await
	}

	/// Lists the requests routed to a blood bank.
	pub async fn requests_for_bank(&self, bank_id: u64) -> Result<Vec<BloodRequest>> {
		self.send_json(ApiRequest::get(format!("/requetes/par-banque/{bank_id}/"))).await
	}
}
