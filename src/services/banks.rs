// self
use crate::{
	_prelude::*,
	client::ApiClient,
	domain::Bank,
	http::{ApiRequest, HttpTransport},
};

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every registered blood bank (`GET /banques/`).
	pub async fn list_banks(&self) -> Result<Vec<Bank>> {
		self.send_json(ApiRequest::get("/banques/")).await
	}
}
