//! Typed resource endpoints layered on [`ApiClient::send`](crate::client::ApiClient::send).
//!
//! Every call here is authenticated and inherits the client's refresh-and-replay behavior.

mod alerts;
mod banks;
mod requests;

// self
use crate::{_prelude::*, domain::Status};

/// Body shared by the `mettre-a-jour-statut` endpoints.
#[derive(Serialize)]
struct StatusUpdate {
	statut: Status,
}
