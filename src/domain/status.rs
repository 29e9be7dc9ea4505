//! Canonical workflow status shared by blood requests and alerts.
//!
//! The API has historically emitted several spellings for the same state (`en attente` and
//! `en_attente`, `envoyee` and `envoyée`, `valide` and `acceptee`). Decoding folds all of them
//! into [`Status`]; encoding always emits the canonical label.

// self
use crate::{_prelude::*, domain::VocabularyError};

/// Lifecycle of a blood request or alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
	/// Waiting for the bank (`en_attente`).
	Pending,
	/// Alert sent to matching donors (`envoyee`).
	Sent,
	/// Accepted by a donor or validated by the bank (`acceptee`).
	Accepted,
	/// Fulfilled (`completed`).
	Completed,
}
impl Status {
	/// Returns the canonical wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "en_attente",
			Self::Sent => "envoyee",
			Self::Accepted => "acceptee",
			Self::Completed => "completed",
		}
	}

	/// Returns `true` once no further transition is expected.
	pub const fn is_final(self) -> bool {
		matches!(self, Self::Completed)
	}
}
impl Display for Status {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Status {
	type Err = VocabularyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_lowercase().replace(['_', '-'], " ").replace('é', "e");

		match normalized.as_str() {
			"en attente" | "pending" => Ok(Self::Pending),
			"envoyee" | "sent" => Ok(Self::Sent),
			"acceptee" | "valide" | "validee" | "accepted" => Ok(Self::Accepted),
			"completed" | "complete" | "terminee" => Ok(Self::Completed),
			_ => Err(VocabularyError { kind: "status", value: s.to_owned() }),
		}
	}
}
impl Serialize for Status {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for Status {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		raw.parse().map_err(serde::de::Error::custom)
	}
}
