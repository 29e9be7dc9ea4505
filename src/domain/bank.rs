//! Blood bank records.

// self
use crate::_prelude::*;

/// Blood bank as listed by `GET /banques/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
	/// Server-side identifier.
	pub id: u64,
	/// Display name.
	#[serde(rename = "nom")]
	pub name: String,
	/// Free-text location.
	#[serde(rename = "localisation", default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

/// Bank reference embedded in other payloads, either as a bare id or as a full record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BankRef {
	/// Numeric identifier only.
	Id(u64),
	/// Expanded record.
	Bank(Bank),
}
impl BankRef {
	/// Returns the referenced bank identifier.
	pub fn id(&self) -> u64 {
		match self {
			Self::Id(id) => *id,
			Self::Bank(bank) => bank.id,
		}
	}
}

/// Sparse bank record nested in alert payloads; every field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialBank {
	/// Server-side identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	/// Display name.
	#[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Free-text location.
	#[serde(rename = "localisation", default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

/// Like [`BankRef`], but the expanded form may omit any field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartialBankRef {
	/// Numeric identifier only.
	Id(u64),
	/// Possibly sparse record.
	Bank(PartialBank),
}
impl PartialBankRef {
	/// Returns the bank identifier, when the payload carried one.
	pub fn id(&self) -> Option<u64> {
		match self {
			Self::Id(id) => Some(*id),
			Self::Bank(bank) => bank.id,
		}
	}

	/// Returns the bank name, when the payload carried one.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Id(_) => None,
			Self::Bank(bank) => bank.name.as_deref(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bank_ref_accepts_both_shapes() {
		let bare: BankRef = serde_json::from_str("7").expect("Bare id should decode.");
		let full: BankRef =
			serde_json::from_str(r#"{"id":9,"nom":"CNTS","localisation":"Dakar"}"#)
				.expect("Expanded bank should decode.");

		assert_eq!(bare.id(), 7);
		assert_eq!(full.id(), 9);

		let BankRef::Bank(bank) = full else {
			panic!("Expanded bank should decode as a full record.");
		};

		assert_eq!(bank.location.as_deref(), Some("Dakar"));
	}

	#[test]
	fn partial_bank_ref_tolerates_missing_fields() {
		let bare: PartialBankRef = serde_json::from_str("2").expect("Bare id should decode.");
		let nameless: PartialBankRef =
			serde_json::from_str(r#"{"id":5}"#).expect("Bank without name should decode.");
		let anonymous: PartialBankRef =
			serde_json::from_str(r#"{"nom":"CNTS"}"#).expect("Bank without id should decode.");

		assert_eq!((bare.id(), bare.name()), (Some(2), None));
		assert_eq!((nameless.id(), nameless.name()), (Some(5), None));
		assert_eq!((anonymous.id(), anonymous.name()), (None, Some("CNTS")));
	}
}
