//! ABO/Rh blood groups as exchanged with the API.

// self
use crate::{_prelude::*, domain::VocabularyError};

/// The eight ABO/Rh blood groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BloodGroup {
	/// `A+`
	APositive,
	/// `A-`
	ANegative,
	/// `B+`
	BPositive,
	/// `B-`
	BNegative,
	/// `AB+`
	AbPositive,
	/// `AB-`
	AbNegative,
	/// `O+`
	OPositive,
	/// `O-`
	ONegative,
}
impl BloodGroup {
	/// Every blood group, in the order the registration form lists them.
	pub const ALL: [Self; 8] = [
		Self::APositive,
		Self::ANegative,
		Self::BPositive,
		Self::BNegative,
		Self::AbPositive,
		Self::AbNegative,
		Self::OPositive,
		Self::ONegative,
	];

	/// Returns the wire label (`A+`, `AB-`, ...).
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::APositive => "A+",
			Self::ANegative => "A-",
			Self::BPositive => "B+",
			Self::BNegative => "B-",
			Self::AbPositive => "AB+",
			Self::AbNegative => "AB-",
			Self::OPositive => "O+",
			Self::ONegative => "O-",
		}
	}
}
impl Display for BloodGroup {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for BloodGroup {
	type Err = VocabularyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let view = s.trim();

		Self::ALL
			.into_iter()
			.find(|group| group.as_str().eq_ignore_ascii_case(view))
			.ok_or_else(|| VocabularyError { kind: "blood group", value: s.to_owned() })
	}
}
impl Serialize for BloodGroup {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for BloodGroup {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		raw.parse().map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_labels_case_insensitively() {
		assert_eq!("ab+".parse::<BloodGroup>(), Ok(BloodGroup::AbPositive));
		assert_eq!(" O- ".parse::<BloodGroup>(), Ok(BloodGroup::ONegative));
		assert!("C+".parse::<BloodGroup>().is_err());
		assert!("".parse::<BloodGroup>().is_err());
	}

	#[test]
	fn serde_uses_wire_labels() {
		let json = serde_json::to_string(&BloodGroup::BNegative)
			.expect("Blood group should serialize.");

		assert_eq!(json, "\"B-\"");

		let parsed: BloodGroup =
			serde_json::from_str("\"AB-\"").expect("Wire label should deserialize.");

		assert_eq!(parsed, BloodGroup::AbNegative);
		assert!(serde_json::from_str::<BloodGroup>("\"Z\"").is_err());
	}
}
