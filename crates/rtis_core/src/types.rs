use serde::{Deserialize, Serialize};
use std::fmt;

/// One telemetry point of the journey, already coerced and located
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
	pub index: usize,
	pub timestamp: String,
	/// Seconds since the first sample, only when every timestamp of the journey parsed
	pub elapsed_secs: Option<f64>,
	/// km/h
	pub speed: f64,
	/// Cumulative distance in meters
	pub distance: f64,
	pub location: String,
}

impl Sample {
	#[must_use]
	pub fn is_stationary(&self) -> bool {
		self.speed == 0.0
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RakeType {
	Goods,
	Coaching,
	Memu,
	Other(String),
}

impl RakeType {
	#[must_use]
	pub fn parse(label: &str) -> Self {
		let upper = label.trim().to_uppercase();

		// Rake labels from the crew lobby are free text like "COACHING (LHB)"
		if upper.contains("COACHING") {
			Self::Coaching
		} else if upper.contains("MEMU") {
			Self::Memu
		} else if upper.contains("GOODS") {
			Self::Goods
		} else {
			Self::Other(label.trim().to_string())
		}
	}

	#[must_use]
	pub const fn is_passenger(&self) -> bool {
		matches!(self, Self::Coaching | Self::Memu)
	}
}

impl From<String> for RakeType {
	fn from(value: String) -> Self {
		Self::parse(&value)
	}
}

impl fmt::Display for RakeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Goods => write!(f, "GOODS"),
			Self::Coaching => write!(f, "COACHING"),
			Self::Memu => write!(f, "MEMU"),
			Self::Other(label) => write!(f, "{label}"),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewIds {
	#[serde(default)]
	pub loco_pilot: String,
	#[serde(default)]
	pub assistant_loco_pilot: String,
	#[serde(default)]
	pub cli_name: String,
}

/// Caller-supplied trip details, carried into the report verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripMetadata {
	pub train_no: String,
	pub journey_date: String,
	/// Rake as entered by the crew lobby, e.g. "COACHING (LHB)"
	#[serde(rename = "rakeType")]
	pub rake_label: String,
	#[serde(default)]
	pub load_type: String,
	#[serde(default)]
	pub crew: CrewIds,
	/// Maximum permitted speed, km/h
	pub mps: f64,
	#[serde(default)]
	pub disambiguator: Option<String>,
}

impl TripMetadata {
	/// Rule class selected by the free-text rake label
	#[must_use]
	pub fn rake_type(&self) -> RakeType {
		RakeType::parse(&self.rake_label)
	}
}
