use anyhow::{Context, Result};
use rtis_core::{RuleTable, TripMetadata};
use serde::Deserialize;
use std::fs;

const PLACEHOLDER_SCRIPT_URL: &str = "YOUR_NEW_WEB_APP_URL_HERE";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub input: InputConfig,
	pub trip: TripMetadata,
	#[serde(default)]
	pub rules: RuleTable,
	#[serde(default)]
	pub bank: BankConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
	/// JSON array of parsed RTIS rows
	pub journey_path: String,
	/// JSON array of station records; kilometre points are used without it
	pub stations_path: Option<String>,
	/// Report is printed to stdout when unset
	pub report_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BankConfig {
	pub enabled: bool,
	pub script_url: String,
	pub allow_duplicates: bool,
}

impl Default for BankConfig {
	fn default() -> Self {
		Self { enabled: false, script_url: String::from(PLACEHOLDER_SCRIPT_URL), allow_duplicates: false }
	}
}

impl Config {
	pub fn load(path: &str) -> Result<Self> {
		let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file: {path}"))?;

		Self::parse(&content)
	}

	fn parse(content: &str) -> Result<Self> {
		let config: Self = toml::from_str(content).with_context(|| "Failed to parse config file")?;

		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		if self.trip.train_no.trim().is_empty() {
			anyhow::bail!("trip.trainNo must be set");
		}

		if self.trip.journey_date.trim().is_empty() {
			anyhow::bail!("trip.journeyDate must be set");
		}

		if !self.trip.mps.is_finite() || self.trip.mps <= 0.0 {
			anyhow::bail!("trip.mps must be a positive speed");
		}

		self.rules.validate().context("Invalid rule table")?;

		if self.bank.enabled {
			if self.bank.script_url == PLACEHOLDER_SCRIPT_URL {
				anyhow::bail!("Please set a valid report bank script_url in config.toml");
			}

			url::Url::parse(&self.bank.script_url).context("bank.script_url is not a valid URL")?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rtis_core::{RakeType, SpeedDrop};

	const MINIMAL: &str = r#"
		[input]
		journey_path = "journey.json"

		[trip]
		trainNo = "12952"
		journeyDate = "2024-03-01"
		rakeType = "COACHING"
		mps = 130
	"#;

	#[test]
	fn test_minimal_config_uses_defaults() {
		let config = Config::parse(MINIMAL).unwrap();

		assert_eq!(config.trip.rake_label, "COACHING");
		assert_eq!(config.trip.rake_type(), RakeType::Coaching);
		assert_eq!(config.trip.mps, 130.0);
		assert!(config.input.stations_path.is_none());
		assert_eq!(config.rules, RuleTable::default());
		assert!(!config.bank.enabled);
	}

	#[test]
	fn test_rule_overrides() {
		let content = format!(
			"{MINIMAL}
		[rules.brake_tests.passenger]
		window_secs = 120
		bft = {{ min_speed = 10.0, max_speed = 20.0, drop = {{ absolute = 6.0 }} }}
		bpt = {{ min_speed = 50.0, max_speed = 65.0, drop = {{ fraction = 0.35 }} }}
		"
		);
		let config = Config::parse(&content).unwrap();

		assert_eq!(config.rules.brake_tests.passenger.window_secs, 120);
		assert_eq!(config.rules.brake_tests.passenger.bft.drop, SpeedDrop::Absolute(6.0));
		assert_eq!(config.rules.brake_tests.goods, RuleTable::default().brake_tests.goods);
	}

	#[test]
	fn test_enabled_bank_needs_real_url() {
		let content = format!(
			"{MINIMAL}
		[bank]
		enabled = true
		script_url = \"YOUR_NEW_WEB_APP_URL_HERE\"
		allow_duplicates = false
		"
		);
		assert!(Config::parse(&content).is_err());
	}

	#[test]
	fn test_partial_bank_table_takes_defaults() {
		let content = format!(
			"{MINIMAL}
		[bank]
		enabled = true
		script_url = \"https://script.google.com/macros/s/abc/exec\"
		"
		);
		let config = Config::parse(&content).unwrap();

		assert!(config.bank.enabled);
		assert!(!config.bank.allow_duplicates);
	}

	#[test]
	fn test_rejects_non_positive_mps() {
		let content = MINIMAL.replace("mps = 130", "mps = 0");
		assert!(Config::parse(&content).is_err());
	}

	#[test]
	fn test_example_config_parses() {
		let config = Config::parse(include_str!("../../../config.example.toml")).unwrap();

		assert_eq!(config.trip.crew.cli_name, "R. Sharma");
		assert_eq!(config.input.stations_path.as_deref(), Some("stations.json"));
		assert!(config.input.report_path.is_none());
	}
}
