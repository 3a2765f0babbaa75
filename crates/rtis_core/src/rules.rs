use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::stops::APPROACH_OFFSETS;
use crate::types::RakeType;

/// Highest speed allowed at a given distance before a stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetLimit {
	pub offset_m: u32,
	pub max_speed: f64,
}

impl OffsetLimit {
	const fn new(offset_m: u32, max_speed: f64) -> Self {
		Self { offset_m, max_speed }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedDrop {
	/// km/h below the window's start speed
	Absolute(f64),
	/// Share of the window's start speed
	Fraction(f64),
}

impl SpeedDrop {
	#[must_use]
	pub fn required_for(&self, start_speed: f64) -> f64 {
		match *self {
			Self::Absolute(kmh) => kmh,
			Self::Fraction(fraction) => start_speed * fraction,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropRule {
	pub min_speed: f64,
	pub max_speed: f64,
	pub drop: SpeedDrop,
}

impl DropRule {
	#[must_use]
	pub fn admits(&self, speed: f64) -> bool {
		(self.min_speed..=self.max_speed).contains(&speed)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrakeTestRules {
	pub bft: DropRule,
	pub bpt: DropRule,
	/// Window length; read as a sample count when the log carries no usable clock
	pub window_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakingRules {
	pub goods: Vec<OffsetLimit>,
	pub default: Vec<OffsetLimit>,
}

impl Default for BrakingRules {
	fn default() -> Self {
		Self {
			goods: vec![
				OffsetLimit::new(2000, 55.0),
				OffsetLimit::new(1000, 40.0),
				OffsetLimit::new(500, 25.0),
				OffsetLimit::new(100, 15.0),
				OffsetLimit::new(50, 10.0),
			],
			default: vec![
				OffsetLimit::new(2000, 100.0),
				OffsetLimit::new(1000, 60.0),
				OffsetLimit::new(500, 50.0),
				OffsetLimit::new(100, 30.0),
				OffsetLimit::new(50, 15.0),
			],
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakeTestRuleSet {
	pub goods: BrakeTestRules,
	pub passenger: BrakeTestRules,
}

impl Default for BrakeTestRuleSet {
	fn default() -> Self {
		Self {
			goods: BrakeTestRules {
				bft: DropRule { min_speed: 12.0, max_speed: 24.0, drop: SpeedDrop::Absolute(5.0) },
				bpt: DropRule { min_speed: 35.0, max_speed: 55.0, drop: SpeedDrop::Fraction(0.4) },
				window_secs: 90,
			},
			passenger: BrakeTestRules {
				bft: DropRule { min_speed: 12.0, max_speed: 23.0, drop: SpeedDrop::Absolute(5.0) },
				bpt: DropRule { min_speed: 55.0, max_speed: 70.0, drop: SpeedDrop::Fraction(0.4) },
				window_secs: 90,
			},
		}
	}
}

/// Per-rake thresholds for braking quality and brake tests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
	pub braking: BrakingRules,
	pub brake_tests: BrakeTestRuleSet,
}

impl RuleTable {
	#[must_use]
	pub fn braking_limits(&self, rake: &RakeType) -> &[OffsetLimit] {
		match rake {
			RakeType::Goods => &self.braking.goods,
			_ => &self.braking.default,
		}
	}

	/// Unrecognised rakes fall back to the goods brake-test rules
	#[must_use]
	pub const fn brake_test_rules(&self, rake: &RakeType) -> &BrakeTestRules {
		if rake.is_passenger() { &self.brake_tests.passenger } else { &self.brake_tests.goods }
	}

	pub fn validate(&self) -> AnalysisResult<()> {
		for (name, limits) in [("goods", &self.braking.goods), ("default", &self.braking.default)] {
			if limits.is_empty() {
				return Err(AnalysisError::InvalidParameter(format!("braking.{name} has no offset limits")));
			}

			for limit in limits {
				if !APPROACH_OFFSETS.iter().any(|offset| offset.meters == limit.offset_m) {
					return Err(AnalysisError::InvalidParameter(format!(
						"braking.{name}: {} m is not a profiled offset",
						limit.offset_m
					)));
				}
				if !limit.max_speed.is_finite() || limit.max_speed < 0.0 {
					return Err(AnalysisError::InvalidParameter(format!(
						"braking.{name}: limit at {} m must be a non-negative speed",
						limit.offset_m
					)));
				}
			}
		}

		for (name, rules) in [("goods", &self.brake_tests.goods), ("passenger", &self.brake_tests.passenger)] {
			if rules.window_secs == 0 {
				return Err(AnalysisError::InvalidParameter(format!("brake_tests.{name}.window_secs must be positive")));
			}

			for (test, rule) in [("bft", &rules.bft), ("bpt", &rules.bpt)] {
				if !(rule.min_speed > 0.0 && rule.min_speed <= rule.max_speed) {
					return Err(AnalysisError::InvalidParameter(format!(
						"brake_tests.{name}.{test}: speed range must be positive and ordered"
					)));
				}

				let drop_ok = match rule.drop {
					SpeedDrop::Absolute(kmh) => kmh > 0.0 && kmh.is_finite(),
					SpeedDrop::Fraction(fraction) => fraction > 0.0 && fraction <= 1.0,
				};
				if !drop_ok {
					return Err(AnalysisError::InvalidParameter(format!("brake_tests.{name}.{test}: invalid drop")));
				}
			}
		}

		Ok(())
	}
}
