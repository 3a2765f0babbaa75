use chrono::{DateTime, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};
use crate::station::StationDirectory;
use crate::types::Sample;

const DATE_TIME_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%d-%m-%Y %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
/// Minute-only clocks are left unresolved so brake tests fall back to sample windows
const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";
const SECONDS_PER_DAY: f64 = 86_400.0;

/// One row of the RTIS export as handed over by the file parser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
	#[serde(rename = "Gps Time", default)]
	pub gps_time: Option<Value>,
	#[serde(rename = "Time", default)]
	pub time: Option<Value>,
	#[serde(rename = "Speed", default)]
	pub speed: Option<Value>,
	#[serde(rename = "Distance", default)]
	pub distance: Option<Value>,
	#[serde(rename = "Location", default)]
	pub location: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeDiagnostics {
	/// Rows dropped for lacking both time fields
	pub rejected_rows: usize,
	/// Speed or distance values that were missing or unreadable and read as 0
	pub coerced_fields: usize,
	/// Samples labelled with a synthesized kilometre point
	pub synthesized_locations: usize,
	/// Whether brake-test windows can be measured in wall-clock time
	pub clock_resolved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedJourney {
	pub samples: Vec<Sample>,
	pub diagnostics: NormalizeDiagnostics,
}

pub fn normalize(rows: &[RawRow], directory: &StationDirectory) -> AnalysisResult<NormalizedJourney> {
	let mut diagnostics = NormalizeDiagnostics::default();
	let mut samples = Vec::with_capacity(rows.len());

	for (row_index, row) in rows.iter().enumerate() {
		let Some(timestamp) = scalar_text(row.gps_time.as_ref()).or_else(|| scalar_text(row.time.as_ref())) else {
			diagnostics.rejected_rows += 1;
			continue;
		};

		let (speed, speed_coerced) = coerce_number(row.speed.as_ref(), row_index, "Speed")?;
		let (distance, distance_coerced) = coerce_number(row.distance.as_ref(), row_index, "Distance")?;
		diagnostics.coerced_fields += usize::from(speed_coerced) + usize::from(distance_coerced);

		let location = match scalar_text(row.location.as_ref()) {
			Some(label) => label,
			None => {
				if let Some(name) = directory.station_name_near(distance) {
					name.to_string()
				} else {
					diagnostics.synthesized_locations += 1;
					format!("KM {distance:.2}")
				}
			},
		};

		samples.push(Sample { index: samples.len(), timestamp, elapsed_secs: None, speed: speed.max(0.0), distance, location });
	}

	if let Some(elapsed) = elapsed_seconds(&samples) {
		for (sample, secs) in samples.iter_mut().zip(elapsed) {
			sample.elapsed_secs = Some(secs);
		}
		diagnostics.clock_resolved = true;
	}

	debug!(
		samples = samples.len(),
		rejected_rows = diagnostics.rejected_rows,
		coerced_fields = diagnostics.coerced_fields,
		clock_resolved = diagnostics.clock_resolved,
		"Journey normalized"
	);

	Ok(NormalizedJourney { samples, diagnostics })
}

/// Non-blank string or number, as text
fn scalar_text(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(text) => Some(text.trim()).filter(|t| !t.is_empty()).map(str::to_string),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

/// Returns the value and whether it had to fall back to 0
fn coerce_number(value: Option<&Value>, row: usize, field: &'static str) -> AnalysisResult<(f64, bool)> {
	let parsed = match value {
		None | Some(Value::Null) => None,
		Some(Value::Number(number)) => number.as_f64(),
		Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
		Some(Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
			return Err(AnalysisError::NonNumericField { row, field });
		},
	};

	Ok(parsed.filter(|v| v.is_finite()).map_or((0.0, true), |v| (v, false)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Clock {
	Absolute(NaiveDateTime),
	TimeOfDay(NaiveTime),
	Seconds(f64),
}

fn parse_clock(text: &str) -> Option<Clock> {
	if let Ok(seconds) = text.parse::<f64>() {
		return seconds.is_finite().then_some(Clock::Seconds(seconds));
	}

	if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
		return Some(Clock::Absolute(parsed.naive_utc()));
	}

	DATE_TIME_FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
		.map(Clock::Absolute)
		.or_else(|| NaiveTime::parse_from_str(text, TIME_OF_DAY_FORMAT).ok().map(Clock::TimeOfDay))
}

/// Seconds since the first sample, or `None` unless every timestamp reads as the same kind of clock.
/// A time of day that goes backwards is taken as a roll-over past midnight.
fn elapsed_seconds(samples: &[Sample]) -> Option<Vec<f64>> {
	let clocks: Vec<Clock> = samples.iter().map(|s| parse_clock(&s.timestamp)).collect::<Option<_>>()?;
	let first = *clocks.first()?;

	let mut elapsed = Vec::with_capacity(clocks.len());
	let mut day_offset = 0.0;
	let mut previous_time_of_day: Option<NaiveTime> = None;

	for clock in clocks {
		let secs = match (first, clock) {
			(Clock::Absolute(origin), Clock::Absolute(at)) => (at - origin).num_milliseconds() as f64 / 1000.0,
			(Clock::Seconds(origin), Clock::Seconds(at)) => at - origin,
			(Clock::TimeOfDay(origin), Clock::TimeOfDay(at)) => {
				if previous_time_of_day.is_some_and(|previous| at < previous) {
					day_offset += SECONDS_PER_DAY;
				}
				previous_time_of_day = Some(at);
				(at - origin).num_milliseconds() as f64 / 1000.0 + day_offset
			},
			_ => {
				debug!("Mixed timestamp formats, brake-test windows fall back to sample counts");
				return None;
			},
		};
		elapsed.push(secs);
	}

	Some(elapsed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::station::StationRecord;
	use serde_json::json;

	fn rows(value: Value) -> Vec<RawRow> {
		serde_json::from_value(value).unwrap()
	}

	fn directory() -> StationDirectory {
		StationDirectory::new(vec![StationRecord { signal_name: String::from("BPL HOME"), cumulative_distance: 1000.0 }])
	}

	#[test]
	fn test_rows_without_time_are_dropped() {
		let rows = rows(json!([
			{"Gps Time": "2024-03-01 10:00:00", "Speed": 10, "Distance": 0},
			{"Speed": 12, "Distance": 10},
			{"Time": "  ", "Speed": 12, "Distance": 10},
			{"Time": "2024-03-01 10:00:02", "Speed": "14.5", "Distance": "20"}
		]));

		let journey = normalize(&rows, &directory()).unwrap();

		assert_eq!(journey.samples.len(), 2);
		assert_eq!(journey.diagnostics.rejected_rows, 2);
		assert_eq!(journey.samples[1].index, 1);
		assert_eq!(journey.samples[1].timestamp, "2024-03-01 10:00:02");
		assert_eq!(journey.samples[1].speed, 14.5);
		assert_eq!(journey.samples[1].distance, 20.0);
	}

	#[test]
	fn test_gps_time_takes_precedence() {
		let rows = rows(json!([{"Gps Time": "10:00:05", "Time": "10:00:00", "Speed": 1, "Distance": 0}]));
		let journey = normalize(&rows, &directory()).unwrap();

		assert_eq!(journey.samples[0].timestamp, "10:00:05");
	}

	#[test]
	fn test_unreadable_numbers_default_to_zero() {
		let rows = rows(json!([
			{"Time": "1", "Speed": "fast", "Distance": null},
			{"Time": "2", "Speed": "", "Distance": "12.5"},
			{"Time": "3", "Speed": -4, "Distance": 13}
		]));
		let journey = normalize(&rows, &directory()).unwrap();

		assert_eq!(journey.samples[0].speed, 0.0);
		assert_eq!(journey.samples[0].distance, 0.0);
		assert_eq!(journey.samples[1].distance, 12.5);
		assert_eq!(journey.samples[2].speed, 0.0);
		assert_eq!(journey.diagnostics.coerced_fields, 3);
	}

	#[test]
	fn test_non_numeric_value_is_an_error() {
		let rows = rows(json!([
			{"Time": "1", "Speed": 10, "Distance": 0},
			{"Time": "2", "Speed": [10], "Distance": 5}
		]));

		assert_eq!(
			normalize(&rows, &directory()),
			Err(AnalysisError::NonNumericField { row: 1, field: "Speed" })
		);
	}

	#[test]
	fn test_location_resolution() {
		let rows = rows(json!([
			{"Time": "1", "Speed": 10, "Distance": 960, "Location": "  "},
			{"Time": "2", "Speed": 10, "Distance": 1040},
			{"Time": "3", "Speed": 10, "Distance": 1234.567},
			{"Time": "4", "Speed": 10, "Distance": 1300, "Location": "LC GATE 12"}
		]));
		let journey = normalize(&rows, &directory()).unwrap();

		let locations: Vec<&str> = journey.samples.iter().map(|s| s.location.as_str()).collect();
		assert_eq!(locations, vec!["BPL HOME", "BPL HOME", "KM 1234.57", "LC GATE 12"]);
		assert_eq!(journey.diagnostics.synthesized_locations, 1);
	}

	#[test]
	fn test_missing_directory_synthesizes_km_points() {
		let rows = rows(json!([{"Time": "1", "Speed": 10, "Distance": 1000}]));
		let journey = normalize(&rows, &StationDirectory::default()).unwrap();

		assert_eq!(journey.samples[0].location, "KM 1000.00");
	}

	#[test]
	fn test_elapsed_seconds_from_date_times() {
		let rows = rows(json!([
			{"Gps Time": "01/03/2024 23:59:30", "Speed": 10, "Distance": 0},
			{"Gps Time": "02/03/2024 00:00:15", "Speed": 10, "Distance": 100}
		]));
		let journey = normalize(&rows, &directory()).unwrap();

		assert!(journey.diagnostics.clock_resolved);
		assert_eq!(journey.samples[0].elapsed_secs, Some(0.0));
		assert_eq!(journey.samples[1].elapsed_secs, Some(45.0));
	}

	#[test]
	fn test_time_of_day_rolls_over_midnight() {
		let rows = rows(json!([
			{"Time": "23:59:00", "Speed": 10, "Distance": 0},
			{"Time": "00:00:30", "Speed": 10, "Distance": 100},
			{"Time": "00:01:00", "Speed": 10, "Distance": 200}
		]));
		let journey = normalize(&rows, &directory()).unwrap();

		let elapsed: Vec<Option<f64>> = journey.samples.iter().map(|s| s.elapsed_secs).collect();
		assert_eq!(elapsed, vec![Some(0.0), Some(90.0), Some(120.0)]);
	}

	#[test]
	fn test_unparsable_clock_leaves_elapsed_unset() {
		let rows = rows(json!([
			{"Time": "10:00:00", "Speed": 10, "Distance": 0},
			{"Time": "shortly after", "Speed": 10, "Distance": 100}
		]));
		let journey = normalize(&rows, &directory()).unwrap();

		assert!(!journey.diagnostics.clock_resolved);
		assert!(journey.samples.iter().all(|s| s.elapsed_secs.is_none()));
	}

	#[test]
	fn test_minute_resolution_clock_is_unresolved() {
		let rows = rows(json!([
			{"Time": "10:00", "Speed": 20, "Distance": 0},
			{"Time": "10:01", "Speed": 20, "Distance": 5},
			{"Time": "10:02", "Speed": 14, "Distance": 10}
		]));
		let journey = normalize(&rows, &directory()).unwrap();

		assert!(!journey.diagnostics.clock_resolved);
		assert!(journey.samples.iter().all(|s| s.elapsed_secs.is_none()));
		assert_eq!(journey.samples[2].timestamp, "10:02");
	}

	#[test]
	fn test_numeric_timestamps() {
		let rows = rows(json!([
			{"Time": 1_700_000_000, "Speed": 10, "Distance": 0},
			{"Time": 1_700_000_002, "Speed": 10, "Distance": 20}
		]));
		let journey = normalize(&rows, &directory()).unwrap();

		assert_eq!(journey.samples[0].timestamp, "1700000000");
		assert_eq!(journey.samples[1].elapsed_secs, Some(2.0));
	}
}
