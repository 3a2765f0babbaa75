use serde::Serialize;
use serde::ser::SerializeMap;

use crate::types::Sample;

/// Approach scans stop once a sample is farther than this from the stop
pub const APPROACH_SCAN_LIMIT_M: f64 = 2500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachOffset {
	pub meters: u32,
	pub tolerance: f64,
}

const fn offset(meters: u32, tolerance: f64) -> ApproachOffset {
	ApproachOffset { meters, tolerance }
}

/// Distances before a stop at which the approach speed is recorded, farthest first
pub const APPROACH_OFFSETS: [ApproachOffset; 11] = [
	offset(2000, 20.0),
	offset(1000, 20.0),
	offset(800, 10.0),
	offset(600, 10.0),
	offset(500, 10.0),
	offset(400, 10.0),
	offset(300, 10.0),
	offset(100, 10.0),
	offset(50, 5.0),
	offset(20, 5.0),
	offset(0, 0.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEpisode {
	pub start_index: usize,
	pub location: String,
	pub timestamp: String,
	pub distance: f64,
}

/// One stop per maximal run of zero-speed samples, keyed on the run's first sample
#[must_use]
pub fn segment_stops(samples: &[Sample]) -> Vec<StopEpisode> {
	let mut stops = Vec::new();
	let mut is_stopped = false;

	for (index, sample) in samples.iter().enumerate() {
		if sample.is_stationary() {
			if !is_stopped {
				stops.push(StopEpisode {
					start_index: index,
					location: sample.location.clone(),
					timestamp: sample.timestamp.clone(),
					distance: sample.distance,
				});
				is_stopped = true;
			}
		} else {
			is_stopped = false;
		}
	}

	stops
}

/// Speed at each approach offset; `None` when no sample fell within tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachProfile {
	speeds: [Option<f64>; APPROACH_OFFSETS.len()],
}

impl ApproachProfile {
	fn unknown() -> Self {
		let mut speeds = [None; APPROACH_OFFSETS.len()];
		if let Some(slot) = APPROACH_OFFSETS.iter().position(|o| o.meters == 0) {
			speeds[slot] = Some(0.0);
		}
		Self { speeds }
	}

	#[must_use]
	pub fn speed_at(&self, offset_m: u32) -> Option<f64> {
		APPROACH_OFFSETS.iter().position(|o| o.meters == offset_m).and_then(|slot| self.speeds[slot])
	}

	#[must_use]
	pub fn iter(&self) -> impl Iterator<Item = (u32, Option<f64>)> + '_ {
		APPROACH_OFFSETS.iter().zip(self.speeds.iter()).map(|(o, speed)| (o.meters, *speed))
	}
}

impl Serialize for ApproachProfile {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.speeds.len()))?;
		for (meters, speed) in self.iter() {
			map.serialize_entry(&meters, &speed)?;
		}
		map.end()
	}
}

/// Walks backward from the stop recording speeds at the approach offsets.
/// Later writes win, so an offset ends up with the farthest-back sample inside its tolerance.
#[must_use]
pub fn profile_approach(samples: &[Sample], stop_index: usize) -> ApproachProfile {
	let mut profile = ApproachProfile::unknown();

	let Some(stop) = samples.get(stop_index) else {
		return profile;
	};

	for sample in samples[..=stop_index].iter().rev() {
		let diff = (stop.distance - sample.distance).abs();
		if diff > APPROACH_SCAN_LIMIT_M {
			break;
		}

		for (slot, offset) in APPROACH_OFFSETS.iter().enumerate() {
			if offset.meters == 0 {
				continue;
			}
			if (diff - f64::from(offset.meters)).abs() < offset.tolerance {
				profile.speeds[slot] = Some(sample.speed);
			}
		}
	}

	profile
}
