use serde::Serialize;
use serde::ser::SerializeMap;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedBand {
	AtOrAboveMps,
	Above80,
	From75To80,
	From60To75,
	From40To60,
	Below40,
}

impl SpeedBand {
	pub const ALL: [Self; 6] =
		[Self::AtOrAboveMps, Self::Above80, Self::From75To80, Self::From60To75, Self::From40To60, Self::Below40];

	/// Bands are tested top-down, so a speed at or over MPS never lands in a fixed band
	#[must_use]
	pub fn classify(speed: f64, mps: f64) -> Self {
		if speed >= mps {
			Self::AtOrAboveMps
		} else if speed > 80.0 {
			Self::Above80
		} else if speed >= 75.0 {
			Self::From75To80
		} else if speed >= 60.0 {
			Self::From60To75
		} else if speed >= 40.0 {
			Self::From40To60
		} else {
			Self::Below40
		}
	}

	#[must_use]
	pub const fn label(self) -> &'static str {
		match self {
			Self::AtOrAboveMps => "atOrAboveMPS",
			Self::Above80 => "above80",
			Self::From75To80 => "75to80",
			Self::From60To75 => "60to75",
			Self::From40To60 => "40to60",
			Self::Below40 => "below40",
		}
	}

	const fn slot(self) -> usize {
		self as usize
	}
}

/// Distance in meters covered in each speed band
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedBandHistogram {
	distances: [f64; SpeedBand::ALL.len()],
}

impl SpeedBandHistogram {
	#[must_use]
	pub const fn distance_in(&self, band: SpeedBand) -> f64 {
		self.distances[band.slot()]
	}

	#[must_use]
	pub fn total(&self) -> f64 {
		self.distances.iter().sum()
	}

	fn add(&mut self, band: SpeedBand, distance: f64) {
		self.distances[band.slot()] += distance;
	}
}

impl Serialize for SpeedBandHistogram {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(SpeedBand::ALL.len()))?;
		for band in SpeedBand::ALL {
			map.serialize_entry(band.label(), &self.distance_in(band))?;
		}
		map.end()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySummary {
	pub max_speed: f64,
	pub avg_speed: f64,
	pub total_distance: f64,
	pub overspeed_count: usize,
	pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedProfile {
	pub bands: SpeedBandHistogram,
	pub summary: JourneySummary,
}

pub fn aggregate_speed_bands(samples: &[Sample], mps: f64) -> AnalysisResult<SpeedProfile> {
	if !mps.is_finite() || mps <= 0.0 {
		return Err(AnalysisError::InvalidParameter(format!("mps must be a positive speed, got {mps}")));
	}

	let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
		return Err(AnalysisError::EmptySequence);
	};

	let mut bands = SpeedBandHistogram::default();
	for pair in samples.windows(2) {
		// Distance going backwards is booked as-is
		bands.add(SpeedBand::classify(pair[1].speed, mps), pair[1].distance - pair[0].distance);
	}

	let summary = JourneySummary {
		max_speed: samples.iter().map(|s| s.speed).fold(f64::NEG_INFINITY, f64::max),
		avg_speed: samples.iter().map(|s| s.speed).sum::<f64>() / samples.len() as f64,
		total_distance: last.distance - first.distance,
		overspeed_count: samples.iter().filter(|s| s.speed > mps).count(),
		sample_count: samples.len(),
	};

	Ok(SpeedProfile { bands, summary })
}
