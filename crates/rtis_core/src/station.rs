use serde::Deserialize;

/// Stations closer than this to a sample lend it their name
pub const STATION_MATCH_RADIUS_M: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRecord {
	#[serde(rename = "SIGNAL NAME", alias = "signalName")]
	pub signal_name: String,
	#[serde(rename = "CUMMULATIVE DISTANT(IN Meter)", alias = "cumulativeDistance")]
	pub cumulative_distance: f64,
}

#[derive(Debug, Clone)]
struct IndexedStation {
	record: StationRecord,
	order: usize,
}

/// Read-only station reference, sorted by distance for nearest lookups
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
	stations: Vec<IndexedStation>,
}

impl StationDirectory {
	#[must_use]
	pub fn new(records: Vec<StationRecord>) -> Self {
		let mut stations: Vec<IndexedStation> = records
			.into_iter()
			.filter(|record| record.cumulative_distance.is_finite())
			.enumerate()
			.map(|(order, record)| IndexedStation { record, order })
			.collect();

		stations.sort_by(|a, b| a.record.cumulative_distance.total_cmp(&b.record.cumulative_distance));

		Self { stations }
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.stations.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.stations.is_empty()
	}

	/// Nearest station within `radius` meters of `distance`.
	/// Equally distant candidates resolve to the one listed first in the directory.
	#[must_use]
	pub fn nearest_within(&self, distance: f64, radius: f64) -> Option<&StationRecord> {
		let start = self.stations.partition_point(|s| s.record.cumulative_distance < distance - radius);

		self
			.stations
			.get(start..)?
			.iter()
			.take_while(|s| s.record.cumulative_distance <= distance + radius)
			.min_by(|a, b| {
				let da = (a.record.cumulative_distance - distance).abs();
				let db = (b.record.cumulative_distance - distance).abs();
				da.total_cmp(&db).then(a.order.cmp(&b.order))
			})
			.map(|s| &s.record)
	}

	#[must_use]
	pub fn station_name_near(&self, distance: f64) -> Option<&str> {
		self.nearest_within(distance, STATION_MATCH_RADIUS_M).map(|s| s.signal_name.as_str())
	}
}

impl FromIterator<StationRecord> for StationDirectory {
	fn from_iter<T: IntoIterator<Item = StationRecord>>(iter: T) -> Self {
		Self::new(iter.into_iter().collect())
	}
}
