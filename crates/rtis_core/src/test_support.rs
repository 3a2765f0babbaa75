use crate::types::Sample;

/// Samples without a usable clock, one per (distance, speed) pair
pub fn journey(distances: &[f64], speeds: &[f64]) -> Vec<Sample> {
	distances
		.iter()
		.zip(speeds)
		.enumerate()
		.map(|(index, (&distance, &speed))| Sample {
			index,
			timestamp: format!("T{index}"),
			elapsed_secs: None,
			speed,
			distance,
			location: format!("KM {distance:.2}"),
		})
		.collect()
}

/// Samples with explicit elapsed seconds
pub fn timed_journey(points: &[(f64, f64)]) -> Vec<Sample> {
	points
		.iter()
		.enumerate()
		.map(|(index, &(elapsed, speed))| Sample {
			index,
			timestamp: format!("+{elapsed}s"),
			elapsed_secs: Some(elapsed),
			speed,
			distance: index as f64 * 10.0,
			location: String::new(),
		})
		.collect()
}

/// Constant-speed samples with a clock-less timestamp, for brake-test windows
pub fn speeds_only(speeds: &[f64]) -> Vec<Sample> {
	let distances: Vec<f64> = (0..speeds.len()).map(|i| i as f64 * 10.0).collect();
	journey(&distances, speeds)
}
