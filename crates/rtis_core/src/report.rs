use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::brake_test::{BrakeTestResult, detect_brake_tests};
use crate::braking::{BrakingQuality, classify};
use crate::error::{AnalysisError, AnalysisResult};
use crate::normalizer::{NormalizeDiagnostics, NormalizedJourney, RawRow, normalize};
use crate::rules::RuleTable;
use crate::speed_bands::{JourneySummary, SpeedBandHistogram, aggregate_speed_bands};
use crate::station::StationDirectory;
use crate::stops::{ApproachProfile, profile_approach, segment_stops};
use crate::types::{Sample, TripMetadata};

const FINGERPRINT_LEN: usize = 8;

/// A stop merged with its approach profile and braking verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopReport {
	pub s_no: usize,
	pub start_index: usize,
	pub location: String,
	pub time: String,
	/// Cumulative distance of the stop, meters
	pub km: f64,
	pub speeds: ApproachProfile,
	pub result: BrakingQuality,
	pub failed_offsets: Vec<u32>,
	pub remark: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
	pub trip_id: String,
	pub inputs: TripMetadata,
	pub summary: JourneySummary,
	pub speed_bands: SpeedBandHistogram,
	#[serde(flatten)]
	pub brake_tests: BrakeTestResult,
	pub stops: Vec<StopReport>,
	pub diagnostics: NormalizeDiagnostics,
}

/// Runs the whole analysis over one journey log
pub fn analyze_journey(
	rows: &[RawRow],
	directory: &StationDirectory,
	metadata: TripMetadata,
	rules: &RuleTable,
) -> AnalysisResult<Report> {
	rules.validate()?;
	let journey = normalize(rows, directory)?;
	assemble_report(&journey, metadata, rules)
}

pub fn assemble_report(journey: &NormalizedJourney, metadata: TripMetadata, rules: &RuleTable) -> AnalysisResult<Report> {
	let samples = journey.samples.as_slice();
	if samples.is_empty() {
		return Err(AnalysisError::EmptySequence);
	}

	let rake = metadata.rake_type();
	let limits = rules.braking_limits(&rake);
	let stops: Vec<StopReport> = segment_stops(samples)
		.into_par_iter()
		.enumerate()
		.map(|(position, stop)| {
			let speeds = profile_approach(samples, stop.start_index);
			let verdict = classify(limits, &speeds);

			StopReport {
				s_no: position + 1,
				start_index: stop.start_index,
				location: stop.location,
				time: stop.timestamp,
				km: stop.distance,
				speeds,
				result: verdict.quality,
				failed_offsets: verdict.failed_offsets,
				remark: verdict.quality.remark(),
			}
		})
		.collect();

	let brake_rules = rules.brake_test_rules(&rake);
	let (brake_tests, speed_profile) =
		rayon::join(|| detect_brake_tests(samples, brake_rules), || aggregate_speed_bands(samples, metadata.mps));
	let speed_profile = speed_profile?;

	let disambiguator = match metadata.disambiguator.as_deref().map(str::trim) {
		Some(given) if !given.is_empty() => given.to_string(),
		_ => journey_fingerprint(samples),
	};
	let trip_id = format!("{}_{}_{}", metadata.train_no.trim(), metadata.journey_date.trim(), disambiguator);

	info!(
		trip_id = %trip_id,
		stops = stops.len(),
		late_braking = stops.iter().filter(|s| s.result == BrakingQuality::LateBraking).count(),
		bft = brake_tests.bft.passed(),
		bpt = brake_tests.bpt.passed(),
		overspeeds = speed_profile.summary.overspeed_count,
		"Journey analyzed"
	);

	Ok(Report {
		trip_id,
		inputs: metadata,
		summary: speed_profile.summary,
		speed_bands: speed_profile.bands,
		brake_tests,
		stops,
		diagnostics: journey.diagnostics,
	})
}

/// Short content hash of the samples, stable across runs over the same log
fn journey_fingerprint(samples: &[Sample]) -> String {
	let mut hasher = Sha256::new();
	for sample in samples {
		hasher.update(sample.timestamp.as_bytes());
		hasher.update(sample.speed.to_le_bytes());
		hasher.update(sample.distance.to_le_bytes());
	}

	hasher.finalize().iter().take(FINGERPRINT_LEN / 2).map(|b| format!("{b:02x}")).collect()
}
