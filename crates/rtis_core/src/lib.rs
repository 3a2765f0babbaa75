//! Compliance analysis of a single locomotive journey recorded by RTIS.
//!
//! Samples are normalized once and then read by independent stages: stop
//! segmentation with approach profiling and braking verdicts, brake-test
//! detection and speed-band aggregation. [`analyze_journey`] runs them all and
//! assembles a [`Report`].

mod braking;
mod error;
mod normalizer;
mod report;
mod rules;
mod speed_bands;
mod station;
mod stops;
mod types;

#[cfg(test)]
mod test_support;

pub use brake_test::{BrakeTestResult, BrakeTestWindow, TestOutcome, TestStatus, detect_brake_tests};
pub use braking::{BrakingQuality, BrakingVerdict, classify};
pub use error::{AnalysisError, AnalysisResult};
pub use normalizer::{NormalizeDiagnostics, NormalizedJourney, RawRow, normalize};
pub use report::{Report, StopReport, analyze_journey, assemble_report};
pub use rules::{BrakeTestRuleSet, BrakeTestRules, BrakingRules, DropRule, OffsetLimit, RuleTable, SpeedDrop};
pub use speed_bands::{JourneySummary, SpeedBand, SpeedBandHistogram, SpeedProfile, aggregate_speed_bands};
pub use station::{STATION_MATCH_RADIUS_M, StationDirectory, StationRecord};
pub use stops::{APPROACH_OFFSETS, ApproachOffset, ApproachProfile, StopEpisode, profile_approach, segment_stops};
pub use types::{CrewIds, RakeType, Sample, TripMetadata};
