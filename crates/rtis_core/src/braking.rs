use serde::Serialize;

use crate::rules::OffsetLimit;
use crate::stops::ApproachProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrakingQuality {
	#[serde(rename = "Smooth Braking")]
	SmoothBraking,
	#[serde(rename = "Late Braking")]
	LateBraking,
}

impl BrakingQuality {
	#[must_use]
	pub const fn remark(self) -> &'static str {
		match self {
			Self::SmoothBraking => "OK",
			Self::LateBraking => "CHECK",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakingVerdict {
	pub quality: BrakingQuality,
	/// Offsets whose speed was over the limit or never recorded
	pub failed_offsets: Vec<u32>,
}

/// Checks every limit against the profile; an unrecorded speed fails its check
#[must_use]
pub fn classify(limits: &[OffsetLimit], profile: &ApproachProfile) -> BrakingVerdict {
	let failed_offsets: Vec<u32> = limits
		.iter()
		.filter(|limit| profile.speed_at(limit.offset_m).is_none_or(|speed| speed > limit.max_speed))
		.map(|limit| limit.offset_m)
		.collect();

	let quality = if failed_offsets.is_empty() { BrakingQuality::SmoothBraking } else { BrakingQuality::LateBraking };

	BrakingVerdict { quality, failed_offsets }
}
