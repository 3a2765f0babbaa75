use anyhow::Context;
use rtis_core::{RawRow, StationDirectory, StationRecord};
use std::fs;

pub(crate) fn load_rows(path: &str) -> anyhow::Result<Vec<RawRow>> {
	let content = fs::read_to_string(path).context(format!("Failed to read journey log: {path}"))?;

	parse_rows(&content).context(format!("Failed to parse journey log: {path}"))
}

/// A missing path is not an error, locations then fall back to kilometre points
pub(crate) fn load_directory(path: Option<&str>) -> anyhow::Result<StationDirectory> {
	let Some(path) = path else {
		return Ok(StationDirectory::default());
	};

	let content = fs::read_to_string(path).context(format!("Failed to read station directory: {path}"))?;

	parse_directory(&content).context(format!("Failed to parse station directory: {path}"))
}

fn parse_rows(content: &str) -> anyhow::Result<Vec<RawRow>> {
	Ok(serde_json::from_str(content)?)
}

fn parse_directory(content: &str) -> anyhow::Result<StationDirectory> {
	let records: Vec<StationRecord> = serde_json::from_str(content)?;

	Ok(StationDirectory::new(records))
}
