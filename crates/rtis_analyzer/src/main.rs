use anyhow::Context;
use report_bank::{ReportBank, SheetBank};
use rtis_core::analyze_journey;
use std::fs;
use tracing::{info, warn};

use crate::config::Config;

mod config;
mod input;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();

	let config_path = std::env::args().nth(1).unwrap_or_else(|| String::from("config.toml"));
	let config = Config::load(&config_path).context("Failed to load configuration")?;
	info!(train_no = %config.trip.train_no, journey_date = %config.trip.journey_date, "✅ Configuration loaded");

	let bank = if config.bank.enabled { Some(SheetBank::new(&config.bank.script_url)?) } else { None };

	if let Some(bank) = &bank {
		match bank.check_duplicate(&config.trip.train_no, &config.trip.journey_date).await {
			Ok(check) if check.exists && !config.bank.allow_duplicates => {
				anyhow::bail!(
					"Journey {} on {} is already in the report bank (analyzed by {})",
					config.trip.train_no,
					config.trip.journey_date,
					check.analyzed_by.as_deref().unwrap_or("unknown")
				);
			},
			Ok(_) => {},
			Err(error) => warn!("Duplicate check unavailable, continuing offline: {error:#}"),
		}
	}

	let rows = input::load_rows(&config.input.journey_path)?;
	let directory = input::load_directory(config.input.stations_path.as_deref())?;
	info!(rows = rows.len(), stations = directory.len(), "✅ Journey log loaded");

	let report =
		analyze_journey(&rows, &directory, config.trip.clone(), &config.rules).context("Failed to analyze journey")?;

	let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
	match &config.input.report_path {
		Some(path) => {
			fs::write(path, &json).context(format!("Failed to write report: {path}"))?;
			info!(path = %path, "✅ Report written");
		},
		None => println!("{json}"),
	}

	if let Some(bank) = &bank {
		bank.submit(&report).await?;
	}

	Ok(())
}
