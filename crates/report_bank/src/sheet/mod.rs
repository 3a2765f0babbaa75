use anyhow::Context;
use api_schemes::{CHECK_DUPLICATE_ACTION, DuplicateCheckRequestParams, DuplicateCheckResponse};
use rtis_core::Report;
use tracing::{info, warn};
use url::Url;

use crate::{DuplicateCheck, ReportBank};
mod api_schemes;

/// Report bank backed by a spreadsheet web-app endpoint
pub struct SheetBank {
	client: reqwest::Client,
	script_url: Url,
}

impl SheetBank {
	pub fn new(script_url: &str) -> anyhow::Result<Self> {
		let script_url = Url::parse(script_url).context(format!("Invalid report bank URL: {script_url}"))?;

		Ok(Self { client: reqwest::Client::new(), script_url })
	}

	fn duplicate_check_request(&self, train_no: &str, journey_date: &str) -> reqwest::Result<reqwest::Request> {
		self
			.client
			.get(self.script_url.clone())
			.query(&DuplicateCheckRequestParams { action: CHECK_DUPLICATE_ACTION, train_no, date: journey_date })
			.build()
	}

	fn submit_request(&self, report: &Report) -> reqwest::Result<reqwest::Request> {
		self.client.post(self.script_url.clone()).json(report).build()
	}
}

impl From<DuplicateCheckResponse> for DuplicateCheck {
	fn from(response: DuplicateCheckResponse) -> Self {
		let analyzed_by = response.cli_name.map(|name| name.trim().to_string()).filter(|name| !name.is_empty());
		Self { exists: response.exists, analyzed_by }
	}
}

#[async_trait::async_trait]
impl ReportBank for SheetBank {
	async fn check_duplicate(&self, train_no: &str, journey_date: &str) -> anyhow::Result<DuplicateCheck> {
		let (train_no, journey_date) = (train_no.trim(), journey_date.trim());
		if train_no.is_empty() || journey_date.is_empty() {
			return Ok(DuplicateCheck::default());
		}

		let request = self.duplicate_check_request(train_no, journey_date)?;
		let response: DuplicateCheckResponse = self
			.client
			.execute(request)
			.await?
			.error_for_status()?
			.json()
			.await
			.context(format!("Failed to check report bank for {train_no} on {journey_date}"))?;

		let check = DuplicateCheck::from(response);
		if check.exists {
			warn!(train_no, journey_date, analyzed_by = ?check.analyzed_by, "Journey already in report bank");
		}

		Ok(check)
	}

	async fn submit(&self, report: &Report) -> anyhow::Result<()> {
		let request = self.submit_request(report)?;

		self
			.client
			.execute(request)
			.await?
			.error_for_status()
			.context(format!("Failed to submit report {}", report.trip_id))?;

		info!(trip_id = %report.trip_id, "Report saved to bank");

		Ok(())
	}
}
