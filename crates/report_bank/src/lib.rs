mod sheet;

pub use sheet::SheetBank;

use rtis_core::Report;

/// Remote store of analyzed journeys, shared between crew lobbies
#[async_trait::async_trait]
pub trait ReportBank {
	/// Looks up an earlier analysis of the same train and journey date
	async fn check_duplicate(&self, train_no: &str, journey_date: &str) -> anyhow::Result<DuplicateCheck>;
	async fn submit(&self, report: &Report) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateCheck {
	pub exists: bool,
	pub analyzed_by: Option<String>,
}
