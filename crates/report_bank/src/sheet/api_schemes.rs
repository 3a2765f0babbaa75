use serde::{Deserialize, Serialize};

pub(crate) const CHECK_DUPLICATE_ACTION: &str = "checkDuplicate";

#[derive(Debug, Serialize)]
pub(crate) struct DuplicateCheckRequestParams<'a> {
	pub action: &'a str,
	#[serde(rename = "trainNo")]
	pub train_no: &'a str,
	pub date: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DuplicateCheckResponse {
	#[serde(default)]
	pub exists: bool,
	#[serde(rename = "cliName", default)]
	pub cli_name: Option<String>,
}
