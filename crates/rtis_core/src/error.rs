use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
	/// Nothing left to analyze after normalization
	#[error("journey log contains no valid samples")]
	EmptySequence,

	/// A numeric field holds a value that cannot be read as a number at all (bool, array, object)
	#[error("row {row}: field '{field}' is not numeric")]
	NonNumericField { row: usize, field: &'static str },

	#[error("invalid parameter: {0}")]
	InvalidParameter(String),
}
